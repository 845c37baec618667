//! Wire envelopes shared by the Graph calls.

use serde::Deserialize;

use crate::error::GraphError;

#[derive(Debug, Deserialize)]
pub(super) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub(super) value: Vec<T>,

    #[serde(rename = "@odata.nextLink", default)]
    pub(super) next_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,

    #[serde(default)]
    message: String,
}

/// Map a failed response body to a typed error. Bodies that are not Graph
/// error envelopes keep their raw text as the message.
pub(crate) fn api_error(label: &str, status: u16, body: &str) -> GraphError {
    let parsed: Option<ErrorEnvelope> = serde_json::from_str(body).ok();
    let (code, message) = match parsed {
        Some(env) if !env.error.code.is_empty() || !env.error.message.is_empty() => {
            (env.error.code, env.error.message)
        }
        _ => ("UnknownError".to_string(), body.trim().to_string()),
    };
    GraphError::Api {
        label: label.to_string(),
        status,
        code,
        message,
    }
}

#[cfg(test)]
#[path = "../tests/graph/types_tests.rs"]
mod tests;
