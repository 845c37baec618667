/// Failures callers branch on. Everything else travels as plain `anyhow` context.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// No usable token: the CLI is missing, signed out, or the token was rejected.
    #[error("credential unavailable: {0}")]
    CredentialUnavailable(String),

    #[error("{label}: not found")]
    NotFound { label: String },

    #[error("{label}: {code}: {message} (HTTP {status})")]
    Api {
        label: String,
        status: u16,
        code: String,
        message: String,
    },
}

fn find(err: &anyhow::Error) -> Option<&GraphError> {
    err.chain().find_map(|e| e.downcast_ref::<GraphError>())
}

pub fn is_credential_error(err: &anyhow::Error) -> bool {
    matches!(find(err), Some(GraphError::CredentialUnavailable(_)))
}

pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(find(err), Some(GraphError::NotFound { .. }))
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
