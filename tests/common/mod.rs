//! An in-process stand-in for the Graph endpoints the client calls.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use appreg::auth::StaticCredential;
use appreg::graph::GraphClient;

const ROOT: &str = "/v1.0";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub consistency: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

enum Reply {
    Json(Value),
    Text(String),
    Empty,
}

struct Canned {
    method: Method,
    path: String,
    status: StatusCode,
    reply: Reply,
}

#[derive(Default)]
struct Shared {
    canned: Vec<Canned>,
    requests: Vec<Recorded>,
}

type SharedState = Arc<Mutex<Shared>>;

pub struct MockGraph {
    pub base_url: String,
    shared: SharedState,
    _runtime: tokio::runtime::Runtime,
}

impl MockGraph {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build runtime");
        let shared = SharedState::default();
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind mock graph");
        let addr = listener.local_addr().expect("local addr");
        runtime.spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}{}", addr, ROOT),
            shared,
            _runtime: runtime,
        }
    }

    fn push(&self, method: Method, path: &str, status: u16, reply: Reply) {
        self.shared.lock().unwrap().canned.push(Canned {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("status"),
            reply,
        });
    }

    /// Answer `method path` with a JSON body. Several answers for the same
    /// route are served in order; the last one repeats.
    pub fn json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, status, Reply::Json(body));
    }

    pub fn text(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, status, Reply::Text(body.to_string()));
    }

    pub fn empty(&self, method: Method, path: &str, status: u16) {
        self.push(method, path, status, Reply::Empty);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.lock().unwrap().requests.clone()
    }

    /// Absolute URL of a Graph-relative path, for `@odata.nextLink` values.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> GraphClient {
        self.client_with_token("test-token")
    }

    pub fn client_with_token(&self, token: &str) -> GraphClient {
        let credentials = Arc::new(StaticCredential::new(token).with_tenant("tenant-1"));
        GraphClient::new(&self.base_url, credentials).expect("graph client")
    }
}

async fn handle(
    State(shared): State<SharedState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(ROOT)
        .unwrap_or(uri.path())
        .to_string();
    let text_header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut shared = shared.lock().unwrap();
    shared.requests.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        consistency: text_header("consistencylevel"),
        authorization: text_header(header::AUTHORIZATION.as_str()),
        body: serde_json::from_str(&body).ok(),
    });

    let matching: Vec<usize> = shared
        .canned
        .iter()
        .enumerate()
        .filter(|(_, c)| c.method == method && c.path == path)
        .map(|(i, _)| i)
        .collect();
    let Some(&first) = matching.first() else {
        let missing = serde_json::json!({
            "error": {
                "code": "Request_ResourceNotFound",
                "message": format!("no route for {} {}", method, path),
            }
        });
        return (StatusCode::NOT_FOUND, axum::Json(missing)).into_response();
    };

    let canned = if matching.len() > 1 {
        shared.canned.remove(first)
    } else {
        let c = &shared.canned[first];
        Canned {
            method: c.method.clone(),
            path: c.path.clone(),
            status: c.status,
            reply: match &c.reply {
                Reply::Json(v) => Reply::Json(v.clone()),
                Reply::Text(t) => Reply::Text(t.clone()),
                Reply::Empty => Reply::Empty,
            },
        }
    };
    match canned.reply {
        Reply::Json(v) => (canned.status, axum::Json(v)).into_response(),
        Reply::Text(t) => (canned.status, t).into_response(),
        Reply::Empty => canned.status.into_response(),
    }
}
