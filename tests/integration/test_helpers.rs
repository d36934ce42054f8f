use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Router;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Canned responses for the stub Supabase server, plus a log of every
/// request it served.
#[derive(Clone)]
pub struct StubState {
    pub rest_status: u16,
    pub auth_status: u16,
    pub schema_status: u16,
    pub schema_body: String,
    pub create_user_status: u16,
    pub create_user_body: String,
    pub delete_user_status: u16,
    pub bucket_statuses: Arc<Mutex<VecDeque<u16>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubState {
    pub fn all_ok() -> Self {
        Self {
            rest_status: 200,
            auth_status: 200,
            schema_status: 200,
            schema_body: "[]".to_string(),
            create_user_status: 201,
            create_user_body: r#"{"id":"u-123","email":"probe@supacheck.dev"}"#.to_string(),
            delete_user_status: 200,
            bucket_statuses: Arc::new(Mutex::new(VecDeque::from(vec![201, 201, 201]))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_bucket_statuses(mut self, statuses: &[u16]) -> Self {
        self.bucket_statuses = Arc::new(Mutex::new(statuses.iter().copied().collect()));
        self
    }

    pub fn recorded(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &str, path: &str) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", method, path));
    }
}

/// Bind the stub server on an ephemeral port and return its base URL.
pub async fn spawn_stub(state: StubState) -> String {
    let app = Router::new()
        .route("/rest/v1/", get(rest_root))
        .route("/auth/v1/settings", get(auth_settings))
        .route("/rest/v1/users", get(schema_probe))
        .route("/auth/v1/admin/users", post(create_user))
        .route("/auth/v1/admin/users/{id}", delete(delete_user))
        .route("/storage/v1/bucket", post(create_bucket))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on, for connection-refused cases.
pub async fn unreachable_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn rest_root(State(s): State<StubState>) -> (StatusCode, String) {
    s.record("GET", "/rest/v1/");
    (status(s.rest_status), "{}".to_string())
}

async fn auth_settings(State(s): State<StubState>) -> (StatusCode, String) {
    s.record("GET", "/auth/v1/settings");
    (status(s.auth_status), "{}".to_string())
}

async fn schema_probe(State(s): State<StubState>) -> (StatusCode, String) {
    s.record("GET", "/rest/v1/users");
    (status(s.schema_status), s.schema_body.clone())
}

async fn create_user(State(s): State<StubState>) -> (StatusCode, String) {
    s.record("POST", "/auth/v1/admin/users");
    (status(s.create_user_status), s.create_user_body.clone())
}

async fn delete_user(
    State(s): State<StubState>,
    Path(id): Path<String>,
) -> (StatusCode, String) {
    s.record("DELETE", &format!("/auth/v1/admin/users/{}", id));
    (status(s.delete_user_status), "{}".to_string())
}

async fn create_bucket(State(s): State<StubState>) -> (StatusCode, String) {
    s.record("POST", "/storage/v1/bucket");
    let code = s
        .bucket_statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(201);
    (status(code), "{}".to_string())
}
