use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::{SubmitResponse, SEND_TO_BITRIX_PATH};

/// How the stub endpoint answers every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubReply {
    /// `{"success": true}`
    Success,
    /// `{"success": false, "error": ...}`
    Failure,
    /// A 200 response whose body is not JSON.
    Malformed,
    /// JSON without the `success` flag.
    MissingFlag,
}

#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub part_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// One multipart request as the stub saw it.
#[derive(Debug, Clone, Default)]
pub struct ReceivedSubmission {
    /// Part names in arrival order.
    pub part_names: Vec<String>,
    pub fields: Vec<(String, String)>,
    pub files: Vec<ReceivedFile>,
}

impl ReceivedSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn file(&self, part_name: &str) -> Option<&ReceivedFile> {
        self.files.iter().find(|f| f.part_name == part_name)
    }
}

struct StubState {
    reply: StubReply,
    received: Mutex<Vec<ReceivedSubmission>>,
}

/// A running stub CRM endpoint with its base_url and recorded submissions.
pub struct StubCrm {
    pub base_url: String,
    state: Arc<StubState>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubCrm {
    pub fn submissions(&self) -> Vec<ReceivedSubmission> {
        self.state
            .received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn submission_count(&self) -> usize {
        self.state.received.lock().map(|r| r.len()).unwrap_or(0)
    }
}

async fn send_to_bitrix(State(state): State<Arc<StubState>>, mut multipart: Multipart) -> Response {
    let mut submission = ReceivedSubmission::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("bad multipart: {e}")).into_response()
            }
        };
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("bad part: {e}")).into_response()
            }
        };

        submission.part_names.push(name.clone());
        if file_name.is_some() {
            submission.files.push(ReceivedFile {
                part_name: name,
                file_name,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = String::from_utf8_lossy(&data).into_owned();
            submission.fields.push((name, value));
        }
    }

    if let Ok(mut received) = state.received.lock() {
        received.push(submission);
    }

    match state.reply {
        StubReply::Success => Json(SubmitResponse {
            success: true,
            error: None,
            message: None,
        })
        .into_response(),
        StubReply::Failure => Json(SubmitResponse {
            success: false,
            error: Some("CRM unavailable".into()),
            message: None,
        })
        .into_response(),
        StubReply::Malformed => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>maintenance</html>",
        )
            .into_response(),
        StubReply::MissingFlag => Json(serde_json::json!({ "status": "ok" })).into_response(),
    }
}

/// Spawn the stub CRM on a random port. Returns the StubCrm
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_stub_crm(reply: StubReply) -> StubCrm {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let state = Arc::new(StubState {
        reply,
        received: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route(SEND_TO_BITRIX_PATH, post(send_to_bitrix))
        .with_state(state.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    StubCrm {
        base_url,
        state,
        _handle: handle,
    }
}

/// A base URL on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
