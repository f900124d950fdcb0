use async_trait::async_trait;
use reclamation_core::MultipartPayload;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but was not the expected JSON object.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// The endpoint answered with `success: false`.
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("cannot read attachment {file_name}: {source}")]
    Attachment {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Body returned by the CRM endpoint.
///
/// Only `success` is required; the other fields are kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Acknowledgement of an accepted complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub status: u16,
    pub message: Option<String>,
}

/// Delivery of complaint payloads to the CRM integration.
///
/// The form controller programs against this trait.
/// `HttpService` posts to the real endpoint; tests supply their own.
#[async_trait]
pub trait ComplaintService: Send + Sync {
    async fn submit(&self, payload: &MultipartPayload) -> Result<SubmitReceipt, ServiceError>;
}
