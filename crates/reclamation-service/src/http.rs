use async_trait::async_trait;
use reclamation_core::{AttachmentSource, FileAttachment, MultipartPayload, PartBody};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{ComplaintService, ServiceError, SubmitReceipt, SubmitResponse};

/// Endpoint of the CRM integration, relative to the server URL.
pub const SEND_TO_BITRIX_PATH: &str = "/send-to-bitrix";

/// Async HTTP client implementation of ComplaintService.
/// Posts each complaint once; no timeout, no retry.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{SEND_TO_BITRIX_PATH}", self.base_url)
    }
}

/// Turn the payload into a reqwest form, reading file bytes as needed.
async fn build_form(payload: &MultipartPayload) -> Result<Form, ServiceError> {
    let mut form = Form::new();
    for part in payload.parts() {
        form = match &part.body {
            PartBody::Text(value) => form.text(part.name.clone(), value.clone()),
            PartBody::File(file) => form.part(part.name.clone(), file_part(file).await?),
        };
    }
    Ok(form)
}

async fn file_part(file: &FileAttachment) -> Result<Part, ServiceError> {
    let data = match &file.source {
        AttachmentSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| ServiceError::Attachment {
                    file_name: file.file_name.clone(),
                    source,
                })?
        }
        AttachmentSource::Bytes(bytes) => bytes.to_vec(),
    };
    let part = Part::bytes(data).file_name(file.file_name.clone());
    match part.mime_str(&file.content_type) {
        Ok(part) => Ok(part),
        Err(e) => {
            warn!(file = %file.file_name, content_type = %file.content_type, "invalid content type: {e}");
            Err(ServiceError::Attachment {
                file_name: file.file_name.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
            })
        }
    }
}

/// Decide the outcome from the body alone; the status is only logged.
fn interpret_body(status: u16, body: &str) -> Result<SubmitReceipt, ServiceError> {
    let parsed: SubmitResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::Protocol(format!("json decode: {e}")))?;

    if parsed.success {
        Ok(SubmitReceipt {
            status,
            message: parsed.message,
        })
    } else {
        let reason = parsed
            .error
            .or(parsed.message)
            .unwrap_or_else(|| format!("success=false (HTTP {status})"));
        Err(ServiceError::Rejected(reason))
    }
}

#[async_trait]
impl ComplaintService for HttpService {
    async fn submit(&self, payload: &MultipartPayload) -> Result<SubmitReceipt, ServiceError> {
        let form = build_form(payload).await?;
        let url = self.endpoint();
        debug!(%url, photos = payload.file_count(), "posting complaint");

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "complaint endpoint returned non-success status");
        }
        let body = resp
            .text()
            .await
            .map_err(|e| ServiceError::Network(format!("read body: {e}")))?;

        let receipt = interpret_body(status.as_u16(), &body)?;
        info!(status = receipt.status, "complaint accepted");
        Ok(receipt)
    }
}
