use reclamation_core::{ComplaintDraft, Field, FileAttachment, MultipartPayload};
use reclamation_service::ComplaintService;
use tracing::{error, info};

use crate::host::HostContainer;

pub const SUCCESS_NOTICE: &str = "Рекламация отправлена успешно!";
pub const FAILURE_NOTICE: &str = "Ошибка при отправке. Попробуйте позже.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A message the view must show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
}

/// Owns the complaint draft for one form view and talks to the service.
///
/// `submit` takes `&mut self`, so a controller never has two submissions
/// in flight.
pub struct FormController<S: ComplaintService> {
    service: S,
    host: Option<Box<dyn HostContainer>>,
    draft: ComplaintDraft,
    notice: Option<Notice>,
    initialized: bool,
}

impl<S: ComplaintService> FormController<S> {
    pub fn new(service: S, host: Option<Box<dyn HostContainer>>) -> Self {
        Self {
            service,
            host,
            draft: ComplaintDraft::default(),
            notice: None,
            initialized: false,
        }
    }

    /// Announce the page to the host and ask for full size. Only the first
    /// call has an effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        if let Some(host) = &self.host {
            host.ready();
            host.expand();
        }
    }

    pub fn update_field(&mut self, field: Field, value: &str) {
        self.draft = self.draft.with_field(field, value);
    }

    pub fn update_files(&mut self, files: Vec<FileAttachment>) {
        self.draft = self.draft.with_files(files);
    }

    /// Send the draft once. Failures are reported through `notice` and
    /// logged; they never escape this call.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let payload = MultipartPayload::from_draft(&self.draft);

        match self.service.submit(&payload).await {
            Ok(receipt) => {
                info!(status = receipt.status, photos = payload.file_count(), "complaint sent");
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    text: SUCCESS_NOTICE.to_string(),
                });
                if let Some(host) = &self.host {
                    host.close();
                }
                self.draft = ComplaintDraft::default();
                SubmitOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, "complaint submission failed");
                self.notice = Some(Notice {
                    kind: NoticeKind::Failure,
                    text: FAILURE_NOTICE.to_string(),
                });
                SubmitOutcome::Failed
            }
        }
    }

    pub fn draft(&self) -> &ComplaintDraft {
        &self.draft
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }
}
