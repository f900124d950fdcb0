//! FormController behaviour against a scripted ComplaintService.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reclamation_core::{ComplaintDraft, Field, FileAttachment, MultipartPayload};
use reclamation_service::{ComplaintService, ServiceError, SubmitReceipt};
use reclamation_tui::controller::{
    FormController, NoticeKind, SubmitOutcome, FAILURE_NOTICE, SUCCESS_NOTICE,
};
use reclamation_tui::host::{HostContainer, TerminalHost};

#[derive(Clone, Copy)]
enum Script {
    Accept,
    Reject,
    Malformed,
    Unreachable,
}

/// A mock service that answers every call per its script and records payloads.
struct MockService {
    script: Script,
    calls: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<MultipartPayload>>>,
}

impl MockService {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ComplaintService for MockService {
    async fn submit(&self, payload: &MultipartPayload) -> Result<SubmitReceipt, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        match self.script {
            Script::Accept => Ok(SubmitReceipt {
                status: 200,
                message: None,
            }),
            Script::Reject => Err(ServiceError::Rejected("success=false".into())),
            Script::Malformed => Err(ServiceError::Protocol("json decode: expected value".into())),
            Script::Unreachable => Err(ServiceError::Network("connection refused".into())),
        }
    }
}

/// Host that counts each signal.
#[derive(Clone, Default)]
struct CountingHost {
    ready: Arc<AtomicUsize>,
    expand: Arc<AtomicUsize>,
    close: Arc<AtomicUsize>,
}

impl HostContainer for CountingHost {
    fn ready(&self) {
        self.ready.fetch_add(1, Ordering::SeqCst);
    }
    fn expand(&self) {
        self.expand.fetch_add(1, Ordering::SeqCst);
    }
    fn close(&self) {
        self.close.fetch_add(1, Ordering::SeqCst);
    }
}

fn photo(name: &str) -> FileAttachment {
    FileAttachment::from_bytes(name, "image/jpeg", name.as_bytes().to_vec())
}

fn fill(controller: &mut FormController<MockService>) {
    controller.update_field(Field::ContactPerson, "Ivanov I.I.");
    controller.update_field(Field::Company, "ServiceCo");
    controller.update_field(Field::VinCode, "ABC123");
    controller.update_field(Field::EquipmentBrand, "Скутер SMART X");
    controller.update_field(Field::VisualResult, "Brake failure");
    controller.update_files(vec![photo("f1.jpg"), photo("f2.jpg")]);
}

// ---- initialize ----

#[test]
fn initialize_signals_ready_and_expand_once() {
    let host = CountingHost::default();
    let mut controller = FormController::new(
        MockService::new(Script::Accept),
        Some(Box::new(host.clone())),
    );
    controller.initialize();
    controller.initialize();
    assert_eq!(host.ready.load(Ordering::SeqCst), 1);
    assert_eq!(host.expand.load(Ordering::SeqCst), 1);
    assert_eq!(host.close.load(Ordering::SeqCst), 0);
}

#[test]
fn initialize_without_host_is_noop() {
    let mut controller = FormController::new(MockService::new(Script::Accept), None);
    controller.initialize();
    assert!(!controller.has_host());
    assert!(controller.draft().is_empty());
}

// ---- edits ----

#[test]
fn update_field_keeps_other_fields() {
    let mut controller = FormController::new(MockService::new(Script::Accept), None);
    controller.update_field(Field::VinCode, "OLD");
    controller.update_field(Field::Company, "ServiceCo");
    controller.update_field(Field::VinCode, "ABC123");

    let draft = controller.draft();
    assert_eq!(draft.vin_code, "ABC123");
    assert_eq!(draft.company, "ServiceCo");
    assert_eq!(draft.contact_person, "");
    assert_eq!(draft.visual_result, "");
}

#[test]
fn update_field_produces_a_new_snapshot() {
    let mut controller = FormController::new(MockService::new(Script::Accept), None);
    let before = controller.draft().clone();
    controller.update_field(Field::ContactPerson, "Ivanov");
    assert_ne!(&before, controller.draft());
    assert_eq!(before.contact_person, "");
}

#[test]
fn update_files_truncates_twelve_to_ten() {
    let mut controller = FormController::new(MockService::new(Script::Accept), None);
    let files: Vec<_> = (1..=12).map(|i| photo(&format!("f{i}.jpg"))).collect();
    controller.update_files(files.clone());
    assert_eq!(controller.draft().files[..], files[..10]);
}

// ---- submit ----

#[tokio::test]
async fn successful_submit_resets_and_closes_host() {
    let service = MockService::new(Script::Accept);
    let calls = service.calls.clone();
    let payloads = service.payloads.clone();
    let host = CountingHost::default();
    let mut controller = FormController::new(service, Some(Box::new(host.clone())));
    fill(&mut controller);

    assert_eq!(controller.submit().await, SubmitOutcome::Sent);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(host.close.load(Ordering::SeqCst), 1);
    assert_eq!(controller.draft(), &ComplaintDraft::default());

    let notice = controller.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, SUCCESS_NOTICE);

    let sent = payloads.lock().unwrap();
    let payload = &sent[0];
    assert_eq!(payload.text("contactPerson"), Some("Ivanov I.I."));
    assert_eq!(payload.text("company"), Some("ServiceCo"));
    assert_eq!(payload.text("vinCode"), Some("ABC123"));
    assert_eq!(payload.text("equipmentBrand"), Some("Скутер SMART X"));
    assert_eq!(payload.text("visualResult"), Some("Brake failure"));
    assert_eq!(payload.file("photo1").unwrap().file_name, "f1.jpg");
    assert_eq!(payload.file("photo2").unwrap().file_name, "f2.jpg");
}

#[tokio::test]
async fn successful_submit_without_host_still_resets() {
    let mut controller = FormController::new(MockService::new(Script::Accept), None);
    fill(&mut controller);
    assert_eq!(controller.submit().await, SubmitOutcome::Sent);
    assert!(controller.draft().is_empty());
}

async fn assert_failure_keeps_draft(script: Script) {
    let service = MockService::new(script);
    let calls = service.calls.clone();
    let host = CountingHost::default();
    let mut controller = FormController::new(service, Some(Box::new(host.clone())));
    fill(&mut controller);
    let before = controller.draft().clone();

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);

    assert_eq!(controller.draft(), &before);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(host.close.load(Ordering::SeqCst), 0);
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Failure);
    assert_eq!(notice.text, FAILURE_NOTICE);
    assert!(controller.notice().is_none());
}

#[tokio::test]
async fn rejected_submit_keeps_draft() {
    assert_failure_keeps_draft(Script::Reject).await;
}

#[tokio::test]
async fn malformed_response_keeps_draft() {
    assert_failure_keeps_draft(Script::Malformed).await;
}

#[tokio::test]
async fn network_failure_keeps_draft() {
    assert_failure_keeps_draft(Script::Unreachable).await;
}

#[tokio::test]
async fn retry_after_failure_sends_same_data() {
    let service = MockService::new(Script::Reject);
    let payloads = service.payloads.clone();
    let mut controller = FormController::new(service, None);
    fill(&mut controller);

    controller.submit().await;
    controller.submit().await;

    let sent = payloads.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn terminal_host_sees_close_after_success() {
    let host = TerminalHost::new();
    let mut controller = FormController::new(
        MockService::new(Script::Accept),
        Some(Box::new(host.clone())),
    );
    controller.initialize();
    assert!(host.is_ready());
    assert!(host.is_expanded());
    assert!(!host.close_requested());

    fill(&mut controller);
    controller.submit().await;
    assert!(host.close_requested());
}
