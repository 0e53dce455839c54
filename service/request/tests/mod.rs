use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use domain_request::{
    command::{ReviewCommand, SubmitRequestCommand},
    exception::RequestException,
    mock::MockMailTransport,
    model::{
        entity::{RecordTable, RequestRecord},
        vo::{
            DocumentKind, DocumentUpload, NotificationOutcome, RecordEvent, ReferenceNo,
            RequestStatus, ReviewDecision, ReviewEntry,
        },
    },
    repository::RequestRecordRepo,
    service::{AccessGateService, ExportService, ReviewService, SubmissionService},
};
use service_request::{
    AccessGateServiceImpl, CsvExportServiceImpl, LocalFileIntakeServiceImpl,
    MailNotifyServiceImpl, ReferenceGeneratorServiceImpl, ReviewServiceImpl,
    SubmissionServiceImpl,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryRecordRepo {
    table: Mutex<RecordTable>,
}

#[async_trait]
impl RequestRecordRepo for MemoryRecordRepo {
    async fn get_all(&self) -> anyhow::Result<Vec<RequestRecord>> {
        Ok(self.table.lock().await.records().to_vec())
    }

    async fn get_by_reference(
        &self,
        reference_no: &ReferenceNo,
    ) -> anyhow::Result<Option<RequestRecord>> {
        Ok(self.table.lock().await.get(reference_no).cloned())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.table.lock().await.len())
    }

    async fn insert(&self, record: &RequestRecord) -> anyhow::Result<()> {
        self.table.lock().await.apply(RecordEvent::Created {
            record: record.clone(),
        })
    }

    async fn update_review(&self, entry: &ReviewEntry) -> anyhow::Result<()> {
        self.table.lock().await.apply(RecordEvent::Reviewed(entry.clone()))
    }
}

struct System {
    repo: Arc<MemoryRecordRepo>,
    submission: SubmissionServiceImpl,
    gate: Arc<AccessGateServiceImpl>,
    review: ReviewServiceImpl,
    export: CsvExportServiceImpl,
}

fn load(base: &Path, transport: MockMailTransport) -> System {
    let repo = Arc::new(MemoryRecordRepo::default());
    let intake = Arc::new(
        LocalFileIntakeServiceImpl::builder()
            .memorandum_dir(base.join("uploads/memorandum"))
            .activity_matrix_dir(base.join("uploads/activity_matrix"))
            .build(),
    );
    let gate = Arc::new(AccessGateServiceImpl::builder().admin_password("letmein").build());
    let submission = SubmissionServiceImpl::builder()
        .record_repository(repo.clone())
        .file_intake_service(intake.clone())
        .reference_service(Arc::new(
            ReferenceGeneratorServiceImpl::builder().record_repository(repo.clone()).build(),
        ))
        .notify_service(Arc::new(
            MailNotifyServiceImpl::builder()
                .mail_transport(Arc::new(transport))
                .recipients(vec!["admin@example.org".to_string()])
                .build(),
        ))
        .build();
    let review = ReviewServiceImpl::builder()
        .record_repository(repo.clone())
        .access_gate_service(gate.clone())
        .file_intake_service(intake)
        .build();
    let export = CsvExportServiceImpl::builder()
        .record_repository(repo.clone())
        .access_gate_service(gate.clone())
        .build();
    System {
        repo,
        submission,
        gate,
        review,
        export,
    }
}

fn jane() -> SubmitRequestCommand {
    SubmitRequestCommand {
        program_owner: "Jane".to_string(),
        training_title: "Leadership 101".to_string(),
        venue: "Hall A".to_string(),
        date_start: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        date_end: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        memorandum: Some(DocumentUpload::new("memo.pdf", b"%PDF-memo".to_vec())),
        activity_matrix: Some(DocumentUpload::new("matrix.pdf", b"%PDF-matrix".to_vec())),
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn submit_then_approve() {
    let base = tempfile::tempdir().unwrap();
    let mut transport = MockMailTransport::new();
    transport.expect_send().times(1).returning(|_| Ok(()));
    let system = load(base.path(), transport);

    let outcome = system.submission.submit(jane()).await.unwrap();
    assert_eq!(outcome.notification, NotificationOutcome::Sent);
    let reference_no = outcome.record.reference_no.clone().unwrap();
    assert_eq!(
        reference_no.as_str(),
        format!("MERF-{}-0001", Local::now().year())
    );
    assert_eq!(
        outcome.message(),
        format!("Request submitted successfully. Reference No: {reference_no}")
    );
    assert_eq!(count_files(&base.path().join("uploads/memorandum")), 1);
    assert_eq!(count_files(&base.path().join("uploads/activity_matrix")), 1);

    let session = system.gate.login("letmein").await.unwrap();
    let pending = system.review.list_pending(&session).await.unwrap();
    assert_eq!(pending, vec![outcome.record.clone()]);
    let memo = system
        .review
        .document(&session, DocumentKind::Memorandum, &outcome.record.memorandum_file)
        .await
        .unwrap();
    assert_eq!(memo, b"%PDF-memo".to_vec());

    let approved = system
        .review
        .decide(
            &session,
            ReviewCommand {
                reference_no: reference_no.clone(),
                decision: ReviewDecision::Approve,
                remarks: "ok".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(approved.admin_remarks, "ok");
    assert_eq!(
        RequestRecord {
            status: RequestStatus::Pending,
            admin_remarks: String::new(),
            ..approved.clone()
        },
        outcome.record
    );
    assert_eq!(system.repo.get_by_reference(&reference_no).await.unwrap(), Some(approved));
    assert!(system.review.list_pending(&session).await.unwrap().is_empty());

    let again = system
        .review
        .decide(
            &session,
            ReviewCommand {
                reference_no,
                decision: ReviewDecision::Return,
                remarks: "too late".to_string(),
            },
        )
        .await;
    assert!(matches!(again, Err(RequestException::NotPending { .. })));

    let csv = String::from_utf8(system.export.export_csv(&session).await.unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains(",Approved,ok,"));
}

#[tokio::test]
async fn sequential_submissions_get_increasing_references() {
    let base = tempfile::tempdir().unwrap();
    let mut transport = MockMailTransport::new();
    transport.expect_send().times(2).returning(|_| Ok(()));
    let system = load(base.path(), transport);

    let first = system.submission.submit(jane()).await.unwrap().record;
    // Same file names, different bytes, usually within the same second.
    let mut second = jane();
    second.training_title = "Leadership 102".to_string();
    second.memorandum = Some(DocumentUpload::new("memo.pdf", b"%PDF-memo-2".to_vec()));
    second.activity_matrix = Some(DocumentUpload::new("matrix.pdf", b"%PDF-matrix-2".to_vec()));
    let second = system.submission.submit(second).await.unwrap().record;

    let year = Local::now().year();
    assert_eq!(first.reference_no.as_ref().unwrap().as_str(), format!("MERF-{year}-0001"));
    assert_eq!(second.reference_no.as_ref().unwrap().as_str(), format!("MERF-{year}-0002"));
    assert_eq!(system.repo.count().await.unwrap(), 2);
    assert_ne!(first.memorandum_file, second.memorandum_file);
    assert_ne!(first.activity_matrix_file, second.activity_matrix_file);

    let session = system.gate.login("letmein").await.unwrap();
    for (record, memo, matrix) in [
        (&first, &b"%PDF-memo"[..], &b"%PDF-matrix"[..]),
        (&second, &b"%PDF-memo-2"[..], &b"%PDF-matrix-2"[..]),
    ] {
        let read = system
            .review
            .document(&session, DocumentKind::Memorandum, &record.memorandum_file)
            .await
            .unwrap();
        assert_eq!(read, memo);
        let read = system
            .review
            .document(&session, DocumentKind::ActivityMatrix, &record.activity_matrix_file)
            .await
            .unwrap();
        assert_eq!(read, matrix);
    }
}

#[tokio::test]
async fn missing_document_writes_nothing() {
    let base = tempfile::tempdir().unwrap();
    let mut transport = MockMailTransport::new();
    transport.expect_send().never();
    let system = load(base.path(), transport);

    let mut cmd = jane();
    cmd.activity_matrix = None;
    let result = system.submission.submit(cmd).await;

    assert!(matches!(result, Err(RequestException::MissingDocuments { .. })));
    assert_eq!(system.repo.count().await.unwrap(), 0);
    assert_eq!(count_files(&base.path().join("uploads/memorandum")), 0);
    assert_eq!(count_files(&base.path().join("uploads/activity_matrix")), 0);
}

#[tokio::test]
async fn failed_mail_keeps_the_submission() {
    let base = tempfile::tempdir().unwrap();
    let mut transport = MockMailTransport::new();
    transport.expect_send().times(1).returning(|_| Err(anyhow::anyhow!("connection reset")));
    let system = load(base.path(), transport);

    let outcome = system.submission.submit(jane()).await.unwrap();
    assert!(outcome.notification.is_failed());
    assert_eq!(system.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn review_needs_the_password() {
    let base = tempfile::tempdir().unwrap();
    let system = load(base.path(), MockMailTransport::new());

    assert!(matches!(system.gate.login("guess").await, Err(RequestException::AuthFailed)));
    let session = system.gate.login("letmein").await.unwrap();
    system.gate.logout(session.id).await.unwrap();
    assert!(matches!(
        system.review.list_pending(&session).await,
        Err(RequestException::SessionExpired)
    ));
}
