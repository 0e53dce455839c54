use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use domain_request::{
    command::SubmitRequestCommand,
    exception::{RequestException, RequestResult},
    model::{
        entity::RequestRecord,
        vo::{
            DocumentKind, DocumentUpload, NotificationOutcome, RequestStatus, StoredDocuments,
            SubmissionOutcome,
        },
    },
    repository::RequestRecordRepo,
    service::{FileIntakeService, NotifyService, ReferenceService, SubmissionService},
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SubmissionServiceImpl {
    record_repository: Arc<dyn RequestRecordRepo>,
    file_intake_service: Arc<dyn FileIntakeService>,
    reference_service: Arc<dyn ReferenceService>,
    notify_service: Arc<dyn NotifyService>,
    /// Off for the plain submission log without reference numbers.
    #[builder(default = true)]
    issue_reference: bool,
    #[builder(default = "pdf".to_string(), setter(into))]
    allowed_extension: String,
    /// Serialises reference allocation with the record append.
    #[builder(default, setter(skip))]
    writer: Mutex<()>,
}

struct ValidatedForm {
    program_owner: String,
    training_title: String,
    venue: String,
    date_start: NaiveDate,
    date_end: NaiveDate,
    memorandum: DocumentUpload,
    activity_matrix: DocumentUpload,
}

impl SubmissionServiceImpl {
    fn validate(&self, cmd: SubmitRequestCommand) -> RequestResult<ValidatedForm> {
        let SubmitRequestCommand {
            program_owner,
            training_title,
            venue,
            date_start,
            date_end,
            memorandum,
            activity_matrix,
        } = cmd;

        let (memorandum, activity_matrix) = match (memorandum, activity_matrix) {
            (Some(memorandum), Some(activity_matrix)) => (memorandum, activity_matrix),
            (memorandum, activity_matrix) => {
                let mut missing = vec![];
                if memorandum.is_none() {
                    missing.push(DocumentKind::Memorandum);
                }
                if activity_matrix.is_none() {
                    missing.push(DocumentKind::ActivityMatrix);
                }
                return Err(RequestException::MissingDocuments {
                    missing,
                    expected_extension: self.allowed_extension.to_owned(),
                });
            }
        };

        for (field, value) in [
            ("Program Owner", &program_owner),
            ("Training Title", &training_title),
            ("Venue", &venue),
        ] {
            if value.trim().is_empty() {
                return Err(RequestException::MissingField { field });
            }
        }

        for (kind, upload) in [
            (DocumentKind::Memorandum, &memorandum),
            (DocumentKind::ActivityMatrix, &activity_matrix),
        ] {
            if !upload.has_extension(&self.allowed_extension) {
                return Err(RequestException::UnsupportedDocument {
                    kind,
                    file_name: upload.file_name.to_owned(),
                    expected_extension: self.allowed_extension.to_owned(),
                });
            }
            if upload.content.is_empty() {
                return Err(RequestException::EmptyDocument { kind });
            }
        }

        Ok(ValidatedForm {
            program_owner: program_owner.trim().to_owned(),
            training_title: training_title.trim().to_owned(),
            venue: venue.trim().to_owned(),
            date_start,
            date_end,
            memorandum,
            activity_matrix,
        })
    }

    /// Allocates the reference, stores the documents and appends the record.
    async fn persist(
        &self,
        form: ValidatedForm,
        now: NaiveDateTime,
    ) -> RequestResult<RequestRecord> {
        let _writer = self.writer.lock().await;
        let reference_no = if self.issue_reference {
            Some(
                self.reference_service
                    .next_reference(now.year())
                    .await
                    .map_err(|source| RequestException::Storage { source })?,
            )
        } else {
            None
        };

        let StoredDocuments {
            memorandum_file,
            activity_matrix_file,
        } = self
            .file_intake_service
            .store(&form.memorandum, &form.activity_matrix, now)
            .await
            .map_err(|source| RequestException::Storage { source })?;

        let record = RequestRecord {
            reference_no,
            program_owner: form.program_owner,
            training_title: form.training_title,
            venue: form.venue,
            date_start: form.date_start,
            date_end: form.date_end,
            memorandum_file,
            activity_matrix_file,
            status: RequestStatus::Pending,
            admin_remarks: String::new(),
            timestamp: now,
        };

        if let Err(source) = self.record_repository.insert(&record).await {
            if let Err(e) = self.file_intake_service.discard(&record.documents()).await {
                error!(
                    memorandum_file = %record.memorandum_file,
                    activity_matrix_file = %record.activity_matrix_file,
                    "Cannot remove documents of unsaved request: {e}"
                );
            }
            return Err(RequestException::Storage { source });
        }
        Ok(record)
    }
}

#[async_trait]
impl SubmissionService for SubmissionServiceImpl {
    async fn submit(&self, cmd: SubmitRequestCommand) -> RequestResult<SubmissionOutcome> {
        let form = self.validate(cmd)?;
        let now = Local::now().naive_local();
        let record = self.persist(form, now).await?;
        info!(
            reference_no = %record.display_reference(),
            program_owner = %record.program_owner,
            "Request submitted."
        );

        let notification = match self.notify_service.notify_submitted(&record).await {
            Ok(el) => el,
            Err(e) => {
                warn!(reference_no = %record.display_reference(), "Cannot notify admins: {e}");
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        Ok(SubmissionOutcome {
            record,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use domain_request::{
        mock::{
            MockFileIntakeService, MockNotifyService, MockReferenceService, MockRequestRecordRepo,
        },
        model::vo::ReferenceNo,
    };

    use super::*;

    fn command() -> SubmitRequestCommand {
        SubmitRequestCommand {
            program_owner: "Jane".to_string(),
            training_title: "Leadership 101".to_string(),
            venue: "Hall A".to_string(),
            date_start: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            memorandum: Some(DocumentUpload::new("memo.pdf", b"memo".to_vec())),
            activity_matrix: Some(DocumentUpload::new("matrix.pdf", b"matrix".to_vec())),
        }
    }

    fn stored(
        _: &DocumentUpload,
        _: &DocumentUpload,
        at: NaiveDateTime,
    ) -> anyhow::Result<StoredDocuments> {
        let prefix = at.format("%Y%m%d%H%M%S");
        Ok(StoredDocuments {
            memorandum_file: format!("{prefix}_memo.pdf"),
            activity_matrix_file: format!("{prefix}_matrix.pdf"),
        })
    }

    struct Mocks {
        repo: MockRequestRecordRepo,
        intake: MockFileIntakeService,
        reference: MockReferenceService,
        notify: MockNotifyService,
    }

    impl Mocks {
        fn untouched() -> Self {
            let mut repo = MockRequestRecordRepo::new();
            repo.expect_insert().never();
            let mut intake = MockFileIntakeService::new();
            intake.expect_store().never();
            let mut reference = MockReferenceService::new();
            reference.expect_next_reference().never();
            let mut notify = MockNotifyService::new();
            notify.expect_notify_submitted().never();
            Self {
                repo,
                intake,
                reference,
                notify,
            }
        }

        fn build(self) -> SubmissionServiceImpl {
            SubmissionServiceImpl::builder()
                .record_repository(Arc::new(self.repo))
                .file_intake_service(Arc::new(self.intake))
                .reference_service(Arc::new(self.reference))
                .notify_service(Arc::new(self.notify))
                .build()
        }
    }

    #[tokio::test]
    async fn missing_documents_change_nothing() {
        for (memorandum, activity_matrix, missing) in [
            (false, true, vec![DocumentKind::Memorandum]),
            (true, false, vec![DocumentKind::ActivityMatrix]),
            (false, false, vec![DocumentKind::Memorandum, DocumentKind::ActivityMatrix]),
        ] {
            let service = Mocks::untouched().build();
            let mut cmd = command();
            if !memorandum {
                cmd.memorandum = None;
            }
            if !activity_matrix {
                cmd.activity_matrix = None;
            }
            match service.submit(cmd).await {
                Err(RequestException::MissingDocuments {
                    missing: reported, ..
                }) => assert_eq!(reported, missing),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn blank_fields_and_wrong_documents_are_rejected() {
        let service = Mocks::untouched().build();

        let mut cmd = command();
        cmd.venue = "   ".to_string();
        assert!(matches!(
            service.submit(cmd).await,
            Err(RequestException::MissingField { field: "Venue" })
        ));

        let mut cmd = command();
        cmd.activity_matrix = Some(DocumentUpload::new("matrix.xlsx", b"x".to_vec()));
        assert!(matches!(
            service.submit(cmd).await,
            Err(RequestException::UnsupportedDocument {
                kind: DocumentKind::ActivityMatrix,
                ..
            })
        ));

        let mut cmd = command();
        cmd.memorandum = Some(DocumentUpload::new("memo.pdf", vec![]));
        assert!(matches!(
            service.submit(cmd).await,
            Err(RequestException::EmptyDocument {
                kind: DocumentKind::Memorandum
            })
        ));
    }

    #[tokio::test]
    async fn valid_submission_appends_one_pending_record() {
        let mut mocks = Mocks::untouched();
        mocks.reference = MockReferenceService::new();
        mocks
            .reference
            .expect_next_reference()
            .times(1)
            .returning(|year| Ok(ReferenceNo::generate(year, 0)));
        mocks.intake = MockFileIntakeService::new();
        mocks.intake.expect_store().times(1).returning(stored);
        mocks.repo = MockRequestRecordRepo::new();
        mocks.repo.expect_insert().times(1).returning(|record| {
            assert_eq!(record.status, RequestStatus::Pending);
            assert_eq!(record.admin_remarks, "");
            Ok(())
        });
        mocks.notify = MockNotifyService::new();
        mocks
            .notify
            .expect_notify_submitted()
            .times(1)
            .returning(|_| Ok(NotificationOutcome::Sent));

        let outcome = mocks.build().submit(command()).await.unwrap();
        let record = outcome.record;
        assert_eq!(outcome.notification, NotificationOutcome::Sent);
        assert!(record.reference_no.as_ref().unwrap().as_str().ends_with("-0001"));
        assert_eq!(record.program_owner, "Jane");
        assert!(record.memorandum_file.ends_with("_memo.pdf"));
        assert_eq!(
            record.memorandum_file,
            format!("{}_memo.pdf", record.timestamp.format("%Y%m%d%H%M%S"))
        );
    }

    #[tokio::test]
    async fn notification_failure_still_reports_persisted_record() {
        let mut mocks = Mocks::untouched();
        mocks.reference = MockReferenceService::new();
        mocks
            .reference
            .expect_next_reference()
            .returning(|year| Ok(ReferenceNo::generate(year, 3)));
        mocks.intake = MockFileIntakeService::new();
        mocks.intake.expect_store().returning(stored);
        mocks.repo = MockRequestRecordRepo::new();
        mocks.repo.expect_insert().times(1).returning(|_| Ok(()));
        mocks.notify = MockNotifyService::new();
        mocks
            .notify
            .expect_notify_submitted()
            .returning(|_| Err(anyhow!("smtp timeout")));

        let outcome = mocks.build().submit(command()).await.unwrap();
        assert_eq!(
            outcome.notification,
            NotificationOutcome::Failed {
                reason: "smtp timeout".to_string()
            }
        );
        assert!(outcome.message().ends_with(&format!(
            "Reference No: MERF-{}-0004",
            outcome.record.timestamp.year()
        )));
    }

    #[tokio::test]
    async fn failed_append_discards_stored_documents() {
        let mut mocks = Mocks::untouched();
        mocks.reference = MockReferenceService::new();
        mocks
            .reference
            .expect_next_reference()
            .returning(|year| Ok(ReferenceNo::generate(year, 0)));
        mocks.intake = MockFileIntakeService::new();
        mocks.intake.expect_store().returning(stored);
        mocks.intake.expect_discard().times(1).returning(|_| Ok(()));
        mocks.repo = MockRequestRecordRepo::new();
        mocks.repo.expect_insert().returning(|_| Err(anyhow!("disk full")));

        assert!(matches!(
            mocks.build().submit(command()).await,
            Err(RequestException::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn log_variant_issues_no_reference() {
        let mut mocks = Mocks::untouched();
        mocks.intake = MockFileIntakeService::new();
        mocks.intake.expect_store().returning(stored);
        mocks.repo = MockRequestRecordRepo::new();
        mocks.repo.expect_insert().times(1).returning(|_| Ok(()));
        mocks.notify = MockNotifyService::new();
        mocks
            .notify
            .expect_notify_submitted()
            .returning(|_| Ok(NotificationOutcome::Skipped));
        let service = SubmissionServiceImpl::builder()
            .record_repository(Arc::new(mocks.repo))
            .file_intake_service(Arc::new(mocks.intake))
            .reference_service(Arc::new(mocks.reference))
            .notify_service(Arc::new(mocks.notify))
            .issue_reference(false)
            .build();

        let outcome = service.submit(command()).await.unwrap();
        assert_eq!(outcome.record.reference_no, None);
        assert_eq!(outcome.message(), "Request submitted successfully.");
    }
}
