use std::{sync::Arc, time::Duration};

use domain_request::service::{
    AccessGateService, ExportService, MailTransport, NotifyService, ReviewService,
    SubmissionService,
};
use service_request::*;
use tracing::warn;

use super::{
    config::MerfConfig,
    repository::JsonlRecordRepo,
    service::prelude::*,
};

/// Every service the host and the background tasks need, wired from config.
#[derive(Clone)]
pub struct ServiceProvider {
    pub config: MerfConfig,
    pub submission_service: Arc<dyn SubmissionService>,
    pub review_service: Arc<dyn ReviewService>,
    pub access_gate_service: Arc<dyn AccessGateService>,
    pub export_service: Arc<dyn ExportService>,
    pub outbox_runner: Option<Arc<OutboxRunner>>,
}

impl ServiceProvider {
    pub async fn build(config: MerfConfig) -> anyhow::Result<Self> {
        let record_repository = Arc::new(JsonlRecordRepo::open(&config.storage.record_file).await?);
        let file_intake_service = Arc::new(
            LocalFileIntakeServiceImpl::builder()
                .memorandum_dir(config.storage.memorandum_dir.as_str())
                .activity_matrix_dir(config.storage.activity_matrix_dir.as_str())
                .build(),
        );
        let reference_service = Arc::new(
            ReferenceGeneratorServiceImpl::builder()
                .record_repository(record_repository.clone())
                .build(),
        );
        let (notify_service, outbox_runner) = build_notify(&config)?;
        let access_gate_service = Arc::new(
            AccessGateServiceImpl::builder()
                .admin_password(config.admin.password.as_str())
                .session_ttl(chrono::Duration::minutes(config.admin.session_ttl_minutes))
                .build(),
        );

        let submission_service = Arc::new(
            SubmissionServiceImpl::builder()
                .record_repository(record_repository.clone())
                .file_intake_service(file_intake_service.clone())
                .reference_service(reference_service)
                .notify_service(notify_service)
                .issue_reference(config.features.reference_numbers)
                .allowed_extension(config.storage.allowed_extension.trim().to_lowercase())
                .build(),
        );
        let review_service = Arc::new(
            ReviewServiceImpl::builder()
                .record_repository(record_repository.clone())
                .access_gate_service(access_gate_service.clone())
                .file_intake_service(file_intake_service)
                .enabled(config.features.review)
                .build(),
        );
        let export_service = Arc::new(
            CsvExportServiceImpl::builder()
                .record_repository(record_repository)
                .access_gate_service(access_gate_service.clone())
                .build(),
        );

        Ok(Self {
            config,
            submission_service,
            review_service,
            access_gate_service,
            export_service,
            outbox_runner: outbox_runner.map(Arc::new),
        })
    }
}

fn build_notify(
    config: &MerfConfig,
) -> anyhow::Result<(Arc<dyn NotifyService>, Option<OutboxRunner>)> {
    let mail = &config.mail;
    if mail.recipients.is_empty() {
        warn!("No mail recipients configured, submission notices are skipped.");
        // Nothing is ever queued without recipients.
        let (outbox, _) = flume::unbounded();
        return Ok((Arc::new(OutboxNotifyServiceImpl::builder().outbox(outbox).build()), None));
    }

    let mail_transport: Arc<dyn MailTransport> = Arc::new(SmtpMailTransport::new(mail)?);
    if !mail.outbox {
        let notify_service = MailNotifyServiceImpl::builder()
            .mail_transport(mail_transport)
            .recipients(mail.recipients.to_owned())
            .build();
        return Ok((Arc::new(notify_service), None));
    }

    let (outbox, receiver) = flume::unbounded();
    let runner = OutboxRunner::builder()
        .receiver(receiver)
        .mail_transport(mail_transport)
        .max_attempts(mail.max_attempts)
        .retry_interval(Duration::from_secs(mail.retry_interval_secs))
        .build();
    let notify_service = OutboxNotifyServiceImpl::builder()
        .outbox(outbox)
        .recipients(mail.recipients.to_owned())
        .build();
    Ok((Arc::new(notify_service), Some(runner)))
}
