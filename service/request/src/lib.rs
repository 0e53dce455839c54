mod access_gate;
mod export;
mod file_intake;
mod notify;
mod reference;
mod review;
mod submission;

#[rustfmt::skip]
pub use {
    access_gate::AccessGateServiceImpl,
    export::CsvExportServiceImpl,
    file_intake::LocalFileIntakeServiceImpl,
    notify::{MailNotifyServiceImpl, OutboxNotifyServiceImpl},
    reference::ReferenceGeneratorServiceImpl,
    review::ReviewServiceImpl,
    submission::SubmissionServiceImpl,
};
