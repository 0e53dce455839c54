mod access_gate;
mod export;
mod file_intake;
mod notify;
mod reference;
mod review;
mod submission;

#[rustfmt::skip]
pub use {
    access_gate::AccessGateService,
    export::ExportService,
    file_intake::FileIntakeService,
    notify::{MailTransport, NotifyService},
    reference::ReferenceService,
    review::ReviewService,
    submission::SubmissionService,
};
