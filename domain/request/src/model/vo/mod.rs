mod document;
mod notice;
mod outcome;
mod record_event;
mod reference_no;
mod session;
mod status;

#[rustfmt::skip]
pub use {
    document::*,
    notice::*,
    outcome::*,
    record_event::*,
    reference_no::*,
    session::*,
    status::*,
};
