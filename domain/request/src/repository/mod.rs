mod record;

#[rustfmt::skip]
pub use {
    record::RequestRecordRepo,
};
