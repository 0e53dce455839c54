mod record_table;
mod request_record;

#[rustfmt::skip]
pub use {
    record_table::RecordTable,
    request_record::RequestRecord,
};
