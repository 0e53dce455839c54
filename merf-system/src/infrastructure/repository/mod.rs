mod record;

pub use record::JsonlRecordRepo;
