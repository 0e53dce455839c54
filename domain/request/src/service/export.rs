use async_trait::async_trait;

use crate::{exception::RequestResult, model::vo::AdminSession};

#[async_trait]
pub trait ExportService: Send + Sync {
    /// Spreadsheet rendering of the whole table, regenerated on every call.
    async fn export_csv(&self, session: &AdminSession) -> RequestResult<Vec<u8>>;
}
