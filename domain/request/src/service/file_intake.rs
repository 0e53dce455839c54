use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::model::vo::{DocumentKind, DocumentUpload, StoredDocuments};

#[async_trait]
pub trait FileIntakeService: Send + Sync {
    /// Writes both documents under names prefixed with `at`; nothing stays on disk on failure.
    async fn store(
        &self,
        memorandum: &DocumentUpload,
        activity_matrix: &DocumentUpload,
        at: NaiveDateTime,
    ) -> anyhow::Result<StoredDocuments>;
    async fn discard(&self, documents: &StoredDocuments) -> anyhow::Result<()>;
    async fn read(&self, kind: DocumentKind, stored_name: &str) -> anyhow::Result<Vec<u8>>;
}
