use async_trait::async_trait;

use crate::model::{
    entity::RequestRecord,
    vo::{ReferenceNo, ReviewEntry},
};

#[async_trait]
pub trait RequestRecordRepo: Send + Sync {
    /// Every record in submission order.
    async fn get_all(&self) -> anyhow::Result<Vec<RequestRecord>>;
    async fn get_by_reference(
        &self,
        reference_no: &ReferenceNo,
    ) -> anyhow::Result<Option<RequestRecord>>;
    async fn count(&self) -> anyhow::Result<usize>;
    /// Fails when the record's reference no is already taken.
    async fn insert(&self, record: &RequestRecord) -> anyhow::Result<()>;
    /// Fails when no record carries the entry's reference no.
    async fn update_review(&self, entry: &ReviewEntry) -> anyhow::Result<()>;
}
