use async_trait::async_trait;

use crate::model::vo::ReferenceNo;

#[async_trait]
pub trait ReferenceService: Send + Sync {
    /// Reference for the next record; callers serialise allocation with the insert.
    async fn next_reference(&self, year: i32) -> anyhow::Result<ReferenceNo>;
}
