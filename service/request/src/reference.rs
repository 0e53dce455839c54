use std::sync::Arc;

use async_trait::async_trait;
use domain_request::{
    model::vo::ReferenceNo, repository::RequestRecordRepo, service::ReferenceService,
};
use typed_builder::TypedBuilder;

/// Derives the sequence from the table length; there is no persisted counter.
#[derive(TypedBuilder)]
pub struct ReferenceGeneratorServiceImpl {
    record_repository: Arc<dyn RequestRecordRepo>,
}

#[async_trait]
impl ReferenceService for ReferenceGeneratorServiceImpl {
    async fn next_reference(&self, year: i32) -> anyhow::Result<ReferenceNo> {
        let count = self.record_repository.count().await?;
        Ok(ReferenceNo::generate(year, count))
    }
}
