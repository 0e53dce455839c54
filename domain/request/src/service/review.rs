use async_trait::async_trait;

use crate::{
    command::ReviewCommand,
    exception::RequestResult,
    model::{
        entity::RequestRecord,
        vo::{AdminSession, DocumentKind},
    },
};

#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn list_pending(&self, session: &AdminSession) -> RequestResult<Vec<RequestRecord>>;
    async fn list_all(&self, session: &AdminSession) -> RequestResult<Vec<RequestRecord>>;
    /// Applies the decision and returns the updated record.
    async fn decide(
        &self,
        session: &AdminSession,
        cmd: ReviewCommand,
    ) -> RequestResult<RequestRecord>;
    async fn document(
        &self,
        session: &AdminSession,
        kind: DocumentKind,
        stored_name: &str,
    ) -> RequestResult<Vec<u8>>;
}
