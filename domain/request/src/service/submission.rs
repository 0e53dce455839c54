use async_trait::async_trait;

use crate::{
    command::SubmitRequestCommand, exception::RequestResult, model::vo::SubmissionOutcome,
};

#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, cmd: SubmitRequestCommand) -> RequestResult<SubmissionOutcome>;
}
