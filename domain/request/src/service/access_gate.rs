use async_trait::async_trait;
use uuid::Uuid;

use crate::{exception::RequestResult, model::vo::AdminSession};

#[async_trait]
pub trait AccessGateService: Send + Sync {
    /// Issues a session when `password` equals the configured secret.
    async fn login(&self, password: &str) -> RequestResult<AdminSession>;
    /// Live session with this id, `SessionExpired` otherwise.
    async fn authorize(&self, session_id: Uuid) -> RequestResult<AdminSession>;
    async fn logout(&self, session_id: Uuid) -> RequestResult<()>;
}
