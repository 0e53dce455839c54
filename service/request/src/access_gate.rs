use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use domain_request::{
    exception::{RequestException, RequestResult},
    model::vo::AdminSession,
    service::AccessGateService,
};
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Single shared password gate handing out expiring sessions.
#[derive(TypedBuilder)]
pub struct AccessGateServiceImpl {
    #[builder(setter(into))]
    admin_password: String,
    #[builder(default = Duration::minutes(30))]
    session_ttl: Duration,
    #[builder(default, setter(skip))]
    sessions: DashMap<Uuid, AdminSession>,
}

impl AccessGateServiceImpl {
    fn password_matches(&self, password: &str) -> bool {
        // An unset secret never unlocks anything.
        !self.admin_password.is_empty()
            && bool::from(password.as_bytes().ct_eq(self.admin_password.as_bytes()))
    }
}

#[async_trait]
impl AccessGateService for AccessGateServiceImpl {
    async fn login(&self, password: &str) -> RequestResult<AdminSession> {
        if !self.password_matches(password) {
            warn!("Admin login denied.");
            return Err(RequestException::AuthFailed);
        }
        let now = Utc::now();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        let session = AdminSession {
            id: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.insert(session.id, session.clone());
        info!(session_id = %session.id, "Admin session opened.");
        Ok(session)
    }

    async fn authorize(&self, session_id: Uuid) -> RequestResult<AdminSession> {
        let session = self
            .sessions
            .get(&session_id)
            .map(|el| el.value().clone())
            .ok_or(RequestException::SessionExpired)?;
        if session.is_expired_at(Utc::now()) {
            self.sessions.remove(&session_id);
            return Err(RequestException::SessionExpired);
        }
        Ok(session)
    }

    async fn logout(&self, session_id: Uuid) -> RequestResult<()> {
        self.sessions.remove(&session_id);
        info!(%session_id, "Admin session closed.");
        Ok(())
    }
}
