use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use domain_request::{
    command::ReviewCommand,
    exception::{RequestException, RequestResult},
    model::{
        entity::RequestRecord,
        vo::{AdminSession, DocumentKind},
    },
    repository::RequestRecordRepo,
    service::{AccessGateService, FileIntakeService, ReviewService},
};
use tokio::sync::Mutex;
use tracing::info;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ReviewServiceImpl {
    record_repository: Arc<dyn RequestRecordRepo>,
    access_gate_service: Arc<dyn AccessGateService>,
    file_intake_service: Arc<dyn FileIntakeService>,
    #[builder(default = true)]
    enabled: bool,
    /// Serialises the pending check with the status update.
    #[builder(default, setter(skip))]
    writer: Mutex<()>,
}

impl ReviewServiceImpl {
    async fn guard(&self, session: &AdminSession) -> RequestResult<()> {
        if !self.enabled {
            return Err(RequestException::FeatureDisabled { feature: "review" });
        }
        self.access_gate_service.authorize(session.id).await?;
        Ok(())
    }

    async fn all_records(&self) -> RequestResult<Vec<RequestRecord>> {
        self.record_repository
            .get_all()
            .await
            .map_err(|source| RequestException::Storage { source })
    }
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    async fn list_pending(&self, session: &AdminSession) -> RequestResult<Vec<RequestRecord>> {
        self.guard(session).await?;
        Ok(self.all_records().await?.into_iter().filter(|el| el.status.is_pending()).collect())
    }

    async fn list_all(&self, session: &AdminSession) -> RequestResult<Vec<RequestRecord>> {
        self.guard(session).await?;
        self.all_records().await
    }

    async fn decide(
        &self,
        session: &AdminSession,
        cmd: ReviewCommand,
    ) -> RequestResult<RequestRecord> {
        self.guard(session).await?;
        let ReviewCommand {
            reference_no,
            decision,
            remarks,
        } = cmd;

        let _writer = self.writer.lock().await;
        let mut record = self
            .record_repository
            .get_by_reference(&reference_no)
            .await
            .map_err(|source| RequestException::Storage { source })?
            .ok_or(RequestException::NoSuchRecord {
                reference_no: reference_no.to_owned(),
            })?;
        let entry = record.review(decision, &remarks, Local::now().naive_local())?;
        self.record_repository
            .update_review(&entry)
            .await
            .map_err(|source| RequestException::Storage { source })?;
        record.apply_review(&entry);
        info!(
            %reference_no,
            status = %record.status,
            session_id = %session.id,
            "Request reviewed."
        );
        Ok(record)
    }

    async fn document(
        &self,
        session: &AdminSession,
        kind: DocumentKind,
        stored_name: &str,
    ) -> RequestResult<Vec<u8>> {
        self.guard(session).await?;
        let known = self
            .all_records()
            .await?
            .iter()
            .any(|el| el.documents().name_of(kind) == stored_name);
        if !known {
            return Err(RequestException::NoSuchDocument {
                kind,
                stored_name: stored_name.to_owned(),
            });
        }
        self.file_intake_service
            .read(kind, stored_name)
            .await
            .map_err(|source| RequestException::Storage { source })
    }
}
