use crate::{
    exception::RequestResult,
    model::{
        entity::RequestRecord,
        vo::{
            AdminSession, DocumentKind, DocumentUpload, MailMessage, NotificationOutcome,
            ReferenceNo, ReviewEntry, StoredDocuments,
        },
    },
    repository::RequestRecordRepo,
    service::{
        AccessGateService, FileIntakeService, MailTransport, NotifyService, ReferenceService,
    },
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockall::mock;
use uuid::Uuid;

mock! {
    pub RequestRecordRepo {}
    #[async_trait]
    impl RequestRecordRepo for RequestRecordRepo {
        async fn get_all(&self) -> anyhow::Result<Vec<RequestRecord>>;
        async fn get_by_reference(
            &self,
            reference_no: &ReferenceNo,
        ) -> anyhow::Result<Option<RequestRecord>>;
        async fn count(&self) -> anyhow::Result<usize>;
        async fn insert(&self, record: &RequestRecord) -> anyhow::Result<()>;
        async fn update_review(&self, entry: &ReviewEntry) -> anyhow::Result<()>;
    }
}

mock! {
    pub FileIntakeService {}
    #[async_trait]
    impl FileIntakeService for FileIntakeService {
        async fn store(
            &self,
            memorandum: &DocumentUpload,
            activity_matrix: &DocumentUpload,
            at: NaiveDateTime,
        ) -> anyhow::Result<StoredDocuments>;
        async fn discard(&self, documents: &StoredDocuments) -> anyhow::Result<()>;
        async fn read(&self, kind: DocumentKind, stored_name: &str) -> anyhow::Result<Vec<u8>>;
    }
}

mock! {
    pub ReferenceService {}
    #[async_trait]
    impl ReferenceService for ReferenceService {
        async fn next_reference(&self, year: i32) -> anyhow::Result<ReferenceNo>;
    }
}

mock! {
    pub NotifyService {}
    #[async_trait]
    impl NotifyService for NotifyService {
        async fn notify_submitted(&self, record: &RequestRecord)
            -> anyhow::Result<NotificationOutcome>;
    }
}

mock! {
    pub MailTransport {}
    #[async_trait]
    impl MailTransport for MailTransport {
        async fn send(&self, message: &MailMessage) -> anyhow::Result<()>;
    }
}

mock! {
    pub AccessGateService {}
    #[async_trait]
    impl AccessGateService for AccessGateService {
        async fn login(&self, password: &str) -> RequestResult<AdminSession>;
        async fn authorize(&self, session_id: Uuid) -> RequestResult<AdminSession>;
        async fn logout(&self, session_id: Uuid) -> RequestResult<()>;
    }
}
