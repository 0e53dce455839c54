use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use domain_request::{
    model::vo::{DocumentKind, DocumentUpload, StoredDocuments},
    service::FileIntakeService,
};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::warn;
use typed_builder::TypedBuilder;

/// Seconds a submission's stamp may move forward while its names are taken.
const NAME_ATTEMPTS: i64 = 60;

#[derive(TypedBuilder, Clone)]
pub struct LocalFileIntakeServiceImpl {
    #[builder(default = "uploads/memorandum".into(), setter(into))]
    memorandum_dir: PathBuf,
    #[builder(default = "uploads/activity_matrix".into(), setter(into))]
    activity_matrix_dir: PathBuf,
}

impl LocalFileIntakeServiceImpl {
    fn dir(&self, kind: DocumentKind) -> &Path {
        match kind {
            DocumentKind::Memorandum => &self.memorandum_dir,
            DocumentKind::ActivityMatrix => &self.activity_matrix_dir,
        }
    }

    fn path(&self, kind: DocumentKind, stored_name: &str) -> anyhow::Result<PathBuf> {
        let file_name = Path::new(stored_name)
            .file_name()
            .filter(|name| *name == stored_name)
            .ok_or(anyhow!("Stored name: {stored_name:?} is not a plain file name."))?;
        Ok(self.dir(kind).join(file_name))
    }

    /// `None` when a file of that name already exists.
    async fn write(
        &self,
        kind: DocumentKind,
        upload: &DocumentUpload,
        at: NaiveDateTime,
    ) -> anyhow::Result<Option<String>> {
        let stored_name = upload.stored_name(at);
        let path = self.path(kind, &stored_name)?;
        Ok(create_new_and_write(&path, &upload.content)
            .await?
            .then_some(stored_name))
    }

    async fn remove(&self, kind: DocumentKind, stored_name: &str) -> anyhow::Result<()> {
        let path = self.path(kind, stored_name)?;
        if tokio::fs::try_exists(&path).await? {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn remove_memorandum(&self, memorandum_file: &str) {
        if let Err(e) = self.remove(DocumentKind::Memorandum, memorandum_file).await {
            warn!(%memorandum_file, "Cannot remove memorandum after failed intake: {e}");
        }
    }
}

/// Writes `content` to a file that must not exist yet; `false` when it does.
async fn create_new_and_write(path: &Path, content: &[u8]) -> anyhow::Result<bool> {
    tokio::fs::create_dir_all(&path.parent().ok_or(anyhow!("path: {path:?} doesn't has parent."))?)
        .await?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path).await {
        Ok(x) => x,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let written = match file.write_all(content).await {
        Ok(()) => file.sync_data().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!("Cannot remove partly written {path:?}: {cleanup}");
        }
        return Err(e.into());
    }
    Ok(true)
}

#[async_trait]
impl FileIntakeService for LocalFileIntakeServiceImpl {
    async fn store(
        &self,
        memorandum: &DocumentUpload,
        activity_matrix: &DocumentUpload,
        at: NaiveDateTime,
    ) -> anyhow::Result<StoredDocuments> {
        for offset in 0..NAME_ATTEMPTS {
            let stamp = at + Duration::seconds(offset);
            let Some(memorandum_file) =
                self.write(DocumentKind::Memorandum, memorandum, stamp).await?
            else {
                continue;
            };
            match self.write(DocumentKind::ActivityMatrix, activity_matrix, stamp).await {
                Ok(Some(activity_matrix_file)) => {
                    return Ok(StoredDocuments {
                        memorandum_file,
                        activity_matrix_file,
                    })
                }
                Ok(None) => self.remove_memorandum(&memorandum_file).await,
                Err(e) => {
                    self.remove_memorandum(&memorandum_file).await;
                    return Err(e);
                }
            }
        }
        Err(anyhow!(
            "No free stored names for {:?} and {:?} within {NAME_ATTEMPTS} seconds of {at}.",
            memorandum.file_name,
            activity_matrix.file_name
        ))
    }

    async fn discard(&self, documents: &StoredDocuments) -> anyhow::Result<()> {
        for kind in DocumentKind::ALL {
            self.remove(kind, documents.name_of(kind)).await?;
        }
        Ok(())
    }

    async fn read(&self, kind: DocumentKind, stored_name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path(kind, stored_name)?;
        Ok(tokio::fs::read(path).await?)
    }
}
