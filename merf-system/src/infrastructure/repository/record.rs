use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use domain_request::{
    model::{
        entity::{RecordTable, RequestRecord},
        vo::{RecordEvent, ReferenceNo, ReviewEntry},
    },
    repository::RequestRecordRepo,
};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};
use tracing::{error, info, warn};

/// Record store backed by an append-only JSON lines log.
///
/// The whole log is replayed into memory on open; every change is appended
/// and synced before the in-memory table moves on. A failed append is cut
/// back to the previous length, and an unfinished last line left by a crash
/// is dropped on open.
pub struct JsonlRecordRepo {
    path: PathBuf,
    table: Mutex<RecordTable>,
}

impl JsonlRecordRepo {
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let table = RecordTable::replay(read_events(&path).await?)
            .with_context(|| format!("Cannot replay record log: {path:?}"))?;
        if table.is_empty() {
            info!("Starting with an empty record log at {path:?}.");
        } else {
            info!("Loaded {} records from {path:?}.", table.len());
        }
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    async fn append(&self, event: RecordEvent) -> anyhow::Result<()> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        next.apply(event.clone())?;

        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        if let Some(parent) = self.path.parent().filter(|el| !el.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        let len = file.metadata().await?.len();
        append_or_rollback(&mut file, len, &line).await?;

        *table = next;
        Ok(())
    }
}

#[async_trait::async_trait]
trait LogSink: Send {
    async fn write_line(&mut self, line: &[u8]) -> std::io::Result<()>;
    async fn truncate(&mut self, len: u64) -> std::io::Result<()>;
}

#[async_trait::async_trait]
impl LogSink for File {
    async fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.write_all(line).await?;
        self.sync_data().await
    }

    async fn truncate(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len).await?;
        self.sync_data().await
    }
}

async fn append_or_rollback<S: LogSink>(
    sink: &mut S,
    len: u64,
    line: &[u8],
) -> anyhow::Result<()> {
    if let Err(e) = sink.write_line(line).await {
        if let Err(rollback) = sink.truncate(len).await {
            error!("Cannot cut record log back to {len} bytes: {rollback}");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Drops or completes a last line that has no terminating newline.
async fn settle_tail(path: &Path, content: &mut Vec<u8>) -> anyhow::Result<()> {
    let complete = content.iter().rposition(|el| *el == b'\n').map_or(0, |i| i + 1);
    if complete == content.len() {
        return Ok(());
    }
    let tail = &content[complete..];
    if serde_json::from_slice::<RecordEvent>(tail).is_ok() {
        let mut file = OpenOptions::new().append(true).open(path).await?;
        file.write_all(b"\n").await?;
        file.sync_data().await?;
        content.push(b'\n');
    } else {
        warn!(
            "Dropping {} bytes of an unfinished line at the end of {path:?}.",
            tail.len()
        );
        let file = OpenOptions::new().write(true).open(path).await?;
        file.set_len(complete as u64).await?;
        file.sync_data().await?;
        content.truncate(complete);
    }
    Ok(())
}

async fn read_events(path: &Path) -> anyhow::Result<Vec<RecordEvent>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(vec![]);
    }
    let mut content = tokio::fs::read(path).await?;
    settle_tail(path, &mut content).await?;
    let content = String::from_utf8(content)
        .with_context(|| format!("Record log is not UTF-8: {path:?}"))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| anyhow!("Bad record log line {} in {path:?}: {e}", n + 1))
        })
        .collect()
}

#[async_trait::async_trait]
impl RequestRecordRepo for JsonlRecordRepo {
    async fn get_all(&self) -> anyhow::Result<Vec<RequestRecord>> {
        Ok(self.table.lock().await.records().to_vec())
    }

    async fn get_by_reference(
        &self,
        reference_no: &ReferenceNo,
    ) -> anyhow::Result<Option<RequestRecord>> {
        Ok(self.table.lock().await.get(reference_no).cloned())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.table.lock().await.len())
    }

    async fn insert(&self, record: &RequestRecord) -> anyhow::Result<()> {
        self.append(RecordEvent::Created {
            record: record.to_owned(),
        })
        .await
    }

    async fn update_review(&self, entry: &ReviewEntry) -> anyhow::Result<()> {
        self.append(RecordEvent::Reviewed(entry.to_owned())).await
    }
}
