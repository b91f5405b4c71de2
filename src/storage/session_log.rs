use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use futures::StreamExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, warn};

use super::entities::SessionRecord;

/// Interface for abstracting the session log. The log is append-only from the
/// tracker's point of view; `replace_all` exists for the import merge and for
/// the user-initiated clear, both of which are last-write-wins rewrites.
pub trait SessionLog {
    fn append(&self, record: &SessionRecord) -> impl Future<Output = Result<()>> + Send;

    /// Reads every stored record in file order. A missing log reads as empty.
    fn read_all(&self) -> impl Future<Output = Result<Vec<SessionRecord>>> + Send;

    fn replace_all(&self, records: &[SessionRecord]) -> impl Future<Output = Result<()>> + Send;
}

/// The main realization of [SessionLog]. One JSONL file, one record per line,
/// guarded by advisory file locks so a dashboard read never observes a torn
/// append.
pub struct SessionLogImpl {
    path: PathBuf,
}

impl SessionLogImpl {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    async fn read_inner(path: &Path) -> std::result::Result<Vec<SessionRecord>, std::io::Error> {
        debug!("Reading session log {path:?}");
        let file = File::open(path).await?;
        file.lock_shared()?;
        let mut lines = LinesStream::new(BufReader::new(file).lines());
        let mut records = vec![];
        while let Some(Ok(line)) = lines.next().await {
            match serde_json::from_str::<SessionRecord>(&line) {
                Ok(v) => records.push(v),
                Err(e) => {
                    // ignore illegal values. Might happen after shutdowns
                    warn!("Found illegal json line in {path:?} {line}: {e}")
                }
            }
        }

        lines
            .into_inner()
            .into_inner()
            .into_inner()
            .unlock_async()
            .await?;

        Ok(records)
    }

    async fn write_line(file: &mut File, record: &SessionRecord) -> Result<()> {
        let mut buffer = serde_json::to_vec(record)?;
        buffer.push(b'\n');
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }

    async fn write_lines(file: &mut File, records: &[SessionRecord]) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

impl SessionLog for SessionLogImpl {
    async fn append(&self, record: &SessionRecord) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::write_line(&mut file, record).await;
        file.unlock_async().await?;
        result
    }

    async fn read_all(&self) -> Result<Vec<SessionRecord>> {
        match Self::read_inner(&self.path).await {
            Ok(records) => Ok(records),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }

    async fn replace_all(&self, records: &[SessionRecord]) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_lines(&mut file, records).await;
        file.unlock_async().await?;
        result
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;
    use tokio::io::AsyncWriteExt;

    use crate::storage::entities::{Classification, SessionRecord};

    use super::{SessionLog, SessionLogImpl};

    fn record(domain: &str, minute: u32) -> SessionRecord {
        SessionRecord {
            domain: domain.into(),
            start_time: Utc.with_ymd_and_hms(2018, 7, 4, 10, minute, 0).unwrap(),
            duration: Duration::seconds(30),
            classification: Classification::Neutral,
        }
    }

    #[tokio::test]
    async fn missing_log_reads_as_empty() -> Result<()> {
        let dir = tempdir()?;
        let log = SessionLogImpl::new(dir.path().join("sessions.jsonl"))?;
        assert_eq!(log.read_all().await?, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn append_preserves_order() -> Result<()> {
        let dir = tempdir()?;
        let log = SessionLogImpl::new(dir.path().join("sessions.jsonl"))?;

        log.append(&record("github.com", 0)).await?;
        log.append(&record("reddit.com", 1)).await?;
        log.append(&record("github.com", 2)).await?;

        let stored = log.read_all().await?;
        assert_eq!(stored.len(), 3);
        assert_eq!(&*stored[1].domain, "reddit.com");
        assert_eq!(stored[2], record("github.com", 2));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_lines_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sessions.jsonl");
        let log = SessionLogImpl::new(path.clone())?;

        log.append(&record("github.com", 0)).await?;
        {
            let mut file = tokio::fs::File::options().append(true).open(&path).await?;
            file.write_all(b"{\"domain\": trunc\n").await?;
            file.flush().await?;
        }
        log.append(&record("reddit.com", 1)).await?;

        let stored = log.read_all().await?;
        assert_eq!(stored.len(), 2);
        assert_eq!(&*stored[0].domain, "github.com");
        assert_eq!(&*stored[1].domain, "reddit.com");
        Ok(())
    }

    #[tokio::test]
    async fn replace_all_rewrites_the_log() -> Result<()> {
        let dir = tempdir()?;
        let log = SessionLogImpl::new(dir.path().join("sessions.jsonl"))?;

        log.append(&record("github.com", 0)).await?;
        log.append(&record("reddit.com", 1)).await?;

        let merged = vec![record("docs.google.com", 2)];
        log.replace_all(&merged).await?;
        assert_eq!(log.read_all().await?, merged);

        log.replace_all(&[]).await?;
        assert_eq!(log.read_all().await?, vec![]);
        Ok(())
    }
}
