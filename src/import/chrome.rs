use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use super::{HistorySource, HistoryVisit};

/// Chrome stores visit times as microseconds since 1601-01-01 (the WebKit
/// epoch), 11644473600 seconds before the Unix one.
const WEBKIT_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600 * 1_000_000;

/// Mirrors the upstream history query's result limit.
const MAX_RESULTS: u32 = 10_000;

/// Reads visits straight out of a Chrome/Chromium `History` SQLite database.
/// Open it read-only; Chrome holds a lock on the live file, in which case the
/// query fails and the import stays a no-op.
pub struct ChromeHistorySource {
    path: PathBuf,
}

impl ChromeHistorySource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn query_visits(path: &PathBuf, start: DateTime<Utc>) -> Result<Vec<HistoryVisit>> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("opening history database {path:?}"))?;

        let mut stmt = conn.prepare(
            "SELECT url, last_visit_time FROM urls \
             WHERE last_visit_time >= ?1 ORDER BY last_visit_time ASC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![to_webkit_micros(start), MAX_RESULTS], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut visits = vec![];
        for row in rows {
            let (url, micros) = row?;
            // Entries with a bogus timestamp are useless for gap math.
            if let Some(visit_time) = from_webkit_micros(micros) {
                visits.push(HistoryVisit { url, visit_time });
            }
        }
        debug!("Read {} visits from {path:?}", visits.len());
        Ok(visits)
    }
}

#[async_trait]
impl HistorySource for ChromeHistorySource {
    async fn visits_since(&self, start: DateTime<Utc>) -> Result<Vec<HistoryVisit>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::query_visits(&path, start)).await?
    }
}

fn to_webkit_micros(time: DateTime<Utc>) -> i64 {
    time.timestamp_micros() + WEBKIT_EPOCH_OFFSET_MICROS
}

fn from_webkit_micros(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros - WEBKIT_EPOCH_OFFSET_MICROS)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use rusqlite::{params, Connection};
    use tempfile::tempdir;

    use crate::import::HistorySource;

    use super::{from_webkit_micros, to_webkit_micros, ChromeHistorySource};

    fn seed_history(conn: &Connection, rows: &[(&str, i64)]) -> Result<()> {
        conn.execute(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, title TEXT, \
             visit_count INTEGER, last_visit_time INTEGER)",
            [],
        )?;
        for (url, time) in rows {
            conn.execute(
                "INSERT INTO urls (url, title, visit_count, last_visit_time) \
                 VALUES (?1, '', 1, ?2)",
                params![url, time],
            )?;
        }
        Ok(())
    }

    #[test]
    fn webkit_timestamps_round_trip() {
        let time = Utc.with_ymd_and_hms(2024, 4, 5, 12, 0, 0).unwrap();
        assert_eq!(from_webkit_micros(to_webkit_micros(time)), Some(time));
        // The WebKit epoch itself predates Unix time.
        assert!(from_webkit_micros(0).unwrap() < Utc.timestamp_opt(0, 0).unwrap());
    }

    #[tokio::test]
    async fn reads_visits_in_ascending_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("History");

        let start = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 4, 3, 9, 0, 0).unwrap();
        let stale = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        {
            let conn = Connection::open(&path)?;
            seed_history(
                &conn,
                &[
                    ("https://github.com", to_webkit_micros(late)),
                    ("https://example.org", to_webkit_micros(early)),
                    ("https://old.example", to_webkit_micros(stale)),
                ],
            )?;
        }

        let source = ChromeHistorySource::new(path);
        let visits = source.visits_since(start).await?;

        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].url, "https://example.org");
        assert_eq!(visits[0].visit_time, early);
        assert_eq!(visits[1].url, "https://github.com");
        Ok(())
    }

    #[tokio::test]
    async fn missing_database_is_an_error() {
        let dir = tempdir().unwrap();
        let source = ChromeHistorySource::new(dir.path().join("does-not-exist"));
        let result = source
            .visits_since(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
            .await;
        assert!(result.is_err());
    }
}
