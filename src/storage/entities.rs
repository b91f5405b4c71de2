use chrono::Duration;
use chrono::Utc;

use chrono::DateTime;
use serde::Deserialize;
use serde::Serialize;

use std::sync::Arc;

/// How a domain counts towards the daily score.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Productive,
    Distracting,
    Neutral,
}

/// A closed browsing session, one line of the on-disk log. Immutable once written;
/// the only way records disappear is a full-log clear.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionRecord {
    pub domain: Arc<str>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "duration_ser")]
    pub duration: Duration,
    pub classification: Classification,
}

impl SessionRecord {
    pub fn end(&self) -> DateTime<Utc> {
        self.start_time + self.duration
    }
}

mod duration_ser {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = i64::deserialize(deserializer)?;
        let duration = Duration::seconds(s);
        Ok(duration)
    }
}

/// The one session currently being tracked. Held in memory only: a process
/// restart discards whatever was open rather than recovering a stale interval.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ActiveSession {
    pub domain: Arc<str>,
    pub start_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};

    use super::{Classification, SessionRecord};

    #[test]
    fn record_round_trips_through_json() -> Result<()> {
        let record = SessionRecord {
            domain: "github.com".into(),
            start_time: Utc.with_ymd_and_hms(2024, 4, 5, 12, 0, 0).unwrap(),
            duration: Duration::seconds(42),
            classification: Classification::Productive,
        };

        let encoded = serde_json::to_string(&record)?;
        assert!(encoded.contains("\"duration\":42"));
        assert!(encoded.contains("\"productive\""));

        let decoded: SessionRecord = serde_json::from_str(&encoded)?;
        assert_eq!(decoded, record);
        Ok(())
    }

    #[test]
    fn timestamps_are_milliseconds() -> Result<()> {
        let record = SessionRecord {
            domain: "example.com".into(),
            start_time: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            duration: Duration::seconds(5),
            classification: Classification::Neutral,
        };

        let encoded = serde_json::to_string(&record)?;
        assert!(encoded.contains("1700000000123"));
        Ok(())
    }
}
