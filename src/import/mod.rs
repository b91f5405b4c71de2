//! One-shot reconstruction of approximate sessions from browser navigation
//! history, used to seed the log before any live tracking has happened.

pub mod chrome;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::{
    storage::{entities::SessionRecord, session_log::SessionLog},
    tracker::{classify::Classifier, session::trackable_domain},
};

/// How far back the import reaches.
const IMPORT_WINDOW: Duration = Duration::seconds(7 * 24 * 60 * 60);

/// A gap between two visits longer than this says "idle", not "fifteen-plus
/// minutes on that site".
const MAX_VISIT_DURATION: Duration = Duration::seconds(900);

const MIN_VISIT_DURATION: Duration = Duration::seconds(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryVisit {
    pub url: String,
    pub visit_time: DateTime<Utc>,
}

/// Contract for a navigation-history backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource {
    /// Returns every recorded visit at or after `start`.
    async fn visits_since(&self, start: DateTime<Utc>) -> Result<Vec<HistoryVisit>>;
}

/// Derives session records from a visit list. Each visit's duration is the
/// gap to the next visit, capped and floored; the final visit has no successor
/// to bound it and never becomes a record.
pub fn sessions_from_visits(
    mut visits: Vec<HistoryVisit>,
    classifier: &Classifier,
) -> Vec<SessionRecord> {
    visits.sort_by_key(|visit| visit.visit_time);

    let mut records = vec![];
    for pair in visits.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let Some(domain) = trackable_domain(&current.url) else {
            continue;
        };
        let gap = next.visit_time - current.visit_time;
        let duration = Duration::seconds(gap.num_seconds()).min(MAX_VISIT_DURATION);
        if duration < MIN_VISIT_DURATION {
            continue;
        }
        let classification = classifier.classify(&domain);
        records.push(SessionRecord {
            domain: domain.into(),
            start_time: current.visit_time,
            duration,
            classification,
        });
    }
    records
}

/// Runs the import: fetch, derive, merge onto the existing log in a single
/// write. A fetch that yields nothing is a no-op; a failed fetch propagates
/// before anything is touched, so the log is never partially merged. Returns
/// the number of imported records.
pub async fn import_history(
    source: &impl HistorySource,
    log: &impl SessionLog,
    classifier: &Classifier,
    now: DateTime<Utc>,
) -> Result<usize> {
    let visits = source.visits_since(now - IMPORT_WINDOW).await?;
    if visits.is_empty() {
        info!("History source returned no visits, nothing to import");
        return Ok(0);
    }

    let imported = sessions_from_visits(visits, classifier);
    let mut merged = log.read_all().await?;
    let count = imported.len();
    merged.extend(imported);
    log.replace_all(&merged).await?;
    info!("History import complete. Added {count} entries");
    Ok(count)
}
