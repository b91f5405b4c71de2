use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, TimeZone};
use now::DateTimeNow;

use crate::storage::entities::{Classification, SessionRecord};

/// The dashboard only lists this many sites.
const TOP_SITES_LIMIT: usize = 5;

#[derive(Debug, PartialEq, Eq)]
pub struct DomainUsage {
    pub domain: Arc<str>,
    pub duration: Duration,
}

/// Everything the daily dashboard view needs, derived from the log in one
/// pass.
#[derive(Debug)]
pub struct DailySummary {
    pub productive_time: Duration,
    pub distracting_time: Duration,
    /// 0.0 to 10.0, one decimal.
    pub score: f64,
    /// Total time per domain across all classifications, descending, at most
    /// five entries.
    pub top_sites: Vec<DomainUsage>,
}

/// Summarizes the records that started on `now`'s day, the half-open range
/// from midnight in `now`'s timezone to the next one. Pure over its inputs;
/// the caller picks the clock.
pub fn summarize_day<Tz: TimeZone>(records: &[SessionRecord], now: DateTime<Tz>) -> DailySummary {
    let day_start = now.beginning_of_day();
    let day_end = day_start.clone() + Duration::days(1);

    let mut productive_time = Duration::zero();
    let mut distracting_time = Duration::zero();
    let mut time_by_domain = HashMap::<Arc<str>, Duration>::new();

    for record in records {
        let started = record.start_time.with_timezone(&now.timezone());
        if started < day_start || started >= day_end {
            continue;
        }
        match record.classification {
            Classification::Productive => productive_time += record.duration,
            Classification::Distracting => distracting_time += record.duration,
            Classification::Neutral => {}
        }
        *time_by_domain
            .entry(record.domain.clone())
            .or_insert_with(Duration::zero) += record.duration;
    }

    let mut top_sites = time_by_domain
        .into_iter()
        .map(|(domain, duration)| DomainUsage { domain, duration })
        .collect::<Vec<_>>();
    // Descending by time, domain name as a deterministic tie break.
    top_sites.sort_by(|a, b| b.duration.cmp(&a.duration).then(a.domain.cmp(&b.domain)));
    top_sites.truncate(TOP_SITES_LIMIT);

    DailySummary {
        productive_time,
        distracting_time,
        score: productivity_score(productive_time, distracting_time),
        top_sites,
    }
}

/// Share of tracked (non-neutral) time that was productive, scaled to ten and
/// rounded to one decimal. Zero when nothing classified was tracked.
pub fn productivity_score(productive: Duration, distracting: Duration) -> f64 {
    let tracked = productive + distracting;
    if tracked.is_zero() {
        return 0.0;
    }
    let ratio = productive.num_seconds() as f64 / tracked.num_seconds() as f64;
    (ratio * 100.0).round() / 10.0
}
