use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::storage::entities::{ActiveSession, SessionRecord};

use super::{
    classify::Classifier,
    signal::{ActivitySignal, IdleState},
};

/// Sessions that close faster than this are noise (mis-clicked tabs, focus
/// flicker) and are never stored.
const MIN_LIVE_DURATION: Duration = Duration::seconds(2);

/// The session state machine. Owns the single "currently tracked" session;
/// `None` means idle. Starting always stops first, so two sessions can never
/// overlap in the log.
pub struct SessionTracker {
    active: Option<ActiveSession>,
    classifier: Classifier,
}

impl SessionTracker {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            active: None,
            classifier,
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Closes the current session if one is open. Returns the record to
    /// append, or `None` when idle or when the session was too short to keep.
    /// The tracker is idle afterwards either way.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<SessionRecord> {
        let active = self.active.take()?;
        let elapsed = Duration::seconds((now - active.start_time).num_seconds());
        if elapsed <= MIN_LIVE_DURATION {
            trace!("Dropping short session on {} ({elapsed})", active.domain);
            return None;
        }
        let classification = self.classifier.classify(&active.domain);
        Some(SessionRecord {
            domain: active.domain,
            start_time: active.start_time,
            duration: elapsed,
            classification,
        })
    }

    /// Closes any open session, then begins tracking `url` if it resolves to
    /// a trackable domain. A missing or non-http(s) address degrades to a
    /// plain stop.
    pub fn start(&mut self, url: Option<&str>, now: DateTime<Utc>) -> Option<SessionRecord> {
        let domain = url.and_then(trackable_domain);
        let closed = self.stop(now);
        if let Some(domain) = domain {
            trace!("Tracking {domain}");
            self.active = Some(ActiveSession {
                domain: domain.into(),
                start_time: now,
            });
        }
        closed
    }

    /// Maps an activity signal onto the start/stop transitions.
    pub fn apply(&mut self, signal: &ActivitySignal, now: DateTime<Utc>) -> Option<SessionRecord> {
        match signal {
            ActivitySignal::TabActivated { url } | ActivitySignal::TabNavigated { url } => {
                self.start(url.as_deref(), now)
            }
            ActivitySignal::WindowFocusChanged { url: None } => self.stop(now),
            ActivitySignal::WindowFocusChanged { url } => self.start(url.as_deref(), now),
            ActivitySignal::IdleStateChanged {
                state: IdleState::Active,
                url,
            } => self.start(url.as_deref(), now),
            ActivitySignal::IdleStateChanged { .. } => self.stop(now),
        }
    }
}

/// Resolves an address to the domain used for classification and aggregation:
/// http(s) only, hostname lowercased, leading `www.` stripped.
pub fn trackable_domain(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");
    if host.is_empty() {
        return None;
    }
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
