use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing the current moment across
/// the application. Signals carry no timestamps of their own, so everything
/// session-related asks this instead of `Utc::now`, which keeps the tracking
/// pipeline testable.
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
