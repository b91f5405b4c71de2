use anyhow::Result;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info};

use crate::{
    storage::session_log::SessionLog,
    tracker::{session::SessionTracker, signal::ActivitySignal},
    utils::clock::Clock,
};

/// Consumes forwarded activity signals, drives the session state machine and
/// appends whatever it closes to the log. A failed append loses that one
/// record and nothing else.
pub struct TrackingModule<L> {
    receiver: Receiver<ActivitySignal>,
    tracker: SessionTracker,
    log: L,
    clock: Box<dyn Clock>,
}

impl<L: SessionLog> TrackingModule<L> {
    pub fn new(
        receiver: Receiver<ActivitySignal>,
        tracker: SessionTracker,
        log: L,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            receiver,
            tracker,
            log,
            clock,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(signal) = self.receiver.recv().await {
            debug!("Applying signal {:?}", signal);
            let now = self.clock.time();
            if let Some(record) = self.tracker.apply(&signal, now) {
                match self.log.append(&record).await {
                    Ok(_) => info!("Recorded {} for {}", record.domain, record.duration),
                    Err(e) => error!("Error appending record {:?}: {e:?}", record),
                }
            }
        }

        // The signal stream ended cleanly, so close out the session that is
        // still open instead of discarding its elapsed time.
        if let Some(record) = self.tracker.stop(self.clock.time()) {
            self.log.append(&record).await?;
        }
        self.receiver.close();
        Ok(())
    }
}
