use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use super::signal::ActivitySignal;

/// Contract for whatever delivers browser activity to the tracker. The stdin
/// realization below is the production one; tests mock this boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivitySource: Send {
    /// Waits for the next signal. `Ok(None)` means the source is exhausted
    /// and tracking should wind down.
    async fn next_signal(&mut self) -> Result<Option<ActivitySignal>>;
}

/// Reads one JSON-encoded [ActivitySignal] per line from stdin, the shape a
/// native-messaging host companion extension writes. Unparseable lines are
/// logged and skipped; a malformed event must never take tracking down.
pub struct StdinActivitySource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinActivitySource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinActivitySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivitySource for StdinActivitySource {
    async fn next_signal(&mut self) -> Result<Option<ActivitySignal>> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ActivitySignal>(&line) {
                Ok(signal) => return Ok(Some(signal)),
                Err(e) => warn!("Skipping malformed signal {line}: {e}"),
            }
        }
        Ok(None)
    }
}
