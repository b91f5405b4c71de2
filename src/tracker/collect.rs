use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{signal::ActivitySignal, source::ActivitySource};

/// Pulls signals out of an [ActivitySource] and forwards them to the tracking
/// module. Per-signal source errors are logged and survived; only channel
/// breakage or cancellation ends the loop.
pub struct SignalCollectionModule {
    next: mpsc::Sender<ActivitySignal>,
    source: Box<dyn ActivitySource>,
    shutdown: CancellationToken,
}

impl SignalCollectionModule {
    pub fn new(
        next: mpsc::Sender<ActivitySignal>,
        source: Box<dyn ActivitySource>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            next,
            source,
            shutdown,
        }
    }

    /// Executes the collector event loop.
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                // Cancelation drops the sender channel, which in turn winds
                // down the tracking module.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                signal = self.source.next_signal() => match signal {
                    Ok(Some(signal)) => {
                        debug!("Sending signal {:?}", signal);
                        self.next
                            .send(signal)
                            .await
                            .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                    }
                    Ok(None) => {
                        info!("Activity source closed");
                        // Lets the shutdown watcher finish as well.
                        self.shutdown.cancel();
                        return Ok(());
                    }
                    Err(e) => {
                        error!("Encountered an error reading a signal {:?}", e)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::tracker::{signal::ActivitySignal, source::MockActivitySource};

    use super::SignalCollectionModule;

    #[tokio::test]
    async fn forwards_signals_until_the_source_closes() -> Result<()> {
        let mut source = MockActivitySource::new();
        let mut scripted = vec![
            Ok(Some(ActivitySignal::TabActivated {
                url: Some("https://github.com".into()),
            })),
            Err(anyhow!("tab closed mid-query")),
            Ok(Some(ActivitySignal::WindowFocusChanged { url: None })),
            Ok(None),
        ]
        .into_iter();
        source
            .expect_next_signal()
            .returning(move || scripted.next().unwrap());

        let (sender, mut receiver) = mpsc::channel(10);
        let module =
            SignalCollectionModule::new(sender, Box::new(source), CancellationToken::new());
        module.run().await?;

        let mut forwarded = vec![];
        while let Some(signal) = receiver.recv().await {
            forwarded.push(signal);
        }

        // The source error is swallowed, everything else arrives in order.
        assert_eq!(
            forwarded,
            vec![
                ActivitySignal::TabActivated {
                    url: Some("https://github.com".into())
                },
                ActivitySignal::WindowFocusChanged { url: None },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() -> Result<()> {
        let mut source = MockActivitySource::new();
        source.expect_next_signal().returning(|| Ok(None));

        let token = CancellationToken::new();
        let (sender, _receiver) = mpsc::channel(1);
        let module = SignalCollectionModule::new(sender, Box::new(source), token.clone());

        token.cancel();
        module.run().await?;
        Ok(())
    }
}
