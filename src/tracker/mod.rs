use std::path::PathBuf;

use anyhow::Result;
use collect::SignalCollectionModule;
use session::SessionTracker;
use signal::ActivitySignal;
use source::{ActivitySource, StdinActivitySource};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use track::TrackingModule;
use tracing::error;

use crate::{
    storage::{
        session_log::{SessionLog, SessionLogImpl},
        settings::{SettingsStore, SiteLists},
        SESSION_LOG_FILE, SETTINGS_FILE,
    },
    tracker::classify::Classifier,
    utils::clock::{Clock, DefaultClock},
};

pub mod classify;
pub mod collect;
pub mod session;
pub mod signal;
pub mod source;
pub mod track;

const SIGNAL_CHANNEL_CAPACITY: usize = 16;

/// Entry point for the `serve` command: wires stdin signals through the
/// session state machine into the log and runs until the browser closes the
/// pipe or the process is interrupted.
pub async fn start_tracker(dir: PathBuf) -> Result<()> {
    let settings = SettingsStore::new(dir.join(SETTINGS_FILE))?;
    let lists = settings.load_or_init().await?;
    let log = SessionLogImpl::new(dir.join(SESSION_LOG_FILE))?;

    let (sender, receiver) = mpsc::channel::<ActivitySignal>(SIGNAL_CHANNEL_CAPACITY);
    let shutdown_token = CancellationToken::new();

    let collector = create_collector(sender, StdinActivitySource::new(), &shutdown_token);
    let tracking = create_tracking(receiver, lists, log, DefaultClock);

    let (_, collection_result, tracking_result) = tokio::join!(
        detect_shutdown(shutdown_token),
        collector.run(),
        tracking.run(),
    );

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(tracking_result) = tracking_result {
        error!("Tracking module got an error {:?}", tracking_result);
    }

    Ok(())
}

/// Cancels the pipeline on Ctrl-C. Also completes once the token is cancelled
/// from elsewhere (source exhaustion), so the join above can finish.
async fn detect_shutdown(cancellation: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        }
        _ = cancellation.cancelled() => {}
    }
}

fn create_collector(
    sender: mpsc::Sender<ActivitySignal>,
    source: impl ActivitySource + 'static,
    shutdown_token: &CancellationToken,
) -> SignalCollectionModule {
    SignalCollectionModule::new(sender, Box::new(source), shutdown_token.clone())
}

fn create_tracking<L: SessionLog>(
    receiver: mpsc::Receiver<ActivitySignal>,
    lists: SiteLists,
    log: L,
    clock: impl Clock,
) -> TrackingModule<L> {
    TrackingModule::new(
        receiver,
        SessionTracker::new(Classifier::new(lists)),
        log,
        Box::new(clock),
    )
}
