pub mod dashboard;
pub mod manage;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{level_filters::LevelFilter, warn};

use crate::{
    storage::{
        entities::SessionRecord,
        session_log::{SessionLog, SessionLogImpl},
        SESSION_LOG_FILE,
    },
    tracker::start_tracker,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX, SERVE_PREFIX},
    },
};

use dashboard::{process_dashboard_command, process_heatmap_command, DashboardCommand, HeatmapCommand};
use manage::{
    process_clear_command, process_import_command, process_sites_command, ClearCommand,
    ImportCommand, SitesCommand,
};

#[derive(Parser, Debug)]
#[command(name = "Tabtime", version, long_about = None)]
#[command(about = "Tracks which sites you browse and scores how productive your day was", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable console logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Track live browser activity. Reads one JSON activity signal per stdin line, the way a native-messaging companion extension delivers them"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Show the productivity score, totals and top sites for a day")]
    Dashboard {
        #[command(flatten)]
        command: DashboardCommand,
    },
    #[command(about = "Show the weekly productive-time heatmap")]
    Heatmap {
        #[command(flatten)]
        command: HeatmapCommand,
    },
    #[command(about = "Show or replace the productive/distracting site lists")]
    Sites {
        #[command(flatten)]
        command: SitesCommand,
    },
    #[command(about = "One-time import of approximate sessions from a browser history database")]
    Import {
        #[command(flatten)]
        command: ImportCommand,
    },
    #[command(about = "Delete every stored session record")]
    Clear {
        #[command(flatten)]
        command: ClearCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };

    match args.commands {
        Commands::Serve { dir } => {
            let dir = dir.map_or_else(create_application_default_path, Ok)?;
            enable_logging(SERVE_PREFIX, &dir, logging_level, args.log)?;
            start_tracker(dir).await
        }
        Commands::Dashboard { command } => {
            let dir = create_application_default_path()?;
            enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;
            process_dashboard_command(command, dir).await
        }
        Commands::Heatmap { command } => {
            let dir = create_application_default_path()?;
            enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;
            process_heatmap_command(command, dir).await
        }
        Commands::Sites { command } => {
            let dir = create_application_default_path()?;
            enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;
            process_sites_command(command, dir).await
        }
        Commands::Import { command } => {
            let dir = create_application_default_path()?;
            enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;
            process_import_command(command, dir).await
        }
        Commands::Clear { command } => {
            let dir = create_application_default_path()?;
            enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;
            process_clear_command(command, dir).await
        }
    }
}

/// Loads the full log for a read-only view. Storage failures degrade to an
/// empty dashboard instead of an error.
pub(crate) async fn load_records(dir: &Path) -> Vec<SessionRecord> {
    let log = match SessionLogImpl::new(dir.join(SESSION_LOG_FILE)) {
        Ok(log) => log,
        Err(e) => {
            warn!("Could not open the session log: {e:?}");
            return vec![];
        }
    };
    match log.read_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not read the session log: {e:?}");
            vec![]
        }
    }
}
