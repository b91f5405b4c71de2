use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::error;

use crate::{
    import::{chrome::ChromeHistorySource, import_history},
    storage::{
        session_log::{SessionLog, SessionLogImpl},
        settings::{format_site_list, parse_site_list, SettingsStore},
        SESSION_LOG_FILE, SETTINGS_FILE,
    },
    tracker::classify::Classifier,
};

#[derive(Debug, Parser)]
pub struct SitesCommand {
    #[arg(
        long,
        help = "Replace the productive list with the newline-delimited entries of this file"
    )]
    productive: Option<PathBuf>,
    #[arg(
        long,
        help = "Replace the distracting list with the newline-delimited entries of this file"
    )]
    distracting: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ImportCommand {
    #[arg(
        long,
        help = "Path to the browser's History SQLite database, e.g. ~/.config/google-chrome/Default/History"
    )]
    db: PathBuf,
}

#[derive(Debug, Parser)]
pub struct ClearCommand {
    #[arg(long, help = "Confirm deleting every tracked session")]
    yes: bool,
}

/// Shows the configured site lists, or replaces one or both of them from
/// newline-delimited files.
pub async fn process_sites_command(command: SitesCommand, dir: PathBuf) -> Result<()> {
    let store = SettingsStore::new(dir.join(SETTINGS_FILE))?;
    let mut lists = store.load_or_init().await?;

    let mut changed = false;
    if let Some(path) = command.productive {
        lists.productive_sites = parse_site_list(&tokio::fs::read_to_string(path).await?);
        changed = true;
    }
    if let Some(path) = command.distracting {
        lists.distracting_sites = parse_site_list(&tokio::fs::read_to_string(path).await?);
        changed = true;
    }

    if changed {
        store.save(&lists).await?;
        println!("Settings saved");
        return Ok(());
    }

    println!("Productive sites:");
    println!("{}", format_site_list(&lists.productive_sites));
    println!();
    println!("Distracting sites:");
    println!("{}", format_site_list(&lists.distracting_sites));
    Ok(())
}

/// One-shot history import. A failed fetch is reported and leaves the log
/// untouched; it is never fatal.
pub async fn process_import_command(command: ImportCommand, dir: PathBuf) -> Result<()> {
    let store = SettingsStore::new(dir.join(SETTINGS_FILE))?;
    let classifier = Classifier::new(store.load_or_init().await?);
    let log = SessionLogImpl::new(dir.join(SESSION_LOG_FILE))?;
    let source = ChromeHistorySource::new(command.db);

    match import_history(&source, &log, &classifier, Utc::now()).await {
        Ok(0) => println!("No history found to import"),
        Ok(count) => println!("Imported {count} sessions"),
        Err(e) => {
            error!("History import failed {e:?}");
            println!("History import failed; the session log was left untouched");
        }
    }
    Ok(())
}

/// Deletes the whole session log, guarded by an explicit confirmation flag.
pub async fn process_clear_command(command: ClearCommand, dir: PathBuf) -> Result<()> {
    if !command.yes {
        println!(
            "This deletes every tracked session and cannot be undone. Re-run with --yes to confirm."
        );
        return Ok(());
    }

    let log = SessionLogImpl::new(dir.join(SESSION_LOG_FILE))?;
    let count = log.read_all().await?.len();
    log.replace_all(&[]).await?;
    println!("Cleared {count} session records");
    Ok(())
}
