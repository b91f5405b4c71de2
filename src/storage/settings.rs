use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The two user-configurable domain lists. Entries are substrings matched
/// against normalized hostnames, so full or partial hostnames both work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLists {
    pub productive_sites: Vec<String>,
    pub distracting_sites: Vec<String>,
}

impl Default for SiteLists {
    fn default() -> Self {
        Self {
            productive_sites: [
                "github.com",
                "stackoverflow.com",
                "developer.mozilla.org",
                "docs.google.com",
                "udemy.com",
            ]
            .map(String::from)
            .to_vec(),
            distracting_sites: [
                "youtube.com",
                "facebook.com",
                "twitter.com",
                "reddit.com",
                "netflix.com",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Parses a newline-delimited site list the way the settings surface edits it.
/// Entries are trimmed, blank lines dropped, order preserved.
pub fn parse_site_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn format_site_list(sites: &[String]) -> String {
    sites.join("\n")
}

/// On-disk home of [SiteLists], a single JSON file in the application
/// directory.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Loads the stored lists, seeding the defaults on first use so a fresh
    /// install classifies sensibly before the user edits anything.
    pub async fn load_or_init(&self) -> Result<SiteLists> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {:?}, writing defaults", self.path);
                let defaults = SiteLists::default();
                self.save(&defaults).await?;
                Ok(defaults)
            }
            Err(e) => Err(e)?,
        }
    }

    pub async fn save(&self, lists: &SiteLists) -> Result<()> {
        let text = serde_json::to_string_pretty(lists)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{format_site_list, parse_site_list, SettingsStore, SiteLists};

    #[test]
    fn site_list_round_trips_minus_blank_lines() {
        let text = "github.com\n\n  docs.google.com  \nudemy.com\n";
        let parsed = parse_site_list(text);
        assert_eq!(parsed, vec!["github.com", "docs.google.com", "udemy.com"]);
        assert_eq!(
            format_site_list(&parsed),
            "github.com\ndocs.google.com\nudemy.com"
        );
        assert_eq!(parse_site_list(&format_site_list(&parsed)), parsed);
    }

    #[tokio::test]
    async fn first_load_seeds_defaults() -> Result<()> {
        let dir = tempdir()?;
        let store = SettingsStore::new(dir.path().join("settings.json"))?;

        let lists = store.load_or_init().await?;
        assert_eq!(lists, SiteLists::default());

        // The seeded file is now the durable copy.
        let reloaded = store.load_or_init().await?;
        assert_eq!(reloaded, lists);
        Ok(())
    }

    #[tokio::test]
    async fn saved_lists_are_reloaded_in_order() -> Result<()> {
        let dir = tempdir()?;
        let store = SettingsStore::new(dir.path().join("settings.json"))?;

        let lists = SiteLists {
            productive_sites: parse_site_list("wiki.internal\nlinear.app"),
            distracting_sites: parse_site_list("news.ycombinator.com"),
        };
        store.save(&lists).await?;

        assert_eq!(store.load_or_init().await?, lists);
        Ok(())
    }
}
