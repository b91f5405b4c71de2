//! Durable state of the tracker.
//! The basic idea is:
//!  - Closed sessions live in one append-only JSONL log, [session_log::SessionLogImpl].
//!  - The two domain lists live in a small JSON settings file, [settings::SettingsStore].
//!  - Records are flat and immutable; the only bulk mutations are the import
//!    merge and the user-initiated clear.

pub mod entities;
pub mod session_log;
pub mod settings;

/// Log file name inside the application directory.
pub const SESSION_LOG_FILE: &str = "sessions.jsonl";

/// Settings file name inside the application directory.
pub const SETTINGS_FILE: &str = "settings.json";
