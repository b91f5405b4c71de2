//! Read-only views over the session log: the daily score summary and the
//! weekly productivity heatmap. Both are pure functions of the records plus a
//! supplied "now", so the dashboard and the tests share the exact same code
//! paths.

pub mod daily;
pub mod heatmap;
