//! Tracks which web domains you visit, classifies every browsing session as
//! productive, distracting or neutral using configurable site lists, and
//! turns the resulting log into a daily productivity score and a weekly
//! activity heatmap.
//!

pub mod cli;
pub mod import;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod utils;
