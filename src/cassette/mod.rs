//! Record/replay infrastructure for deterministic runs and tests.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
