//! Logging utilities.
//!
//! Centralizes logger initialization on top of the `log` facade with an
//! `env_logger` backend, plus the frame cadence used for periodic diagnostics.

mod init;

pub use init::{init_logging, is_diagnostic_frame, LoggingConfig, DIAGNOSTIC_INTERVAL};
