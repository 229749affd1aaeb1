//! Shared utilities for the mirror bridge.

pub mod logging;
pub mod spans;

pub use logging::{init_logging, LogFormat, LogFormatError};
