//! Shared utilities for the hdkey binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
