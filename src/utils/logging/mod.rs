//! Logging utilities for artifact loading and inference

pub mod log;

// Re-export commonly used functions for convenience
pub use log::{
    init_logging, log_load_failure, log_load_success, log_operation_start, summarize_names,
};
