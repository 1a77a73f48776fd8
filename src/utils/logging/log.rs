//! Logging utilities
//!
//! This module provides standardized logging functions for artifact loading
//! and per-disease inference.

use std::path::Path;

use itertools::Itertools;

/// How many column names to list before truncating a log line
pub const MAX_LOGGED_NAMES: usize = 20;

/// Initialise `env_logger`, defaulting to `info` when `RUST_LOG` is unset
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log a successful artifact load for one disease
pub fn log_load_success(disease: &str, features: usize) {
    log::info!("Loaded {disease} (features: {features})");
}

/// Log a failed artifact load for one disease
pub fn log_load_failure(disease: &str, error: &dyn std::error::Error) {
    log::error!("Error loading {disease}: {error}");
}

/// Render at most [`MAX_LOGGED_NAMES`] names as a comma-separated list
#[must_use]
pub fn summarize_names<S: AsRef<str>>(names: &[S]) -> String {
    let shown = names.iter().take(MAX_LOGGED_NAMES).map(AsRef::as_ref).join(", ");
    if names.len() > MAX_LOGGED_NAMES {
        format!("{shown}, ... ({} total)", names.len())
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_short_list() {
        assert_eq!(summarize_names(&["Age", "BMI"]), "Age, BMI");
        assert_eq!(summarize_names::<&str>(&[]), "");
    }

    #[test]
    fn test_summarize_truncates_long_list() {
        let names: Vec<String> = (0..25).map(|i| format!("c{i}")).collect();
        let summary = summarize_names(&names);
        assert!(summary.starts_with("c0, c1"));
        assert!(summary.ends_with("... (25 total)"));
        assert!(!summary.contains("c20"));
    }
}
