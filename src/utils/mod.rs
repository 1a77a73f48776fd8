//! Utility functions shared across the predictor

pub mod logging;

pub use logging::init_logging;
