//! Shared utilities: logging, progress reporting and table export.

pub mod io;
pub mod logging;

/// Default batch size for reading input files
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Environment variable overriding the reader batch size
pub const BATCH_SIZE_ENV: &str = "BALANCE_BATCH_SIZE";

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var(BATCH_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}
