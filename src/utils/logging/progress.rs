//! Progress reporting for per-category estimation, using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Style for the category progress bar
pub const CATEGORY_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} categories {msg}";

/// Create a progress bar over categories
///
/// # Arguments
/// * `length` - Number of categories to estimate
/// * `visible` - Whether to draw the bar; a hidden bar still counts
///
/// # Returns
/// A configured `ProgressBar`
#[must_use]
pub fn create_category_progress_bar(length: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(CATEGORY_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Finish a progress bar with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
