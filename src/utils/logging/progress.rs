//! Progress reporting for multi-entity batch runs, using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the per-entity progress bar
pub const DEFAULT_ENTITY_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Create the progress bar ticked once per entity directory
///
/// A hidden bar is returned when `visible` is false, so callers can tick it
/// unconditionally.
#[must_use]
pub fn create_entity_progress_bar(length: u64, description: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    let style = ProgressStyle::with_template(DEFAULT_ENTITY_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(description.to_string());
    pb
}

/// Finish a progress bar with a final message
pub fn finish_progress_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
