//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar for batch image fetches
///
/// Shows an indicatif bar in interactive mode, one plain line per image in CI.
pub struct FetchProgress {
    bar: Option<ProgressBar>,
}

impl FetchProgress {
    /// Create a progress indicator for `total` images
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = if ctx.decorated() {
            let bar = ProgressBar::new(total);
            let template = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Fetching  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}");
            // Template is static; fall back to the default style if it is ever rejected.
            bar.set_style(
                template
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Fetching {} image(s)...", total);
            None
        };
        Self { bar }
    }

    /// Record one finished image
    pub fn on_done(&self, url: &str, from_cache: bool) {
        if let Some(ref bar) = self.bar {
            bar.set_message(shorten(url, 48));
            bar.inc(1);
        } else {
            let status = if from_cache {
                style("[OK]").green()
            } else {
                style("[FALLBACK]").yellow()
            };
            println!("  {} {}", status, url);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Trim long URLs for single-line display, keeping the tail
fn shorten(url: &str, max: usize) -> String {
    let count = url.chars().count();
    if count <= max {
        return url.to_string();
    }
    let tail: String = url.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}
