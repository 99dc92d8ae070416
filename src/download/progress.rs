use std::time::Duration;

use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::download::pipeline::{StickerOutcome, Summary};

// Trait to homogenize the progress tracking, so the pipeline is not dependent on indicatif.
pub trait ProgressTracker: Send + Sync {
    fn start(&self, total: u64, title: &str);
    /// Called exactly once per sticker, whatever happened to it.
    fn advance(&self, sequence_index: usize, outcome: &StickerOutcome);
    fn finish(&self, summary: &Summary);
    fn abandon(&self, msg: &str);
}

/// Discards everything. Used with `--quiet`.
#[derive(Clone, Default)]
pub struct NoProgress;

impl ProgressTracker for NoProgress {
    fn start(&self, _total: u64, _title: &str) {}
    fn advance(&self, _sequence_index: usize, _outcome: &StickerOutcome) {}
    fn finish(&self, _summary: &Summary) {}
    fn abandon(&self, _msg: &str) {}
}

#[derive(Clone)]
pub struct StickerProgressBar {
    bar: ProgressBar,
}

impl StickerProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{wide_bar:.cyan/blue}] {pos:>3}/{len:3} ({elapsed})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl Default for StickerProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for StickerProgressBar {
    fn start(&self, total: u64, title: &str) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_message(format!("Downloading {}", title));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn advance(&self, sequence_index: usize, outcome: &StickerOutcome) {
        match outcome {
            StickerOutcome::Skipped { reason } => self.bar.println(format!(
                "{} sticker {:03}: {}",
                "skipped".yellow(),
                sequence_index,
                reason
            )),
            StickerOutcome::Fallback { format, reason } => self.bar.println(format!(
                "{} sticker {:03} kept as {}: {}",
                "not converted".yellow(),
                sequence_index,
                format,
                reason
            )),
            StickerOutcome::Written { .. } => {}
        }
        self.bar.inc(1);
    }

    fn finish(&self, summary: &Summary) {
        self.bar.finish_with_message(format!(
            "Saved {} sticker(s) in {}",
            summary.written,
            HumanDuration(self.bar.elapsed())
        ));
    }

    fn abandon(&self, msg: &str) {
        self.bar.abandon_with_message(msg.to_string());
    }
}
