//! Terminal progress display for collage attempts

use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_TICK_MS};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static ATTEMPT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Shows which attempt is running and the best score so far
pub struct ProgressManager {
    bar: ProgressBar,
    best_score: Option<f64>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress display; nothing is drawn until [`Self::initialize`]
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            best_score: None,
        }
    }

    /// Show a bar sized to the attempt budget
    pub fn initialize(&mut self, max_attempts: usize) {
        self.bar = ProgressBar::new(max_attempts as u64);
        self.bar.set_style(ATTEMPT_STYLE.clone());
        self.bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        self.best_score = None;
    }

    /// Note that an attempt has begun
    pub fn start_attempt(&self, attempt: usize, max_attempts: usize) {
        self.bar
            .set_message(format!("Attempt {attempt}/{max_attempts}: selecting, composing, scoring..."));
    }

    /// Record an attempt's score
    pub fn complete_attempt(&mut self, attempt: usize, score: f64) {
        let best = self.best_score.map_or(score, |b| b.max(score));
        self.best_score = Some(best);
        self.bar.set_position(attempt as u64);
        self.bar
            .set_message(format!("score {score}/10 (best {best}/10)"));
    }

    /// Best score recorded so far
    pub const fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    /// Close the display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Close the display after a failure
    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
