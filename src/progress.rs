use indicatif::{ProgressBar, ProgressStyle};

/// Receives one tick per completed unit of work and a final `finish`.
pub trait ProgressReporter: Send + Sync {
    fn increment(&self);

    fn finish(&self);
}

impl ProgressReporter for ProgressBar {
    fn increment(&self) {
        self.inc(1);
    }

    fn finish(&self) {
        ProgressBar::finish(self);
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressReporter for Silent {
    fn increment(&self) {}

    fn finish(&self) {}
}

/// Bar for the price fetch; falls back to the default style if the template
/// is rejected.
pub fn price_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{prefix} [{bar:40}] {pos}/{len} tokens ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_prefix("prices");
    bar
}
