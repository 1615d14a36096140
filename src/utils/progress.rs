use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over a batch of crops
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: usize, description: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker {
            bar,
        }
    }

    /// Record one finished image and show its name
    pub fn image_done(&self, image_path: &Path) {
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_path.display().to_string());
        self.bar.set_message(name);
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }
}
