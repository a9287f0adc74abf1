use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::generate::GenerationResult;
use crate::pipeline::{ProgressReporter, Stage};

/// Terminal spinner driven by pipeline stages
pub struct SpinnerProgress {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl SpinnerProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet,
        }
    }

    fn set_message(&self, message: String) {
        if self.quiet {
            return;
        }

        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };

        let bar = spinner.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        bar.set_message(message);
    }

    /// Remove the spinner from the terminal
    pub fn clear(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(bar) = spinner.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for SpinnerProgress {
    fn stage(&self, stage: &Stage) {
        match stage {
            Stage::Validating | Stage::Resolving => {}
            Stage::FetchingTranscript(video_id) => {
                self.set_message(format!("Fetching transcript for {}...", video_id))
            }
            Stage::Generating(platform) => {
                self.set_message(format!("Generating {} content...", platform))
            }
            Stage::Done => self.clear(),
        }
    }

    fn platform_finished(&self, result: &GenerationResult) {
        if !result.is_generated() {
            tracing::debug!("{} finished with status {:?}", result.platform, result.status);
        }
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        self.clear();
    }
}
