use crate::orchestrator::{ProgressPhase, ProgressReporter, ProgressUpdate};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal spinner driven by orchestrator progress
pub struct SpinnerProgress {
    bar: ProgressBar,
    label: String,
}

impl SpinnerProgress {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            label: label.to_string(),
        }
    }

    /// A spinner that draws nothing
    pub fn hidden(label: &str) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            label: label.to_string(),
        }
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }
}

impl ProgressReporter for SpinnerProgress {
    fn report(&self, update: &ProgressUpdate) {
        match update.phase {
            ProgressPhase::Started => {
                self.bar.set_message(format!("{}: contacting model...", self.label));
            }
            ProgressPhase::Waiting => {
                self.bar.set_message(format!(
                    "{}: waiting for response ({}s)",
                    self.label,
                    update.elapsed.as_secs()
                ));
            }
            ProgressPhase::Finished { success: true } => {
                self.bar.finish_with_message(format!(
                    "✓ {} ({:.1}s)",
                    self.label,
                    update.elapsed.as_secs_f64()
                ));
            }
            ProgressPhase::Finished { success: false } => {
                self.bar.finish_with_message(format!("✗ {}", self.label));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_messages_follow_phases() {
        let spinner = SpinnerProgress::hidden("Skill Gap Analysis");

        spinner.report(&ProgressUpdate {
            step: 0,
            phase: ProgressPhase::Started,
            elapsed: Duration::ZERO,
        });
        assert_eq!(spinner.message(), "Skill Gap Analysis: contacting model...");

        spinner.report(&ProgressUpdate {
            step: 1,
            phase: ProgressPhase::Waiting,
            elapsed: Duration::from_secs(3),
        });
        assert_eq!(
            spinner.message(),
            "Skill Gap Analysis: waiting for response (3s)"
        );

        spinner.report(&ProgressUpdate {
            step: 2,
            phase: ProgressPhase::Finished { success: false },
            elapsed: Duration::from_secs(4),
        });
        assert_eq!(spinner.message(), "✗ Skill Gap Analysis");
    }
}
