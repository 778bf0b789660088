//! Phase reporting service
//!
//! Separates user feedback from the workflow logic so each frontend decides
//! how to show loading, results and errors.

use crate::controller::{Phase, UiState};
#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Duration;

/// Receives workflow phase changes
pub trait PhaseReporter: Send + Sync {
    /// Called after the phase changed from `previous` to `state.phase()`
    fn phase_changed(&self, previous: Phase, state: &UiState);
}

/// Reporter that ignores all updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPhaseReporter;

impl PhaseReporter for NoOpPhaseReporter {
    fn phase_changed(&self, _previous: Phase, _state: &UiState) {}
}

/// Spinner while loading, one-line summaries otherwise
#[cfg(feature = "cli")]
#[derive(Default)]
pub struct ConsolePhaseReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for ConsolePhaseReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.spinner.lock().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("ConsolePhaseReporter")
            .field("spinner_active", &active)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl ConsolePhaseReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&self, file_name: &str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Removing background from {}...", file_name));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(previous) = spinner.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }
}

#[cfg(feature = "cli")]
impl PhaseReporter for ConsolePhaseReporter {
    fn phase_changed(&self, _previous: Phase, state: &UiState) {
        match state.phase() {
            Phase::Loading => {
                let name = state.asset().map_or("image", |asset| asset.name());
                self.start_spinner(name);
            },
            Phase::Result => {
                self.stop_spinner();
                if let Some(stats) = state.formatted_stats() {
                    println!("✨ Processing complete");
                    println!("  Processing time: {}", stats.processing_time);
                    println!("  Original size:   {}", stats.original_size);
                    match state.result().and_then(|result| result.stats.size_ratio()) {
                        Some(ratio) => println!(
                            "  Result size:     {} ({:.0}% of original)",
                            stats.processed_size,
                            ratio * 100.0
                        ),
                        None => println!("  Result size:     {}", stats.processed_size),
                    }
                }
            },
            Phase::ErrorShown => {
                self.stop_spinner();
                if let Some(error) = state.error() {
                    eprintln!("⚠️  {}", error);
                }
            },
            Phase::Idle | Phase::Dragging => self.stop_spinner(),
        }
    }
}
