//! Service layer
//!
//! Infrastructure concerns kept apart from the workflow logic: file intake,
//! display formatting, comparison rendering and phase reporting.

pub mod compose;
pub mod format;
pub mod io;
pub mod progress;

pub use compose::ComparisonRenderer;
pub use format::{FormattedStats, StatsFormatter};
pub use io::ImageIoService;
#[cfg(feature = "cli")]
pub use progress::ConsolePhaseReporter;
pub use progress::{NoOpPhaseReporter, PhaseReporter};
