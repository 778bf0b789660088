//! Workflow state machine
//!
//! All UI state lives in one [`UiState`] value. Every change goes through
//! [`transition`], a pure function from `(state, event)` to
//! `(state, command)`. The [`WorkflowController`] owns the state, runs the
//! commands (spawning submissions) and feeds completions back in as events.
//!
//! ```text
//! Idle ──drag──▶ Dragging ──leave──▶ Idle
//! Idle/Dragging/ErrorShown/Result ──valid file──▶ Loading
//! any ──invalid file──▶ ErrorShown
//! Loading ──ok──▶ Result        Loading ──err──▶ ErrorShown
//! any ──reset──▶ Idle
//! ```
//!
//! Each intake or reset bumps a generation counter. A completion is applied
//! only while loading and only if it carries the current generation, so a
//! slow, superseded submission can never overwrite a newer one.

use crate::{
    config::ClientConfig,
    error::{ClientError, OperationError, Result},
    export::ExportAction,
    geometry::{self, ComparisonLayout},
    pipeline::{RemovalService, UploadPipeline},
    services::{FormattedStats, NoOpPhaseReporter, PhaseReporter, StatsFormatter},
    types::{ImageAsset, ProcessingResult, SelectedFile},
    utils::ImageValidator,
};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Dragging,
    Loading,
    Result,
    ErrorShown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Loading => "loading",
            Self::Result => "result",
            Self::ErrorShown => "error",
        };
        f.write_str(name)
    }
}

/// Complete UI state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    phase: Phase,
    asset: Option<ImageAsset>,
    result: Option<ProcessingResult>,
    error: Option<OperationError>,
    slider_position: u8,
    generation: u64,
}

impl UiState {
    /// Initial state with the given default slider position
    #[must_use]
    pub fn new(default_slider_position: u8) -> Self {
        Self {
            phase: Phase::Idle,
            asset: None,
            result: None,
            error: None,
            slider_position: default_slider_position.min(geometry::MAX_SLIDER_POSITION),
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Asset currently being processed or shown
    #[must_use]
    pub fn asset(&self) -> Option<&ImageAsset> {
        self.asset.as_ref()
    }

    #[must_use]
    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn slider_position(&self) -> u8 {
        self.slider_position
    }

    /// Tag of the newest submission
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether every user-visible field matches a fresh session
    #[must_use]
    pub fn is_initial(&self, default_slider_position: u8) -> bool {
        self.phase == Phase::Idle
            && self.asset.is_none()
            && self.result.is_none()
            && self.error.is_none()
            && self.slider_position == default_slider_position
    }

    /// Comparison layout, available only while showing a result
    #[must_use]
    pub fn layout(&self) -> Option<ComparisonLayout> {
        (self.phase == Phase::Result).then(|| geometry::layout(self.slider_position))
    }

    /// Display strings for the current result's stats
    #[must_use]
    pub fn formatted_stats(&self) -> Option<FormattedStats> {
        self.result
            .as_ref()
            .map(|result| StatsFormatter::format(&result.stats))
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }
}

/// Input to the state machine
#[derive(Debug)]
pub enum WorkflowEvent {
    DragEnter,
    DragOver,
    DragLeave,
    /// File dropped onto the upload area
    Drop(SelectedFile),
    /// File chosen through a picker
    FileSelected(SelectedFile),
    /// A submission finished
    PipelineFinished {
        generation: u64,
        outcome: std::result::Result<ProcessingResult, OperationError>,
    },
    SliderMoved(u8),
    /// Saving the processed image failed
    ExportFailed(OperationError),
    Reset,
}

/// Side effect requested by a transition
#[derive(Debug)]
pub enum Command {
    /// Submit `asset`, reporting back with `generation`
    Submit { generation: u64, asset: ImageAsset },
}

/// Fixed inputs of the transition function
#[derive(Debug, Clone, Copy)]
pub struct TransitionRules {
    pub validator: ImageValidator,
    pub default_slider_position: u8,
}

impl Default for TransitionRules {
    fn default() -> Self {
        Self {
            validator: ImageValidator::default(),
            default_slider_position: geometry::DEFAULT_SLIDER_POSITION,
        }
    }
}

impl TransitionRules {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            validator: ImageValidator::with_max_bytes(config.max_upload_bytes),
            default_slider_position: config.default_slider_position,
        }
    }
}

/// Apply one event to the state
#[must_use]
pub fn transition(
    mut state: UiState,
    event: WorkflowEvent,
    rules: &TransitionRules,
) -> (UiState, Option<Command>) {
    match event {
        WorkflowEvent::DragEnter | WorkflowEvent::DragOver => {
            if state.phase == Phase::Idle {
                state.phase = Phase::Dragging;
            }
            (state, None)
        },

        WorkflowEvent::DragLeave => {
            if state.phase == Phase::Dragging {
                state.phase = Phase::Idle;
            }
            (state, None)
        },

        WorkflowEvent::Drop(file) | WorkflowEvent::FileSelected(file) => {
            state.generation += 1;
            state.clear_outcome();
            state.asset = None;

            match rules.validator.validate(file) {
                Ok(asset) => {
                    state.phase = Phase::Loading;
                    state.asset = Some(asset.clone());
                    let command = Command::Submit {
                        generation: state.generation,
                        asset,
                    };
                    (state, Some(command))
                },
                Err(error) => {
                    state.error = Some(OperationError::from(&error));
                    state.phase = Phase::ErrorShown;
                    (state, None)
                },
            }
        },

        WorkflowEvent::PipelineFinished {
            generation,
            outcome,
        } => {
            if state.phase != Phase::Loading || generation != state.generation {
                return (state, None);
            }

            match outcome {
                Ok(result) => {
                    state.result = Some(result);
                    state.error = None;
                    state.slider_position = rules.default_slider_position;
                    state.phase = Phase::Result;
                },
                Err(error) => {
                    state.result = None;
                    state.error = Some(error);
                    state.phase = Phase::ErrorShown;
                },
            }
            (state, None)
        },

        WorkflowEvent::SliderMoved(position) => {
            if state.phase == Phase::Result {
                state.slider_position = position.min(geometry::MAX_SLIDER_POSITION);
            }
            (state, None)
        },

        WorkflowEvent::ExportFailed(error) => {
            if state.phase == Phase::Result {
                state.result = None;
                state.error = Some(error);
                state.phase = Phase::ErrorShown;
            }
            (state, None)
        },

        WorkflowEvent::Reset => {
            let generation = state.generation + 1;
            let mut fresh = UiState::new(rules.default_slider_position);
            fresh.generation = generation;
            (fresh, None)
        },
    }
}

/// Owner of the session state and driver of submissions
pub struct WorkflowController {
    state: UiState,
    rules: TransitionRules,
    pipeline: UploadPipeline,
    export: ExportAction,
    reporter: Arc<dyn PhaseReporter>,
    events_tx: mpsc::UnboundedSender<WorkflowEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkflowEvent>,
    loading_started: Option<Instant>,
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("state", &self.state)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl WorkflowController {
    /// Create a controller submitting through `service`
    ///
    /// # Errors
    /// - Invalid configuration
    pub fn new(config: &ClientConfig, service: Arc<dyn RemovalService>) -> Result<Self> {
        config.validate()?;
        let rules = TransitionRules::from_config(config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: UiState::new(rules.default_slider_position),
            rules,
            pipeline: UploadPipeline::new(service),
            export: ExportAction::new(config.export_file_name.clone()),
            reporter: Arc::new(NoOpPhaseReporter),
            events_tx,
            events_rx,
            loading_started: None,
        })
    }

    /// Report phase changes to `reporter`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn PhaseReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Apply an event and run the resulting command
    ///
    /// Submissions are spawned on the current tokio runtime.
    pub fn dispatch(&mut self, event: WorkflowEvent) -> Phase {
        let previous = self.state.phase;
        let state = std::mem::replace(&mut self.state, UiState::new(0));
        let (state, command) = transition(state, event, &self.rules);
        self.state = state;

        if self.state.phase != previous {
            info!(from = %previous, to = %self.state.phase, "Workflow phase changed");
            self.loading_started = (self.state.phase == Phase::Loading).then(Instant::now);
            self.reporter.phase_changed(previous, &self.state);
        } else if self.state.phase == Phase::Loading && command.is_some() {
            // A new file replaced an in-flight one; restart the clock.
            self.loading_started = Some(Instant::now());
            self.reporter.phase_changed(previous, &self.state);
        }

        if let Some(command) = command {
            self.run(command);
        }

        self.state.phase
    }

    fn run(&self, command: Command) {
        match command {
            Command::Submit { generation, asset } => {
                let pipeline = self.pipeline.clone();
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = pipeline.submit(&asset).await.map_err(|error| {
                        warn!(generation, error = %error, "Submission failed");
                        OperationError::from(&error)
                    });
                    if events
                        .send(WorkflowEvent::PipelineFinished {
                            generation,
                            outcome,
                        })
                        .is_err()
                    {
                        debug!(generation, "Controller dropped before completion arrived");
                    }
                });
            },
        }
    }

    /// Wait for the next completion and apply it
    pub async fn next_event(&mut self) -> Option<Phase> {
        let event = self.events_rx.recv().await?;
        if let WorkflowEvent::PipelineFinished { generation, .. } = &event {
            if *generation != self.state.generation || self.state.phase != Phase::Loading {
                debug!(
                    stale = *generation,
                    current = self.state.generation,
                    "Discarding stale submission result"
                );
            }
        }
        Some(self.dispatch(event))
    }

    /// Apply completions until the workflow leaves `Loading`
    pub async fn settle(&mut self) -> &UiState {
        while self.state.phase == Phase::Loading {
            if self.next_event().await.is_none() {
                break;
            }
        }
        &self.state
    }

    /// Intake a file chosen through a picker
    pub fn select_file(&mut self, file: SelectedFile) -> Phase {
        self.dispatch(WorkflowEvent::FileSelected(file))
    }

    /// Move the comparison slider; ignored outside `Result`
    pub fn move_slider(&mut self, position: u8) -> Option<ComparisonLayout> {
        self.dispatch(WorkflowEvent::SliderMoved(position));
        self.state.layout()
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.dispatch(WorkflowEvent::Reset);
    }

    /// Time spent in the current `Loading` phase
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        if self.state.phase == Phase::Loading {
            self.loading_started.map(|started| started.elapsed())
        } else {
            None
        }
    }

    /// Save the processed image into `directory`
    ///
    /// Only valid while a result is shown. A failed save moves the workflow
    /// to `ErrorShown`.
    pub fn export_to(&mut self, directory: &Path) -> Result<PathBuf> {
        let Some(result) = self.state.result.as_ref().filter(|_| self.state.phase == Phase::Result)
        else {
            return Err(ClientError::export("no processed image to export"));
        };

        match self.export.save(&result.processed_image, directory) {
            Ok(path) => Ok(path),
            Err(error) => {
                self.dispatch(WorkflowEvent::ExportFailed(OperationError::from(&error)));
                Err(error)
            },
        }
    }
}
