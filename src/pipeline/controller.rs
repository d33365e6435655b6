// ABOUTME: Async controller driving one patient's adaptation cycle through its phases
// ABOUTME: Epoch-stamped background tasks, cancellation, atomic confirmation, and snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Pipeline Controller
//!
//! The controller owns the cycle state behind a single `tokio::sync::Mutex`.
//! Analysis and plan generation run as spawned tasks that compute without
//! holding the lock, then re-acquire it to apply their result.
//!
//! Every task is stamped with the controller epoch at the moment it starts.
//! `go_back` and `cancel` bump the epoch and abort the in-flight task, so a
//! result that still arrives finds a newer epoch and is dropped with
//! [`TaskOutcome::Discarded`] instead of overwriting the current state.

use super::state::{
    validate_transition, CycleAnalysis, CycleState, PipelineCommand, PipelineError,
    PipelinePhase, TransitionError,
};
use crate::clock::{Clock, SystemClock};
use crate::errors::AppError;
use crate::intelligence::{
    EngineConfig, FeedbackIntake, OutcomeClassifier, PlanAdjuster, RawFeedback,
    RecommendationEngine, RiskClassifier, RiskResponsivePolicy,
};
use crate::ledger::AdaptationLedger;
use crate::logging::AppLogger;
use crate::models::{
    AdaptationHistoryEntry, AdjustedPlanDelta, BaselinePlan, FeedbackRecord, Recommendation,
    RiskAssessment,
};
use crate::persistence::PlanRepository;
use crate::progress::{ProgressSource, StaticProgressSource};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};
use uuid::Uuid;

/// How a background task ended
#[derive(Debug)]
pub enum TaskOutcome {
    /// Result was applied to the cycle
    Applied,
    /// Cycle moved on before the result arrived; nothing changed
    Discarded,
    /// Task failed; the cycle rolled back to the phase it started from
    Failed(PipelineError),
}

impl TaskOutcome {
    /// Whether the result reached the cycle state
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the result was dropped as stale
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

/// Handle to a running analysis or plan generation task
#[derive(Debug)]
pub struct CycleTask {
    epoch: u64,
    handle: JoinHandle<TaskOutcome>,
}

impl CycleTask {
    /// Epoch the task was started under
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Wait for the task to finish
    ///
    /// An aborted task reports `Discarded`.
    pub async fn wait(self) -> TaskOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => TaskOutcome::Discarded,
            Err(e) => TaskOutcome::Failed(PipelineError::Internal(AppError::internal(format!(
                "cycle task panicked: {e}"
            )))),
        }
    }
}

/// Serializable view of a controller for presentation adapters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleView {
    /// Patient the cycle belongs to
    pub patient_id: Uuid,
    /// Current phase
    pub phase: PipelinePhase,
    /// Current epoch
    pub epoch: u64,
    /// Validated feedback held by the cycle
    pub feedback: Option<FeedbackRecord>,
    /// Risk assessment, once analysis completed
    pub assessment: Option<RiskAssessment>,
    /// Recommendations, once analysis completed
    pub recommendations: Vec<Recommendation>,
    /// Proposed plan change, once generated
    pub delta: Option<AdjustedPlanDelta>,
    /// Entry recorded by a confirmed cycle
    pub confirmed: Option<AdaptationHistoryEntry>,
    /// Plan in force
    pub baseline: BaselinePlan,
    /// Confirmed adaptations
    pub history: Vec<AdaptationHistoryEntry>,
}

struct Shared {
    cycle: CycleState,
    epoch: u64,
    in_flight: Option<AbortHandle>,
    baseline: BaselinePlan,
    ledger: AdaptationLedger,
}

impl Shared {
    fn transition(
        &mut self,
        patient_id: Uuid,
        next: CycleState,
        command: PipelineCommand,
    ) -> Result<(), TransitionError> {
        let from = self.cycle.phase();
        let to = next.phase();
        validate_transition(from, to, command)?;
        self.cycle = next;
        AppLogger::log_transition(
            patient_id,
            self.epoch,
            from.as_str(),
            to.as_str(),
            command.as_str(),
        );
        Ok(())
    }

    /// Start a new epoch and stop whatever task belonged to the old one
    fn invalidate_in_flight(&mut self) {
        self.epoch += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn is_current(&self, epoch: u64, phase: PipelinePhase) -> bool {
        self.epoch == epoch && self.cycle.phase() == phase
    }
}

struct ControllerInner {
    patient_id: Uuid,
    repository: PlanRepository,
    progress: Arc<dyn ProgressSource>,
    clock: Arc<dyn Clock>,
    outcome: Arc<dyn OutcomeClassifier>,
    classifier: RiskClassifier,
    recommender: RecommendationEngine,
    adjuster: PlanAdjuster,
    state: Mutex<Shared>,
}

/// Builder for [`PipelineController`]
pub struct PipelineBuilder {
    patient_id: Uuid,
    repository: PlanRepository,
    progress: Arc<dyn ProgressSource>,
    clock: Arc<dyn Clock>,
    outcome: Arc<dyn OutcomeClassifier>,
    engine: Option<EngineConfig>,
}

impl PipelineBuilder {
    /// Start a builder for one patient backed by `repository`
    #[must_use]
    pub fn new(patient_id: Uuid, repository: PlanRepository) -> Self {
        Self {
            patient_id,
            repository,
            progress: Arc::new(StaticProgressSource::default()),
            clock: Arc::new(SystemClock),
            outcome: Arc::new(RiskResponsivePolicy),
            engine: None,
        }
    }

    /// Source of progress metrics queried when analysis begins
    #[must_use]
    pub fn with_progress_source(mut self, progress: Arc<dyn ProgressSource>) -> Self {
        self.progress = progress;
        self
    }

    /// Time source for feedback timestamps and cycle dates
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Policy assigning outcomes to confirmed adaptations
    #[must_use]
    pub fn with_outcome_classifier(mut self, outcome: Arc<dyn OutcomeClassifier>) -> Self {
        self.outcome = outcome;
        self
    }

    /// Rule configuration (defaults to `EngineConfig::global()`)
    #[must_use]
    pub fn with_engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Load persisted plan and history, then build the controller
    ///
    /// # Errors
    ///
    /// Returns an error if stored state cannot be read or is malformed
    pub async fn build(self) -> Result<PipelineController, AppError> {
        let persisted = self
            .repository
            .load()
            .await
            .map_err(|e| e.with_patient_id(self.patient_id))?;
        debug!(
            patient_id = %self.patient_id,
            week = persisted.plan.week,
            history_len = persisted.history.len(),
            "Loaded persisted plan state"
        );

        #[allow(clippy::option_if_let_else)]
        let engine = match &self.engine {
            Some(engine) => engine,
            None => EngineConfig::global(),
        };

        Ok(PipelineController {
            inner: Arc::new(ControllerInner {
                patient_id: self.patient_id,
                classifier: RiskClassifier::with_config(engine),
                recommender: RecommendationEngine::with_config(engine),
                adjuster: PlanAdjuster::with_config(engine),
                repository: self.repository,
                progress: self.progress,
                clock: self.clock,
                outcome: self.outcome,
                state: Mutex::new(Shared {
                    cycle: CycleState::Idle,
                    epoch: 0,
                    in_flight: None,
                    baseline: persisted.plan,
                    ledger: persisted.history,
                }),
            }),
        })
    }
}

/// Drives the adaptation cycle for one patient
///
/// Cheap to clone; clones share the same cycle.
#[derive(Clone)]
pub struct PipelineController {
    inner: Arc<ControllerInner>,
}

impl PipelineController {
    /// Patient this controller serves
    #[must_use]
    pub fn patient_id(&self) -> Uuid {
        self.inner.patient_id
    }

    /// Current phase
    pub async fn phase(&self) -> PipelinePhase {
        self.inner.state.lock().await.cycle.phase()
    }

    /// Plan in force
    pub async fn baseline(&self) -> BaselinePlan {
        self.inner.state.lock().await.baseline.clone()
    }

    /// Confirmed adaptation history
    pub async fn history(&self) -> AdaptationLedger {
        self.inner.state.lock().await.ledger.clone()
    }

    /// Consistent view of the whole cycle
    pub async fn snapshot(&self) -> CycleView {
        let shared = self.inner.state.lock().await;
        let analysis = shared.cycle.analysis();
        let confirmed = match &shared.cycle {
            CycleState::Confirmed { entry } => Some(entry.clone()),
            _ => None,
        };

        CycleView {
            patient_id: self.inner.patient_id,
            phase: shared.cycle.phase(),
            epoch: shared.epoch,
            feedback: shared.cycle.feedback().cloned(),
            assessment: analysis.map(|a| a.assessment.clone()),
            recommendations: analysis.map(|a| a.recommendations.clone()).unwrap_or_default(),
            delta: shared.cycle.delta().cloned(),
            confirmed,
            baseline: shared.baseline.clone(),
            history: shared.ledger.entries().to_vec(),
        }
    }

    /// Validate feedback and open a cycle
    ///
    /// # Errors
    ///
    /// - `Busy` if another cycle is underway
    /// - `Transition` if the previous cycle ended and `start_new_cycle`
    ///   has not been called
    /// - `Validation` if a field is missing or out of range; the cycle
    ///   stays idle
    pub async fn submit_feedback(
        &self,
        raw: &RawFeedback,
    ) -> Result<FeedbackRecord, PipelineError> {
        let mut shared = self.inner.state.lock().await;
        let phase = shared.cycle.phase();
        if phase.is_in_progress() {
            return Err(PipelineError::Busy { phase });
        }
        if phase != PipelinePhase::Idle {
            return Err(TransitionError {
                from: phase,
                command: PipelineCommand::SubmitFeedback,
            }
            .into());
        }

        let feedback = FeedbackIntake::accept(raw, self.inner.patient_id, self.inner.clock.now())
            .inspect_err(|e| {
                debug!(patient_id = %self.inner.patient_id, field = %e.field, "Feedback rejected");
            })?;

        shared.transition(
            self.inner.patient_id,
            CycleState::FeedbackCollected {
                feedback: feedback.clone(),
            },
            PipelineCommand::SubmitFeedback,
        )?;
        Ok(feedback)
    }

    /// Start risk classification and recommendation generation
    ///
    /// # Errors
    ///
    /// Returns `Transition` unless feedback has just been collected
    pub async fn begin_analysis(&self) -> Result<CycleTask, PipelineError> {
        let mut shared = self.inner.state.lock().await;
        let CycleState::FeedbackCollected { feedback } = &shared.cycle else {
            return Err(TransitionError {
                from: shared.cycle.phase(),
                command: PipelineCommand::BeginAnalysis,
            }
            .into());
        };
        let feedback = feedback.clone();
        let baseline = shared.baseline.clone();

        shared.transition(
            self.inner.patient_id,
            CycleState::Analyzing {
                feedback: feedback.clone(),
            },
            PipelineCommand::BeginAnalysis,
        )?;
        shared.epoch += 1;
        let epoch = shared.epoch;

        let controller = self.clone();
        let handle =
            tokio::spawn(async move { controller.run_analysis(epoch, feedback, baseline).await });
        shared.in_flight = Some(handle.abort_handle());
        Ok(CycleTask { epoch, handle })
    }

    /// Start plan delta generation from the completed analysis
    ///
    /// # Errors
    ///
    /// Returns `Transition` unless analysis is ready
    pub async fn begin_plan_generation(&self) -> Result<CycleTask, PipelineError> {
        let mut shared = self.inner.state.lock().await;
        let CycleState::AnalysisReady { feedback, analysis } = &shared.cycle else {
            return Err(TransitionError {
                from: shared.cycle.phase(),
                command: PipelineCommand::BeginPlanGeneration,
            }
            .into());
        };
        let feedback = feedback.clone();
        let analysis = analysis.clone();
        let baseline = shared.baseline.clone();
        let cycle_date = self.inner.clock.today();

        shared.transition(
            self.inner.patient_id,
            CycleState::PlanGenerating {
                feedback: feedback.clone(),
                analysis: analysis.clone(),
            },
            PipelineCommand::BeginPlanGeneration,
        )?;
        shared.epoch += 1;
        let epoch = shared.epoch;

        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller
                .run_plan_generation(epoch, feedback, analysis, baseline, cycle_date)
                .await
        });
        shared.in_flight = Some(handle.abort_handle());
        Ok(CycleTask { epoch, handle })
    }

    /// Apply the proposed plan and record it in the history
    ///
    /// Plan and history are written in one atomic store call. If that write
    /// fails the cycle stays at plan-ready and may be confirmed again.
    ///
    /// # Errors
    ///
    /// - `Transition` unless a plan is ready
    /// - `Ordering` if the delta's week does not follow the history
    /// - `Persistence` if the store write fails
    pub async fn confirm_plan(&self) -> Result<AdaptationHistoryEntry, PipelineError> {
        let inner = &self.inner;
        let mut shared = inner.state.lock().await;
        let CycleState::PlanReady {
            analysis, delta, ..
        } = &shared.cycle
        else {
            return Err(TransitionError {
                from: shared.cycle.phase(),
                command: PipelineCommand::ConfirmPlan,
            }
            .into());
        };

        let entry = AdaptationHistoryEntry {
            week: delta.week_number,
            date: delta.start_date,
            changes: delta.changes(&analysis.recommendations),
            outcome: inner.outcome.classify(&analysis.assessment, delta),
        };
        let plan = delta.adjusted_plan();

        let mut ledger = shared.ledger.clone();
        ledger.append(entry.clone())?;

        if let Err(error) = inner.repository.commit(&plan, &ledger).await {
            AppLogger::log_persistence_failure(inner.patient_id, &error.key, &error.reason);
            return Err(error.into());
        }

        shared.baseline = plan;
        shared.ledger = ledger;
        AppLogger::log_confirmation(
            inner.patient_id,
            entry.week,
            entry.changes.len(),
            entry.outcome.as_str(),
        );
        shared.transition(
            inner.patient_id,
            CycleState::Confirmed {
                entry: entry.clone(),
            },
            PipelineCommand::ConfirmPlan,
        )?;
        Ok(entry)
    }

    /// Drop analysis and plan, keeping the submitted feedback
    ///
    /// Any in-flight task is aborted and its result will be discarded.
    ///
    /// # Errors
    ///
    /// Returns `Transition` unless analysis has at least started
    pub async fn go_back(&self) -> Result<(), PipelineError> {
        let mut shared = self.inner.state.lock().await;
        let feedback = match &shared.cycle {
            CycleState::Analyzing { feedback }
            | CycleState::AnalysisReady { feedback, .. }
            | CycleState::PlanGenerating { feedback, .. }
            | CycleState::PlanReady { feedback, .. } => feedback.clone(),
            other => {
                return Err(TransitionError {
                    from: other.phase(),
                    command: PipelineCommand::GoBack,
                }
                .into())
            }
        };

        shared.invalidate_in_flight();
        shared.transition(
            self.inner.patient_id,
            CycleState::FeedbackCollected { feedback },
            PipelineCommand::GoBack,
        )?;
        Ok(())
    }

    /// Abandon the cycle
    ///
    /// # Errors
    ///
    /// Returns `Transition` if the cycle already ended
    pub async fn cancel(&self) -> Result<(), PipelineError> {
        let mut shared = self.inner.state.lock().await;
        let from = shared.cycle.phase();
        if from.is_terminal() {
            return Err(TransitionError {
                from,
                command: PipelineCommand::Cancel,
            }
            .into());
        }

        shared.invalidate_in_flight();
        shared.transition(
            self.inner.patient_id,
            CycleState::Cancelled,
            PipelineCommand::Cancel,
        )?;
        Ok(())
    }

    /// Reset an ended cycle so new feedback can be submitted
    ///
    /// # Errors
    ///
    /// Returns `Transition` unless the cycle is confirmed or cancelled
    pub async fn start_new_cycle(&self) -> Result<(), PipelineError> {
        let mut shared = self.inner.state.lock().await;
        shared.transition(
            self.inner.patient_id,
            CycleState::Idle,
            PipelineCommand::StartNewCycle,
        )?;
        Ok(())
    }

    async fn run_analysis(
        &self,
        epoch: u64,
        feedback: FeedbackRecord,
        baseline: BaselinePlan,
    ) -> TaskOutcome {
        let inner = &self.inner;
        let progress = match inner.progress.snapshot(inner.patient_id).await {
            Ok(progress) => progress,
            Err(error) => {
                let error = error.with_patient_id(inner.patient_id);
                return self
                    .roll_back(
                        epoch,
                        PipelinePhase::Analyzing,
                        CycleState::FeedbackCollected { feedback },
                        PipelineError::Progress(error),
                    )
                    .await;
            }
        };

        let (assessment, recommendations) = tokio::join!(
            async { inner.classifier.classify(&feedback, &progress) },
            async { inner.recommender.generate(&feedback, &baseline) },
        );

        let mut shared = inner.state.lock().await;
        if !shared.is_current(epoch, PipelinePhase::Analyzing) {
            AppLogger::log_discarded_result(inner.patient_id, epoch, "analysis");
            return TaskOutcome::Discarded;
        }

        AppLogger::log_analysis(
            inner.patient_id,
            epoch,
            assessment.risk_level.as_str(),
            assessment.alerts.len(),
        );
        shared.in_flight = None;
        let next = CycleState::AnalysisReady {
            feedback,
            analysis: CycleAnalysis {
                assessment,
                recommendations,
            },
        };
        match shared.transition(inner.patient_id, next, PipelineCommand::CompleteAnalysis) {
            Ok(()) => TaskOutcome::Applied,
            Err(e) => TaskOutcome::Failed(e.into()),
        }
    }

    async fn run_plan_generation(
        &self,
        epoch: u64,
        feedback: FeedbackRecord,
        analysis: CycleAnalysis,
        baseline: BaselinePlan,
        cycle_date: NaiveDate,
    ) -> TaskOutcome {
        let inner = &self.inner;
        let delta = match inner.adjuster.adjust(
            &baseline,
            &analysis.recommendations,
            &feedback,
            cycle_date,
        ) {
            Ok(delta) => delta,
            Err(error) => {
                let error = error.with_patient_id(inner.patient_id);
                return self
                    .roll_back(
                        epoch,
                        PipelinePhase::PlanGenerating,
                        CycleState::AnalysisReady { feedback, analysis },
                        PipelineError::Internal(error),
                    )
                    .await;
            }
        };

        let mut shared = inner.state.lock().await;
        if !shared.is_current(epoch, PipelinePhase::PlanGenerating) {
            AppLogger::log_discarded_result(inner.patient_id, epoch, "plan generation");
            return TaskOutcome::Discarded;
        }

        shared.in_flight = None;
        let next = CycleState::PlanReady {
            feedback,
            analysis,
            delta,
        };
        match shared.transition(
            inner.patient_id,
            next,
            PipelineCommand::CompletePlanGeneration,
        ) {
            Ok(()) => TaskOutcome::Applied,
            Err(e) => TaskOutcome::Failed(e.into()),
        }
    }

    /// Return the cycle to the phase a failed task started from
    async fn roll_back(
        &self,
        epoch: u64,
        running: PipelinePhase,
        previous: CycleState,
        error: PipelineError,
    ) -> TaskOutcome {
        let mut shared = self.inner.state.lock().await;
        if !shared.is_current(epoch, running) {
            AppLogger::log_discarded_result(self.inner.patient_id, epoch, running.as_str());
            return TaskOutcome::Discarded;
        }

        warn!(
            patient_id = %self.inner.patient_id,
            epoch,
            phase = %running,
            error = %error,
            "Cycle task failed, rolling back"
        );
        shared.in_flight = None;
        match shared.transition(self.inner.patient_id, previous, PipelineCommand::FailTask) {
            Ok(()) => TaskOutcome::Failed(error),
            Err(e) => TaskOutcome::Failed(e.into()),
        }
    }
}
