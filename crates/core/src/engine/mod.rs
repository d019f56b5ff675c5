//! Dependency-aware completion engine.
//!
//! The [`CompletionEngine`] decides what a step completion means for an
//! onboarding. It reads the set of already completed steps from the
//! action log, compares it with the step's direct prerequisites, records
//! the completion, and updates the validity and completion flags.
//!
//! Out-of-order completions are never rejected. The action is appended and
//! the onboarding is marked invalid instead.

use crate::activity::completed_steps_so_far;
use crate::documents;
use crate::state::error::{OnboardError, OnboardResult};
use crate::state::onboarding::{
    confirm_step, mark_onboarding_complete, mark_step_invalid, record_document_submission,
    record_step_completion,
};
use crate::template::StepGraph;
use ob_protocol::activity_models::Activity;
use ob_protocol::ipc::Event;
use ob_protocol::onboarding_models::ClientOnboarding;
use ob_protocol::template_models::StepNumber;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Result of one step completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Sequence number of the appended completion action.
    pub sequence_number: u64,

    /// Whether every direct prerequisite was already completed.
    pub dependencies_satisfied: bool,

    /// Direct prerequisites that were not yet completed.
    pub missing_dependencies: BTreeSet<StepNumber>,

    /// Onboarding validity after this completion.
    pub valid: bool,

    /// Whether the onboarding is complete after this completion.
    pub onboarding_completed: bool,
}

/// Result of one document submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum SubmissionOutcome {
    /// The document moved from missing to submitted and an action was
    /// appended.
    Submitted { sequence_number: u64 },

    /// The document had already been submitted; nothing changed.
    AlreadySubmitted,
}

/// Applies client actions to onboardings that follow one template.
///
/// The template is passed in at construction; the engine holds no global
/// state and many engines over different templates can coexist.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    graph: Arc<StepGraph>,
}

impl CompletionEngine {
    /// Create a new CompletionEngine for the given template.
    pub fn new(graph: Arc<StepGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    fn dependencies(&self, step_number: StepNumber) -> OnboardResult<&BTreeSet<StepNumber>> {
        self.graph
            .dependencies_of(step_number)
            .ok_or_else(|| OnboardError::UnknownStep {
                process: self.graph.name().to_string(),
                step: step_number,
            })
    }

    /// Number of direct prerequisites of a step.
    pub fn num_dependencies(&self, step_number: StepNumber) -> OnboardResult<usize> {
        Ok(self.dependencies(step_number)?.len())
    }

    /// Direct prerequisites of a step that the log shows as completed.
    pub fn completed_dependencies(
        &self,
        activity: &Activity,
        step_number: StepNumber,
    ) -> OnboardResult<BTreeSet<StepNumber>> {
        let completed = completed_steps_so_far(activity);
        Ok(self
            .dependencies(step_number)?
            .intersection(&completed)
            .copied()
            .collect())
    }

    /// Direct prerequisites of a step that the log does not show as
    /// completed.
    pub fn missing_dependencies(
        &self,
        activity: &Activity,
        step_number: StepNumber,
    ) -> OnboardResult<BTreeSet<StepNumber>> {
        let completed = completed_steps_so_far(activity);
        Ok(self
            .dependencies(step_number)?
            .difference(&completed)
            .copied()
            .collect())
    }

    /// True when every direct prerequisite of the step is completed.
    ///
    /// Prerequisites of prerequisites are not consulted.
    pub fn depends_satisfied(&self, activity: &Activity, step_number: StepNumber) -> OnboardResult<bool> {
        Ok(self.missing_dependencies(activity, step_number)?.is_empty())
    }

    /// Record that the client completed `step_number`.
    ///
    /// 1. Derive the completed steps from the action log.
    /// 2. Compare them with the step's direct prerequisites.
    /// 3. Append the completion action whatever the outcome.
    /// 4. If a prerequisite was missing, mark the step and the onboarding
    ///    invalid.
    /// 5. If every template step is now completed, mark the onboarding
    ///    complete, valid or not.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::UnknownStep`] if the step is not part of the
    /// template. Nothing is recorded in that case.
    pub fn mark_step_complete(
        &self,
        onboarding: &mut ClientOnboarding,
        step_number: StepNumber,
        events_tx: &Sender<Event>,
    ) -> OnboardResult<StepOutcome> {
        let mut completed = completed_steps_so_far(&onboarding.activity);
        let missing: BTreeSet<StepNumber> = self
            .dependencies(step_number)?
            .difference(&completed)
            .copied()
            .collect();

        let sequence_number = record_step_completion(onboarding, step_number, events_tx);
        completed.insert(step_number);

        let dependencies_satisfied = missing.is_empty();
        if dependencies_satisfied {
            confirm_step(onboarding, step_number, events_tx);
        } else {
            mark_step_invalid(onboarding, step_number, missing.clone(), events_tx);
        }

        if self.graph.is_covered_by(&completed) {
            mark_onboarding_complete(onboarding, events_tx);
        }

        Ok(StepOutcome {
            sequence_number,
            dependencies_satisfied,
            missing_dependencies: missing,
            valid: onboarding.instance.valid,
            onboarding_completed: onboarding.instance.completed,
        })
    }

    /// Record that the client supplied `document_id`.
    ///
    /// A first submission appends a submission action; a resubmission is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::UnknownDocument`] if the template does not
    /// require the document.
    pub fn submit_document(
        &self,
        onboarding: &mut ClientOnboarding,
        document_id: &str,
        events_tx: &Sender<Event>,
    ) -> OnboardResult<SubmissionOutcome> {
        if !documents::submit_document(&mut onboarding.instance, &self.graph, document_id)? {
            return Ok(SubmissionOutcome::AlreadySubmitted);
        }
        let sequence_number = record_document_submission(onboarding, document_id, events_tx);
        Ok(SubmissionOutcome::Submitted { sequence_number })
    }
}
