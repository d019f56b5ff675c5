//! Onboarding state transitions.
//!
//! This module provides functions for managing the lifecycle of a
//! [`ClientOnboarding`], including action appends, validity and completion
//! transitions, and event emission.

use crate::documents::seed_missing_documents;
use crate::template::StepGraph;
use chrono::Utc;
use ob_protocol::activity_models::Activity;
use ob_protocol::ipc::Event;
use ob_protocol::onboarding_models::{ClientOnboarding, OnboardingInstance};
use ob_protocol::template_models::StepNumber;
use std::collections::BTreeSet;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Hand an event to the observer without waiting.
///
/// Callers hold the client's lock, so a full channel drops the event
/// instead of stalling the transition.
pub fn emit(events_tx: &Sender<Event>, event: Event) {
    match events_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(?event, "event channel full, event dropped");
        }
        Err(TrySendError::Closed(_)) => {
            debug!("event channel closed");
        }
    }
}

/// Create a new, valid, incomplete onboarding with an empty action log.
///
/// Every document the template requires starts out missing.
pub fn create_onboarding(client_id: &str, graph: &StepGraph) -> ClientOnboarding {
    ClientOnboarding {
        instance: OnboardingInstance {
            id: Uuid::new_v4(),
            client_id: client_id.to_string(),
            process_name: graph.name().to_string(),
            valid: true,
            completed: false,
            time_started: Utc::now(),
            time_completed: None,
            invalid_steps: BTreeSet::new(),
            missing_documents: seed_missing_documents(graph),
            submitted_documents: BTreeSet::new(),
        },
        activity: Activity::new(),
    }
}

/// Emit the event announcing a new onboarding.
pub fn announce_onboarding(instance: &OnboardingInstance, events_tx: &Sender<Event>) {
    info!(
        client_id = %instance.client_id,
        process = %instance.process_name,
        "onboarding started"
    );
    emit(
        events_tx,
        Event::OnboardingStarted {
            client_id: instance.client_id.clone(),
            onboarding_id: instance.id,
            process_name: instance.process_name.clone(),
        },
    );
}

/// Append a completion action for `step_number` and emit event.
///
/// Returns the sequence number of the new action.
pub fn record_step_completion(
    onboarding: &mut ClientOnboarding,
    step_number: StepNumber,
    events_tx: &Sender<Event>,
) -> u64 {
    let sequence_number = onboarding
        .activity
        .append(Utc::now(), Some(step_number), None)
        .sequence_number;
    debug!(
        client_id = %onboarding.instance.client_id,
        step = step_number,
        sequence_number,
        "completion action appended"
    );
    emit_action_recorded(onboarding, sequence_number, events_tx);
    sequence_number
}

/// Append a submission action for `document_id` and emit event.
///
/// Returns the sequence number of the new action.
pub fn record_document_submission(
    onboarding: &mut ClientOnboarding,
    document_id: &str,
    events_tx: &Sender<Event>,
) -> u64 {
    let sequence_number = onboarding
        .activity
        .append(Utc::now(), None, Some(document_id.to_string()))
        .sequence_number;
    debug!(
        client_id = %onboarding.instance.client_id,
        document_id,
        sequence_number,
        "submission action appended"
    );
    emit_action_recorded(onboarding, sequence_number, events_tx);
    emit(
        events_tx,
        Event::DocumentSubmitted {
            client_id: onboarding.instance.client_id.clone(),
            document_id: document_id.to_string(),
        },
    );
    sequence_number
}

fn emit_action_recorded(
    onboarding: &ClientOnboarding,
    sequence_number: u64,
    events_tx: &Sender<Event>,
) {
    emit(
        events_tx,
        Event::ActionRecorded {
            client_id: onboarding.instance.client_id.clone(),
            sequence_number,
        },
    );
}

/// Emit the event for a step completed in dependency order.
pub fn confirm_step(
    onboarding: &ClientOnboarding,
    step_number: StepNumber,
    events_tx: &Sender<Event>,
) {
    emit(
        events_tx,
        Event::StepCompleted {
            client_id: onboarding.instance.client_id.clone(),
            step_number,
        },
    );
}

/// Record `step_number` as completed out of order and invalidate the
/// onboarding.
///
/// Invalidity is sticky: nothing in this crate sets `valid` back to true.
/// `OnboardingInvalidated` is emitted only on the valid -> invalid edge.
pub fn mark_step_invalid(
    onboarding: &mut ClientOnboarding,
    step_number: StepNumber,
    missing_dependencies: BTreeSet<StepNumber>,
    events_tx: &Sender<Event>,
) {
    let was_valid = onboarding.instance.valid;
    onboarding.instance.valid = false;
    onboarding.instance.invalid_steps.insert(step_number);

    warn!(
        client_id = %onboarding.instance.client_id,
        step = step_number,
        missing = ?missing_dependencies,
        "step completed before its prerequisites"
    );

    emit(
        events_tx,
        Event::StepInvalidated {
            client_id: onboarding.instance.client_id.clone(),
            step_number,
            missing_dependencies,
        },
    );

    if was_valid {
        emit(
            events_tx,
            Event::OnboardingInvalidated {
                client_id: onboarding.instance.client_id.clone(),
            },
        );
    }
}

/// Mark the onboarding as completed and emit event.
///
/// Completion is stamped once; later calls are no-ops.
pub fn mark_onboarding_complete(onboarding: &mut ClientOnboarding, events_tx: &Sender<Event>) {
    if onboarding.instance.completed {
        return;
    }
    onboarding.instance.completed = true;
    onboarding.instance.time_completed = Some(Utc::now());

    info!(
        client_id = %onboarding.instance.client_id,
        valid = onboarding.instance.valid,
        "onboarding completed"
    );

    emit(
        events_tx,
        Event::OnboardingCompleted {
            client_id: onboarding.instance.client_id.clone(),
            valid: onboarding.instance.valid,
        },
    );
}

/// Clear the action log and emit event.
///
/// The instance flags are left untouched: an invalid or completed
/// onboarding stays so.
pub fn reset_activity(onboarding: &mut ClientOnboarding, events_tx: &Sender<Event>) {
    onboarding.activity.clear();
    warn!(client_id = %onboarding.instance.client_id, "action log reset");
    emit(
        events_tx,
        Event::ActivityReset {
            client_id: onboarding.instance.client_id.clone(),
        },
    );
}
