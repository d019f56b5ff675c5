//! Read-only aggregates over onboardings.
//!
//! Nothing here mutates state. Aggregates over empty input return `None`
//! rather than a zero that would read as real data.

use crate::activity::completed_steps_so_far;
use crate::documents::missing_documents_for_step;
use crate::template::StepGraph;
use chrono::Duration;
use ob_protocol::onboarding_models::{
    ClientOnboarding, ComplianceStatus, OnboardingInstance, OnboardingStatus,
};
use ob_protocol::template_models::StepNumber;
use std::collections::{BTreeMap, BTreeSet};

/// Mean of `time_completed - time_started` over completed instances.
///
/// Instances without `time_completed` are ignored. Returns `None` when no
/// instance has completed.
pub fn average_time_to_completion<'a, I>(instances: I) -> Option<Duration>
where
    I: IntoIterator<Item = &'a OnboardingInstance>,
{
    let mut total_ms: i64 = 0;
    let mut count: i64 = 0;

    for instance in instances {
        if let Some(time_completed) = instance.time_completed {
            total_ms += (time_completed - instance.time_started).num_milliseconds();
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(Duration::milliseconds(total_ms / count))
}

pub fn compliance_status(instance: &OnboardingInstance) -> ComplianceStatus {
    ComplianceStatus {
        client_id: instance.client_id.clone(),
        process_name: instance.process_name.clone(),
        completed: instance.completed,
        valid: instance.valid,
    }
}

/// Full status view of one onboarding against its template.
pub fn status_of(onboarding: &ClientOnboarding, graph: &StepGraph) -> OnboardingStatus {
    let instance = &onboarding.instance;
    let completed_steps = completed_steps_so_far(&onboarding.activity);
    let outstanding_steps: BTreeSet<StepNumber> = graph
        .step_numbers()
        .difference(&completed_steps)
        .copied()
        .collect();
    let missing_documents_by_step: BTreeMap<StepNumber, BTreeSet<String>> = outstanding_steps
        .iter()
        .filter_map(|&step| {
            missing_documents_for_step(instance, graph, step)
                .filter(|missing| !missing.is_empty())
                .map(|missing| (step, missing))
        })
        .collect();

    OnboardingStatus {
        client_id: instance.client_id.clone(),
        process_name: instance.process_name.clone(),
        valid: instance.valid,
        completed: instance.completed,
        time_started: instance.time_started,
        time_completed: instance.time_completed,
        completed_steps,
        outstanding_steps,
        invalid_steps: instance.invalid_steps.clone(),
        missing_documents: instance.missing_documents.clone(),
        missing_documents_by_step,
        submitted_documents: instance.submitted_documents.clone(),
        num_actions: onboarding.activity.len(),
    }
}
