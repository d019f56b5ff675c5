//! Custom assertion helpers over emitted events.

use ob_protocol::ipc::Event;
use ob_protocol::template_models::StepNumber;

/// Whether the events contain an OnboardingStarted for the client.
pub fn has_onboarding_started(events: &[Event], client: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::OnboardingStarted { client_id, .. } if client_id == client))
}

/// Steps reported as invalidated for the client, in emission order.
pub fn invalidated_steps(events: &[Event], client: &str) -> Vec<StepNumber> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StepInvalidated {
                client_id,
                step_number,
                ..
            } if client_id == client => Some(*step_number),
            _ => None,
        })
        .collect()
}

/// Number of OnboardingInvalidated events for the client.
pub fn count_onboarding_invalidated(events: &[Event], client: &str) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::OnboardingInvalidated { client_id } if client_id == client))
        .count()
}

/// The `valid` flag of the client's OnboardingCompleted event, if emitted.
pub fn completion_validity(events: &[Event], client: &str) -> Option<bool> {
    events.iter().find_map(|e| match e {
        Event::OnboardingCompleted { client_id, valid } if client_id == client => Some(*valid),
        _ => None,
    })
}

/// Assert that ActionRecorded sequence numbers for the client are 0..n.
pub fn assert_dense_sequence_numbers(events: &[Event], client: &str) {
    let sequence_numbers: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::ActionRecorded {
                client_id,
                sequence_number,
            } if client_id == client => Some(*sequence_number),
            _ => None,
        })
        .collect();
    let expected: Vec<u64> = (0..sequence_numbers.len() as u64).collect();
    assert_eq!(
        sequence_numbers, expected,
        "sequence numbers for '{client}' should be dense from 0"
    );
}
