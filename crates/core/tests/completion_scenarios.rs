//! Integration tests for dependency-aware step completion.
//!
//! These tests drive the OnboardingManager end to end and check:
//! - In-order and out-of-order completion
//! - Sticky invalidity and validity-independent completion
//! - The append-only action log
//! - Document submission

mod common;

use common::*;
use ob_core::activity::completed_steps_so_far;
use ob_core::engine::{CompletionEngine, SubmissionOutcome};
use ob_core::state::onboarding::create_onboarding;
use ob_core::state::OnboardError;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_in_order_completion_is_valid_and_complete() {
    let (manager, mut rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    for step in 0..5 {
        let outcome = manager.complete_step("acme", step).await.unwrap();
        assert!(outcome.dependencies_satisfied, "step {step} should be satisfied");
        assert_eq!(outcome.onboarding_completed, step == 4);
    }

    let status = manager.status("acme").await.unwrap().unwrap();
    assert!(status.valid);
    assert!(status.completed);
    assert!(status.time_completed.is_some());
    assert!(status.outstanding_steps.is_empty());

    let events = drain_events(&mut rx);
    assert!(has_onboarding_started(&events, "acme"));
    assert_eq!(completion_validity(&events, "acme"), Some(true));
    assert_dense_sequence_numbers(&events, "acme");
}

#[tokio::test]
async fn test_out_of_order_scenario() {
    let (manager, mut rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    manager.complete_step("acme", 3).await.unwrap();
    manager.complete_step("acme", 4).await.unwrap();
    let outcome = manager.complete_step("acme", 1).await.unwrap();

    // Step 1 has no dependencies, so it does not add to the invalid set
    assert!(outcome.dependencies_satisfied);
    assert!(!outcome.valid);

    let status = manager.status("acme").await.unwrap().unwrap();
    assert!(!status.valid);
    assert!(!status.completed);
    assert_eq!(status.invalid_steps, BTreeSet::from([3, 4]));
    assert_eq!(status.num_actions, 3);
    assert_eq!(manager.num_actions("acme").await.unwrap(), Some(3));

    let events = drain_events(&mut rx);
    assert_eq!(invalidated_steps(&events, "acme"), vec![3, 4]);
    assert_eq!(count_onboarding_invalidated(&events, "acme"), 1);
}

#[tokio::test]
async fn test_invalidity_is_sticky_and_completion_still_happens() {
    let (manager, mut rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    manager.complete_step("acme", 4).await.unwrap();
    for step in 0..4 {
        let outcome = manager.complete_step("acme", step).await.unwrap();
        assert!(outcome.dependencies_satisfied);
        assert!(!outcome.valid, "validity must not come back after step {step}");
    }

    let status = manager.status("acme").await.unwrap().unwrap();
    assert!(status.completed);
    assert!(!status.valid);
    assert_eq!(status.invalid_steps, BTreeSet::from([4]));

    let events = drain_events(&mut rx);
    assert_eq!(completion_validity(&events, "acme"), Some(false));
}

#[tokio::test]
async fn test_zero_dependency_steps_never_invalidate() {
    let (manager, _rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    for step in [2, 0, 1, 2, 0] {
        let outcome = manager.complete_step("acme", step).await.unwrap();
        assert!(outcome.dependencies_satisfied);
        assert!(outcome.valid);
    }
}

#[tokio::test]
async fn test_zero_dependency_steps_keep_validity_from_any_prefix() {
    let (manager, _rx) = create_test_manager(1_000);
    let prefixes: [&[u32]; 6] = [&[], &[3], &[4, 3], &[1, 2], &[0, 1, 2, 3, 4], &[2, 2, 4]];

    for (i, prefix) in prefixes.iter().enumerate() {
        for step in [0, 1, 2] {
            let client = format!("client-{i}-{step}");
            manager.begin_onboarding(&client, None).await.unwrap();
            for &earlier in prefix.iter() {
                manager.complete_step(&client, earlier).await.unwrap();
            }
            let before = manager.status(&client).await.unwrap().unwrap();

            let outcome = manager.complete_step(&client, step).await.unwrap();

            assert!(outcome.dependencies_satisfied, "{prefix:?} then {step}");
            assert!(outcome.missing_dependencies.is_empty());
            assert_eq!(outcome.valid, before.valid, "{prefix:?} then {step}");
            let after = manager.status(&client).await.unwrap().unwrap();
            assert!(!after.invalid_steps.contains(&step));
            assert_eq!(after.invalid_steps, before.invalid_steps);
        }
    }
}

#[tokio::test]
async fn test_direct_dependencies_only() {
    // In a chain 0 <- 1 <- 2, completing 1 then 2 without 0 invalidates
    // only step 1: step 2's direct prerequisite (1) is present.
    let (manager, _rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", Some("chain")).await.unwrap();

    let first = manager.complete_step("acme", 1).await.unwrap();
    let second = manager.complete_step("acme", 2).await.unwrap();

    assert_eq!(first.missing_dependencies, BTreeSet::from([0]));
    assert!(second.dependencies_satisfied);

    let status = manager.status("acme").await.unwrap().unwrap();
    assert_eq!(status.invalid_steps, BTreeSet::from([1]));
}

#[tokio::test]
async fn test_action_log_is_append_only() {
    let (manager, _rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    manager.complete_step("acme", 0).await.unwrap();
    manager.complete_step("acme", 2).await.unwrap();
    let before = manager.all_actions("acme").await.unwrap().unwrap();

    manager.complete_step("acme", 2).await.unwrap();
    manager.submit_document("acme", "passport").await.unwrap();
    let after = manager.all_actions("acme").await.unwrap().unwrap();

    assert_eq!(after.len(), 4);
    assert_eq!(&after[..before.len()], &before[..]);
    let sequence_numbers: Vec<u64> = after.iter().map(|a| a.sequence_number).collect();
    assert_eq!(sequence_numbers, vec![0, 1, 2, 3]);
    assert_eq!(after[3].submitted_document.as_deref(), Some("passport"));
    assert_eq!(after[3].completed_step, None);
}

#[tokio::test]
async fn test_earlier_actions_survive_mixed_operations() {
    enum Operation {
        Complete(u32),
        Submit(&'static str),
    }
    use Operation::{Complete, Submit};

    let (manager, _rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    // (operation, whether it appends an action)
    let operations = [
        (Complete(3), true),
        (Submit("passport"), true),
        (Complete(0), true),
        (Complete(0), true),
        (Submit("certificate-of-incorporation"), true),
        (Submit("passport"), false),
        (Complete(42), false),
        (Complete(4), true),
    ];

    let mut previous = manager.all_actions("acme").await.unwrap().unwrap();
    assert!(previous.is_empty());

    for (index, (operation, appends)) in operations.into_iter().enumerate() {
        let result = match operation {
            Complete(step) => manager.complete_step("acme", step).await.map(drop),
            Submit(document) => manager.submit_document("acme", document).await.map(drop),
        };
        assert_eq!(result.is_ok(), index != 6, "operation {index}");

        let current = manager.all_actions("acme").await.unwrap().unwrap();
        assert_eq!(current.len(), previous.len() + usize::from(appends), "operation {index}");
        assert_eq!(&current[..previous.len()], &previous[..], "operation {index}");
        previous = current;
    }

    let sequence_numbers: Vec<u64> = previous.iter().map(|a| a.sequence_number).collect();
    assert_eq!(sequence_numbers, (0..6).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_unknown_step_records_nothing() {
    let (manager, _rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    let err = manager.complete_step("acme", 9).await.unwrap_err();
    assert!(matches!(err, OnboardError::UnknownStep { step: 9, .. }));
    assert_eq!(manager.num_actions("acme").await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_document_submission() {
    let (manager, mut rx) = create_test_manager(1_000);
    manager.begin_onboarding("acme", None).await.unwrap();

    let status = manager.status("acme").await.unwrap().unwrap();
    assert_eq!(
        status.missing_documents,
        BTreeSet::from([
            "certificate-of-incorporation".to_string(),
            "passport".to_string()
        ])
    );
    assert_eq!(
        status.missing_documents_by_step,
        BTreeMap::from([(1, BTreeSet::from(["passport".to_string()]))])
    );

    let first = manager.submit_document("acme", "passport").await.unwrap();
    let second = manager.submit_document("acme", "passport").await.unwrap();
    assert_eq!(first, SubmissionOutcome::Submitted { sequence_number: 0 });
    assert_eq!(second, SubmissionOutcome::AlreadySubmitted);

    let status = manager.status("acme").await.unwrap().unwrap();
    assert_eq!(
        status.missing_documents,
        BTreeSet::from(["certificate-of-incorporation".to_string()])
    );
    assert_eq!(status.submitted_documents, BTreeSet::from(["passport".to_string()]));
    assert_eq!(status.num_actions, 1);
    assert!(status.missing_documents_by_step.is_empty());

    let err = manager.submit_document("acme", "utility-bill").await.unwrap_err();
    assert!(matches!(err, OnboardError::UnknownDocument { .. }));

    let submitted = drain_events(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, ob_protocol::ipc::Event::DocumentSubmitted { .. }))
        .count();
    assert_eq!(submitted, 1);
}

#[test]
fn test_engine_helper_queries() {
    let engine = CompletionEngine::new(Arc::new(create_standard_template()));
    let mut onboarding = create_onboarding("acme", engine.graph());
    let (tx, _rx) = mpsc::channel(64);

    engine.mark_step_complete(&mut onboarding, 0, &tx).unwrap();
    engine.mark_step_complete(&mut onboarding, 1, &tx).unwrap();

    assert!(!engine.depends_satisfied(&onboarding.activity, 3).unwrap());
    assert_eq!(
        engine.completed_dependencies(&onboarding.activity, 3).unwrap(),
        BTreeSet::from([0, 1])
    );

    engine.mark_step_complete(&mut onboarding, 2, &tx).unwrap();
    assert!(engine.depends_satisfied(&onboarding.activity, 3).unwrap());
    assert_eq!(
        completed_steps_so_far(&onboarding.activity),
        BTreeSet::from([0, 1, 2])
    );
}
