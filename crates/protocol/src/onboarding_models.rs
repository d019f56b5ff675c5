//! Runtime onboarding state models.
//!
//! This module defines the structures for tracking one client's progress
//! through a process template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;
use uuid::Uuid;

use crate::activity_models::Activity;
use crate::template_models::StepNumber;

/// Per-client onboarding progress.
///
/// `valid` starts out `true` and becomes `false` the first time a step is
/// completed before one of its direct prerequisites. It never flips back.
/// `completed` is set once every template step has been completed at least
/// once, whatever the validity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct OnboardingInstance {
    /// Unique identifier for this onboarding.
    #[ts(type = "string")]
    pub id: Uuid,

    /// The client being onboarded.
    pub client_id: String,

    /// Name of the process template this onboarding must follow.
    pub process_name: String,

    pub valid: bool,

    pub completed: bool,

    pub time_started: DateTime<Utc>,

    pub time_completed: Option<DateTime<Utc>>,

    /// Steps that were completed while a direct prerequisite was still
    /// outstanding.
    pub invalid_steps: BTreeSet<StepNumber>,

    /// Required documents not yet submitted.
    pub missing_documents: BTreeSet<String>,

    /// Required documents already submitted.
    ///
    /// Always disjoint from `missing_documents`.
    pub submitted_documents: BTreeSet<String>,
}

/// An onboarding instance together with its action log.
///
/// This is the unit of locking: every mutation of a client's onboarding
/// reads and writes both halves under one lock.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct ClientOnboarding {
    pub instance: OnboardingInstance,
    pub activity: Activity,
}

/// Point-in-time view of a client's onboarding, suitable for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct OnboardingStatus {
    pub client_id: String,
    pub process_name: String,
    pub valid: bool,
    pub completed: bool,
    pub time_started: DateTime<Utc>,
    pub time_completed: Option<DateTime<Utc>>,

    /// Steps with at least one completion action, derived from the log.
    pub completed_steps: BTreeSet<StepNumber>,

    /// Template steps with no completion action yet.
    pub outstanding_steps: BTreeSet<StepNumber>,

    pub invalid_steps: BTreeSet<StepNumber>,
    pub missing_documents: BTreeSet<String>,

    /// Outstanding steps still waiting on documents, with the documents
    /// each one needs.
    pub missing_documents_by_step: BTreeMap<StepNumber, BTreeSet<String>>,

    pub submitted_documents: BTreeSet<String>,
    pub num_actions: usize,
}

/// The `completed` and `valid` flags of one client, for compliance listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ComplianceStatus {
    pub client_id: String,
    pub process_name: String,
    pub completed: bool,
    pub valid: bool,
}
