//! Operation and event protocol.
//!
//! This module defines the message types exchanged between a front end
//! (CLI, web layer) and the core onboarding logic.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent to the core
//! - `Event`: State changes reported by the core
//!
//! Events are delivered over a channel so that observers never hold the
//! lock of the onboarding they are watching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;
use uuid::Uuid;

use crate::template_models::StepNumber;

/// Operations sent to the core.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "completeStep",
///   "payload": {
///     "client_id": "acme-corp",
///     "step_number": 3
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Create the onboarding instance and action log for a client.
    ///
    /// Without a process name the configured default template is used.
    BeginOnboarding {
        client_id: String,
        #[serde(default)]
        process_name: Option<String>,
    },

    /// Record that a client completed a step.
    CompleteStep {
        client_id: String,
        step_number: StepNumber,
    },

    /// Record that a client supplied a required document.
    SubmitDocument {
        client_id: String,
        document_id: String,
    },

    /// Record that an employee viewed one of a client's steps.
    RecordStepAccess {
        employee_id: String,
        client_id: String,
        step_number: StepNumber,
    },

    /// Request the status of one client.
    GetStatus { client_id: String },

    /// Request the completed/valid flags of every client.
    ListCompliance,

    /// Request the average time from start to completion.
    GetAverageTimeToCompletion,

    /// Clear a client's action log. Operational use only.
    ResetActivity { client_id: String },

    /// Remove every record of a client.
    PurgeClient { client_id: String },
}

/// Events emitted by the core.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "stepInvalidated",
///   "payload": {
///     "client_id": "acme-corp",
///     "step_number": 3,
///     "missing_dependencies": [2]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A client has begun onboarding.
    OnboardingStarted {
        client_id: String,
        #[ts(type = "string")]
        onboarding_id: Uuid,
        process_name: String,
    },

    /// A new action was appended to a client's log.
    ActionRecorded {
        client_id: String,
        sequence_number: u64,
    },

    /// A step was completed with all of its direct prerequisites in place.
    StepCompleted {
        client_id: String,
        step_number: StepNumber,
    },

    /// A step was completed before some of its direct prerequisites.
    ///
    /// The completion is still recorded.
    StepInvalidated {
        client_id: String,
        step_number: StepNumber,
        missing_dependencies: BTreeSet<StepNumber>,
    },

    /// The onboarding lost its validity. Emitted once per onboarding.
    OnboardingInvalidated { client_id: String },

    /// Every template step has been completed.
    OnboardingCompleted { client_id: String, valid: bool },

    /// A required document was submitted for the first time.
    DocumentSubmitted {
        client_id: String,
        document_id: String,
    },

    /// A client's action log was cleared.
    ActivityReset { client_id: String },

    /// All records of a client were removed.
    ClientPurged { client_id: String },
}
