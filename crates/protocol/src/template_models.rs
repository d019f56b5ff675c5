//! Process template models for `.onboard-kit/processes/*.yaml`.
//!
//! This module defines the structure of process template files. A template
//! is a set of numbered steps with declared prerequisites and document
//! requirements, shared by every client that onboards against it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

/// Zero-based, dense step identifier within a process template.
pub type StepNumber = u32;

/// A single unit of work in a process template.
///
/// Steps are immutable once the template has been loaded. The `depends_on`
/// edges of all steps in a template must form a DAG.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct StepDefinition {
    /// Position of the step in the template (0-based, dense).
    pub step_number: StepNumber,

    /// Human-readable task name.
    pub task_name: String,

    /// Estimated duration of the task, in days.
    #[serde(default)]
    pub duration: u32,

    /// Step numbers that must be completed before this step.
    ///
    /// Only direct prerequisites are listed; nothing is inferred transitively.
    #[serde(default)]
    pub depends_on: BTreeSet<StepNumber>,

    /// Document ids that must be supplied for this step.
    #[serde(default)]
    pub required_documents: BTreeSet<String>,
}

/// Defines a full onboarding process template.
///
/// # Example
///
/// ```yaml
/// name: standard-onboarding
/// description: "Default KYC onboarding"
/// required-documents:
///   - certificate-of-incorporation
/// steps:
///   - step-number: 0
///     task-name: collect-client-details
///     duration: 2
///   - step-number: 1
///     task-name: verify-identity
///     duration: 3
///     depends-on: [0]
///     required-documents:
///       - passport
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ProcessTemplate {
    /// Unique name identifying this template.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Documents required by the process as a whole, independent of any step.
    #[serde(default)]
    pub required_documents: BTreeSet<String>,

    /// The steps of the process. Order in the file is not significant;
    /// steps are ordered by `step_number` once the template is built.
    pub steps: Vec<StepDefinition>,
}
