//! Error types for template construction.

use ob_protocol::template_models::StepNumber;
use thiserror::Error;

/// Reasons a process template is rejected at build time.
///
/// Every variant is fatal for the template: a process that fails to build
/// can never be used to onboard a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template declares no steps.
    #[error("Invalid template '{process}': no steps defined")]
    Empty { process: String },

    /// Two steps share a step number.
    #[error("Invalid template '{process}': step {step} is defined more than once")]
    DuplicateStep { process: String, step: StepNumber },

    /// Step numbers are not exactly 0..n.
    #[error("Invalid template '{process}': step numbers must be dense from 0, found {found:?}")]
    NonDenseSteps {
        process: String,
        found: Vec<StepNumber>,
    },

    /// A dependency edge points at a step that does not exist.
    #[error("Invalid template '{process}': step {step} depends on unknown step {dependency}")]
    DanglingDependency {
        process: String,
        step: StepNumber,
        dependency: StepNumber,
    },

    /// The dependency edges contain a cycle through `step`.
    #[error("Invalid template '{process}': dependency cycle through step {step}")]
    Cycle { process: String, step: StepNumber },

    /// A required document is not in the document catalog.
    #[error("Invalid template '{process}': unknown document '{document_id}'")]
    UnknownDocument {
        process: String,
        document_id: String,
    },
}

/// Type alias for Result with TemplateError.
pub type TemplateResult<T> = Result<T, TemplateError>;
