//! Error types for onboarding operations.
//!
//! A step completed out of dependency order is not an error: it is a
//! regular state transition that invalidates the onboarding.

use ob_protocol::template_models::StepNumber;
use thiserror::Error;

/// Errors returned by onboarding mutations and bounded lock waits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnboardError {
    /// The client has no onboarding instance or action log yet.
    #[error("required onboarding structure missing for client '{client_id}'")]
    MissingStructure { client_id: String },

    /// The document is not required by the client's process.
    #[error("document '{document_id}' is not required by process '{process}'")]
    UnknownDocument {
        process: String,
        document_id: String,
    },

    /// The step does not exist in the client's process.
    #[error("step {step} does not exist in process '{process}'")]
    UnknownStep { process: String, step: StepNumber },

    /// No process template is registered under this name.
    #[error("unknown process template '{0}'")]
    UnknownProcess(String),

    /// No process name was given and no default is configured.
    #[error("no process template named and no default-process configured")]
    NoDefaultProcess,

    /// The client is already onboarding.
    #[error("client '{client_id}' already has an onboarding in progress")]
    AlreadyOnboarding { client_id: String },

    /// Another operation held the client's lock for too long.
    #[error("timed out after {waited_ms}ms waiting for the onboarding of client '{client_id}'")]
    LockTimeout { client_id: String, waited_ms: u64 },
}

/// Type alias for Result with OnboardError.
pub type OnboardResult<T> = Result<T, OnboardError>;
