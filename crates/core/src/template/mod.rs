//! Process template graphs.
//!
//! This module turns a [`ProcessTemplate`](ob_protocol::ProcessTemplate)
//! loaded from configuration into a validated, immutable [`StepGraph`]:
//! - Step lookup by number and ordering
//! - Direct dependency queries
//! - Per-step and process-wide document requirements

pub mod error;
pub mod graph;

pub use error::{TemplateError, TemplateResult};
pub use graph::StepGraph;
