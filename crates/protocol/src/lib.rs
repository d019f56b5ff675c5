//! # ob-protocol
//!
//! Core protocol definitions and data models for onboard-kit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (YAML process templates, TOML config,
//!   Markdown document specs)
//! - Runtime onboarding state and the per-client action log
//! - Operations and events exchanged with the core
//!
//! ## Modules
//!
//! - [`activity_models`]: Actions and the append-only activity log
//! - [`config_models`]: Global configuration from config.toml
//! - [`document_models`]: Supporting document specifications
//! - [`template_models`]: Process templates and their steps
//! - [`onboarding_models`]: Runtime onboarding state and status views
//! - [`ipc`]: Operations and Events
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, ts-rs, chrono and uuid
//! - TypeScript generation: all types derive `TS` for client compatibility
//! - Independent compilation: no dependencies on other onboard-kit crates

pub mod activity_models;
pub mod config_models;
pub mod document_models;
pub mod ipc;
pub mod onboarding_models;
pub mod template_models;

// Re-export all public types for convenience
pub use activity_models::*;
pub use config_models::*;
pub use document_models::*;
pub use ipc::*;
pub use onboarding_models::*;
pub use template_models::*;
