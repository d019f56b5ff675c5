//! # ob-core
//!
//! Core onboarding engine for onboard-kit.
//!
//! This crate provides:
//! - Configuration loading from the `.onboard-kit/` directory
//! - Validated step graphs built from process templates
//! - Dependency-aware step completion over an append-only action log
//! - Per-client state management with bounded lock waits
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`template`]: Step graph construction and queries
//! - [`activity`]: Views derived from the action log
//! - [`documents`]: Required, missing and submitted documents
//! - [`engine`]: Dependency-aware completion engine
//! - [`state`]: Onboarding state and the manager
//! - [`reporting`]: Aggregates over onboardings
//! - [`init`]: Project scaffolding

pub mod activity;
pub mod config;
pub mod documents;
pub mod engine;
pub mod init;
pub mod reporting;
pub mod state;
pub mod template;
