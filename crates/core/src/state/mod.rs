//! State management for client onboardings.
//!
//! This module provides:
//! - Onboarding state transitions and event emission
//! - The storage seam and its in-memory backend
//! - OnboardingManager for coordinating many clients

pub mod error;
pub mod manager;
pub mod onboarding;
pub mod store;

pub use error::{OnboardError, OnboardResult};
pub use manager::OnboardingManager;
pub use store::{MemoryStore, OnboardingStore, SharedOnboarding};
