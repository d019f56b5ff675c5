//! Global configuration models for `.onboard-kit/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide settings for onboard-kit.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

fn default_lock_timeout_ms() -> u64 {
    5_000
}

/// Represents global settings from `.onboard-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .onboard-kit/config.toml
/// lock-timeout-ms = 2000
/// default-process = "standard-onboarding"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Upper bound, in milliseconds, on waiting for a client's onboarding
    /// lock before a mutation gives up with a timeout error.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Template used when a client begins onboarding without naming one.
    #[serde(default)]
    pub default_process: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            default_process: None,
        }
    }
}
