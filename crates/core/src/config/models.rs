//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings, process templates, and document definitions into a
//! single configuration object.

use crate::config::error::{ConfigError, ConfigResult};
use crate::template::StepGraph;
use ob_protocol::config_models::GlobalConfig;
use ob_protocol::document_models::DocumentSpec;
use ob_protocol::template_models::ProcessTemplate;

/// Unified application configuration loaded from `.onboard-kit/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `processes/*.yaml`: Process templates
/// - `documents/*.md`: Document definitions
///
/// # Example
///
/// ```rust,no_run
/// use ob_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// let templates = config.build_templates()?;
/// println!("Loaded {} processes", templates.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All process templates loaded from `processes/*.yaml`, unvalidated.
    pub processes: Vec<ProcessTemplate>,

    /// All document definitions loaded from `documents/*.md`.
    pub documents: Vec<DocumentSpec>,
}

impl AppConfig {
    /// Validate every process template against the loaded documents.
    ///
    /// # Errors
    ///
    /// Fails on the first template that does not build, or when
    /// `default-process` names a template that is not present.
    pub fn build_templates(&self) -> ConfigResult<Vec<StepGraph>> {
        let templates = self
            .processes
            .iter()
            .map(|process| StepGraph::build(process, &self.documents))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(default) = &self.global.default_process {
            if !templates.iter().any(|graph| graph.name() == default) {
                return Err(ConfigError::UnknownDefaultProcess(default.clone()));
            }
        }

        Ok(templates)
    }
}
