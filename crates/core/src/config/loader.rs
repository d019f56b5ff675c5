//! Configuration file loader for `.onboard-kit/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.onboard-kit/` directory, including:
//! - `config.toml`: Global settings
//! - `processes/*.yaml`: Process templates
//! - `documents/*.md`: Document definitions with YAML front matter

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use ob_protocol::config_models::GlobalConfig;
use ob_protocol::document_models::DocumentSpec;
use ob_protocol::template_models::ProcessTemplate;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".onboard-kit";

/// Loads all configuration from the `.onboard-kit/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.onboard-kit/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns an empty/default configuration
/// rather than an error. Templates are parsed but not validated; call
/// [`AppConfig::build_templates`] for that.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - Two files define the same process name or document id
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let ok_dir = root.join(CONFIG_DIR);

    if !ok_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&ok_dir)?;
    let processes = load_processes(&ok_dir)?;
    let documents = load_documents(&ok_dir)?;

    debug!(
        processes = processes.len(),
        documents = documents.len(),
        "configuration loaded"
    );

    Ok(AppConfig {
        global,
        processes,
        documents,
    })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(ok_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ok_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content = read(&config_path)?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

/// Files directly inside `dir` with one of `extensions`, sorted by path.
fn files_with_extension(dir: &Path, extensions: &[&str]) -> ConfigResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str());
        if ext.is_some_and(|ext| extensions.contains(&ext)) {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads all process templates from `processes/*.yaml`.
fn load_processes(ok_dir: &Path) -> ConfigResult<Vec<ProcessTemplate>> {
    let mut seen = BTreeSet::new();
    let mut processes = Vec::new();

    for path in files_with_extension(&ok_dir.join("processes"), &["yaml", "yml"])? {
        let content = read(&path)?;
        let process: ProcessTemplate =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.clone(),
                source,
            })?;

        if !seen.insert(process.name.clone()) {
            return Err(ConfigError::InvalidConfig {
                path,
                reason: format!("process '{}' is defined more than once", process.name),
            });
        }
        processes.push(process);
    }

    Ok(processes)
}

/// Loads all document definitions from `documents/*.md`.
fn load_documents(ok_dir: &Path) -> ConfigResult<Vec<DocumentSpec>> {
    let mut seen = BTreeSet::new();
    let mut documents = Vec::new();
    let matter = Matter::<YAML>::new();

    for path in files_with_extension(&ok_dir.join("documents"), &["md"])? {
        let content = read(&path)?;
        let result = matter.parse(&content);

        let mut document: DocumentSpec = result
            .data
            .ok_or_else(|| ConfigError::MarkdownParse {
                path: path.clone(),
                reason: "Missing YAML front matter".to_string(),
            })?
            .deserialize()
            .map_err(|e| ConfigError::MarkdownParse {
                path: path.clone(),
                reason: format!("Failed to deserialize front matter: {e}"),
            })?;

        document.description = result.content.trim().to_string();

        if !seen.insert(document.document_id.clone()) {
            return Err(ConfigError::InvalidConfig {
                path,
                reason: format!("document '{}' is defined more than once", document.document_id),
            });
        }
        documents.push(document);
    }

    Ok(documents)
}
