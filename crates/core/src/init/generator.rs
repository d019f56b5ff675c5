//! Directory structure and file generation for .onboard-kit initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const MINIMAL_PROCESS: &str = "express-onboarding";
const DEFAULT_PROCESS: &str = "standard-onboarding";

/// Options for initializing a .onboard-kit directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .onboard-kit will be created.
    pub target_dir: PathBuf,

    /// Overwrite existing .onboard-kit directory if it exists.
    pub force: bool,

    /// Create minimal template (one process, no documents).
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a complete .onboard-kit directory structure with templates.
///
/// This function creates the following structure:
/// ```text
/// .onboard-kit/
/// ├── config.toml
/// ├── processes/
/// │   ├── express-onboarding.yaml
/// │   └── standard-onboarding.yaml (unless minimal)
/// └── documents/ (unless minimal)
///     ├── certificate-of-incorporation.md
///     ├── passport.md
///     └── proof-of-address.md
/// ```
///
/// In minimal mode `config.toml` points `default-process` at the express
/// process, since the standard one is not generated.
///
/// # Errors
///
/// Returns an `InitError` if the directory already exists without `force`,
/// a template is missing from the embedded assets, or a file system
/// operation fails.
pub async fn generate_onboard_kit_structure(options: InitOptions) -> InitResult<PathBuf> {
    let ok_dir = options.target_dir.join(CONFIG_DIR);

    if ok_dir.exists() {
        if !options.force {
            return Err(InitError::DirectoryExists(ok_dir));
        }
        // Stale files from a previous layout would otherwise still be loaded
        fs::remove_dir_all(&ok_dir).map_err(|source| InitError::DirectoryRemove {
            path: ok_dir.clone(),
            source,
        })?;
    }

    create_dir(&ok_dir.join("processes"))?;

    if options.minimal {
        let config = get_template("config.toml")
            .ok_or_else(|| InitError::TemplateNotFound("config.toml".to_string()))?
            .replace(DEFAULT_PROCESS, MINIMAL_PROCESS);
        write_file(&ok_dir.join("config.toml"), &config)?;
        write_template_file(&ok_dir, &format!("processes/{MINIMAL_PROCESS}.yaml"))?;
    } else {
        create_dir(&ok_dir.join("documents"))?;
        write_template_file(&ok_dir, "config.toml")?;
        for path in list_templates("processes/")
            .into_iter()
            .chain(list_templates("documents/"))
        {
            write_template_file(&ok_dir, &path)?;
        }
    }

    info!(path = %ok_dir.display(), minimal = options.minimal, "project initialized");
    Ok(ok_dir)
}

fn create_dir(path: &Path) -> InitResult<()> {
    fs::create_dir_all(path).map_err(|source| InitError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> InitResult<()> {
    fs::write(path, content).map_err(|source| InitError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one embedded template to the same relative path under `ok_dir`.
fn write_template_file(ok_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = ok_dir.join(template_path);
    if let Some(parent) = target_path.parent() {
        create_dir(parent)?;
    }

    write_file(&target_path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_generate_structure_success() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let ok_dir = generate_onboard_kit_structure(options).await.unwrap();

        assert_eq!(ok_dir, dir.path().join(".onboard-kit"));
        assert!(ok_dir.join("config.toml").exists());
        assert!(ok_dir.join("processes/standard-onboarding.yaml").exists());
        assert!(ok_dir.join("processes/express-onboarding.yaml").exists());
        assert!(ok_dir.join("documents/passport.md").exists());
        assert!(ok_dir.join("documents/proof-of-address.md").exists());
    }

    #[tokio::test]
    async fn test_generated_structure_loads_and_builds() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            ..InitOptions::default()
        };
        generate_onboard_kit_structure(options).await.unwrap();

        let config = load_config(dir.path()).await.unwrap();
        let templates = config.build_templates().unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(config.documents.len(), 3);
        assert_eq!(
            config.global.default_process.as_deref(),
            Some("standard-onboarding")
        );
    }

    #[tokio::test]
    async fn test_generate_structure_minimal() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: true,
        };

        let ok_dir = generate_onboard_kit_structure(options).await.unwrap();

        assert!(ok_dir.join("processes/express-onboarding.yaml").exists());
        assert!(!ok_dir.join("processes/standard-onboarding.yaml").exists());
        assert!(!ok_dir.join("documents").exists());

        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(
            config.global.default_process.as_deref(),
            Some("express-onboarding")
        );
        assert_eq!(config.build_templates().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_structure_already_exists() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".onboard-kit")).unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let result = generate_onboard_kit_structure(options).await;
        assert!(matches!(result, Err(InitError::DirectoryExists(_))));
    }

    #[tokio::test]
    async fn test_generate_structure_force_replaces_contents() {
        let dir = tempdir().unwrap();
        let ok_dir = dir.path().join(".onboard-kit");
        fs::create_dir_all(ok_dir.join("processes")).unwrap();
        fs::write(ok_dir.join("processes/stale.yaml"), "name: stale").unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: true,
            minimal: false,
        };

        generate_onboard_kit_structure(options).await.unwrap();

        assert!(!ok_dir.join("processes/stale.yaml").exists());
        assert!(ok_dir.join("processes/standard-onboarding.yaml").exists());
    }
}
