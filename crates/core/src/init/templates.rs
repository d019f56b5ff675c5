//! Embedded template files for .onboard-kit initialization.
//!
//! The workspace `templates/` directory is embedded into the binary at
//! compile time, so `onboard init` needs no files on disk. With the
//! `debug-embed` feature the files are read from the filesystem in debug
//! builds instead.

use rust_embed::RustEmbed;

/// Embedded template files from the workspace `templates/` directory.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Arguments
/// * `path` - Relative path from templates root (e.g., "config.toml", "documents/passport.md")
///
/// # Example
/// ```
/// use ob_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("lock-timeout-ms ="));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files under a directory prefix, sorted.
///
/// # Example
/// ```
/// use ob_core::init::templates::list_templates;
///
/// let documents = list_templates("documents/");
/// assert!(documents.contains(&"documents/passport.md".to_string()));
/// ```
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}
