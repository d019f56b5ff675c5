//! Initialization module for creating .onboard-kit directory structures.
//!
//! This module provides functionality to initialize a new onboard-kit project
//! by generating a `.onboard-kit/` directory with pre-configured templates for:
//! - Global configuration (`config.toml`)
//! - Process templates (`processes/*.yaml`)
//! - Document definitions (`documents/*.md`)
//!
//! # Example
//!
//! ```no_run
//! use ob_core::init::{InitOptions, generate_onboard_kit_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_onboard_kit_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_onboard_kit_structure, InitOptions};
pub use templates::{get_template, list_templates};
