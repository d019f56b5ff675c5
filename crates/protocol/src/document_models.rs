//! Document specification models for `.onboard-kit/documents/*.md`.
//!
//! Documents are defined as Markdown files with YAML front matter.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A supporting document that a process or one of its steps may require.
///
/// # Example
///
/// ```markdown
/// ---
/// document-id: passport
/// document-type: identity
/// ---
///
/// A certified copy of the passport of every beneficial owner.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, TS)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentSpec {
    /// Unique identifier, referenced from process templates.
    pub document_id: String,

    /// Free-form category (e.g. "identity", "corporate").
    pub document_type: String,

    /// The body of the .md file, not part of the front matter.
    ///
    /// Skipped during serialization; only the front matter is metadata.
    #[serde(skip)]
    pub description: String,
}

impl DocumentSpec {
    pub fn new(document_id: impl Into<String>, document_type: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            document_type: document_type.into(),
            description: String::new(),
        }
    }
}
