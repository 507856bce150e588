//! Content section model
//!
//! Sections are keyed free-form blocks ('hero', 'about', 'contact', ...)
//! edited as a whole from the admin panel. Extra structured fields live in
//! the JSON metadata column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A keyed content block on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: i64,
    /// Unique key, e.g. 'hero', 'about', 'contact'
    pub section_key: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    /// Additional fields (images, links, ...) as free-form JSON
    pub metadata: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting a content section. The key comes from the URL path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertContentSectionInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}
