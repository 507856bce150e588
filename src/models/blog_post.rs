//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post. Unpublished drafts are only visible through the admin
/// listing (`?published=false`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    /// URL slug (unique)
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_published: bool,
    /// Estimated reading time in minutes
    pub read_time: Option<i32>,
    pub views: i64,
}

/// Input for creating a blog post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogPostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
    pub read_time: Option<i32>,
}

/// Input for updating a blog post (all fields optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlogPostInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub is_published: Option<bool>,
    pub read_time: Option<i32>,
}
