//! Project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A portfolio project card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    /// Featured projects are surfaced on the landing page
    pub featured: bool,
    pub stars: i32,
    pub forks: i32,
    pub language: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stars: i32,
    #[serde(default)]
    pub forks: i32,
    pub language: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
    pub stars: Option<i32>,
    pub forks: Option<i32>,
    pub language: Option<String>,
    pub sort_order: Option<i32>,
}
