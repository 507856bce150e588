//! Resume experience entry model

use serde::{Deserialize, Serialize};

/// A work experience entry on the resume section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    /// YYYY-MM
    pub start_date: String,
    /// None = current position
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub sort_order: i32,
}

/// Input for creating an experience entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperienceInput {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating an experience entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<Option<String>>,
    pub description: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub sort_order: Option<i32>,
}
