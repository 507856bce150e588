//! Profile model
//!
//! The profile is a singleton: the public endpoint returns the one row,
//! the admin endpoint upserts it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The site owner's profile and contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    /// {github, linkedin, twitter, ...} as free-form JSON
    pub social_links: serde_json::Value,
    pub theme_preference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting the profile
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProfileInput {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub social_links: serde_json::Value,
    #[serde(default = "default_theme")]
    pub theme_preference: String,
}

fn default_theme() -> String {
    "dark".to_string()
}
