//! Resume education entry model

use serde::{Deserialize, Serialize};

/// An education entry on the resume section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_year: String,
    pub end_year: Option<String>,
    pub description: Option<String>,
    pub gpa: Option<String>,
    pub sort_order: i32,
}

/// Input for creating an education entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEducationInput {
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_year: String,
    pub end_year: Option<String>,
    pub description: Option<String>,
    pub gpa: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating an education entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEducationInput {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<Option<String>>,
    pub description: Option<String>,
    pub gpa: Option<String>,
    pub sort_order: Option<i32>,
}
