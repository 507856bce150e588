//! Skill and skill category models

use serde::{Deserialize, Serialize};

/// A group of related skills ("Languages", "Tooling", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub id: i64,
    pub name: String,
    pub sort_order: i32,
}

/// A single skill with a 1-100 proficiency level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub level: i32,
    pub sort_order: i32,
}

/// Category with its skills nested, as served by the public endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategoryWithSkills {
    #[serde(flatten)]
    pub category: SkillCategory,
    pub skills: Vec<Skill>,
}

/// Input for creating a skill category
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillCategoryInput {
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating a skill category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSkillCategoryInput {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

/// Input for creating a skill
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillInput {
    pub category_id: Option<i64>,
    pub name: String,
    pub level: i32,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating a skill
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSkillInput {
    pub category_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub level: Option<i32>,
    pub sort_order: Option<i32>,
}
