//! Navigation item model

use serde::{Deserialize, Serialize};

/// A navigation bar entry on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: i64,
    /// Display label
    pub label: String,
    /// Link target (anchor or route)
    pub href: String,
    /// Icon name rendered next to the label
    pub icon: String,
    pub sort_order: i32,
    pub is_visible: bool,
}

impl NavigationItem {
    pub fn new(label: String, href: String, icon: String) -> Self {
        Self {
            id: 0,
            label,
            href,
            icon,
            sort_order: 0,
            is_visible: true,
        }
    }
}

/// Input for creating a navigation item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNavigationItemInput {
    pub label: String,
    pub href: String,
    pub icon: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Input for updating a navigation item (all fields optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNavigationItemInput {
    pub label: Option<String>,
    pub href: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}
