//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity, behind a
//! trait so services never touch SQL directly. No other component is
//! permitted to read or write these tables.

pub mod admin_user;
pub mod blog_post;
pub mod contact_message;
pub mod content_section;
pub mod education;
pub mod experience;
pub mod navigation;
pub mod profile;
pub mod project;
pub mod session;
pub mod skill;

pub use admin_user::{AdminUserRepository, SqlxAdminUserRepository};
pub use blog_post::{BlogPostRepository, SqlxBlogPostRepository};
pub use contact_message::{ContactMessageRepository, SqlxContactMessageRepository};
pub use content_section::{ContentSectionRepository, SqlxContentSectionRepository};
pub use education::{EducationRepository, SqlxEducationRepository};
pub use experience::{ExperienceRepository, SqlxExperienceRepository};
pub use navigation::{NavigationRepository, SqlxNavigationRepository};
pub use profile::{ProfileRepository, SqlxProfileRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use skill::{SkillRepository, SqlxSkillRepository};

/// Serialize a string list into its JSON column representation.
pub(crate) fn encode_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a JSON column back into a string list. Null and malformed values
/// decode as empty.
pub(crate) fn decode_string_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Serialize a JSON value column, mapping JSON null to SQL NULL.
pub(crate) fn encode_json(value: &serde_json::Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a JSON value column. Null and malformed values decode as JSON null.
pub(crate) fn decode_json(raw: Option<String>) -> serde_json::Value {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_roundtrip() {
        let items = vec!["rust".to_string(), "axum".to_string()];
        let encoded = encode_string_list(&items);
        assert_eq!(decode_string_list(Some(encoded)), items);
    }

    #[test]
    fn test_string_list_decodes_null_and_garbage_as_empty() {
        assert!(decode_string_list(None).is_empty());
        assert!(decode_string_list(Some("not json".into())).is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let value = serde_json::json!({"github": "https://github.com/someone"});
        let encoded = encode_json(&value);
        assert_eq!(decode_json(encoded), value);
    }

    #[test]
    fn test_json_null_maps_to_sql_null() {
        assert_eq!(encode_json(&serde_json::Value::Null), None);
        assert_eq!(decode_json(None), serde_json::Value::Null);
    }
}
