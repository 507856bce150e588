//! Administrative account model
//!
//! Credentials are modeled as a keyed collection even though a typical
//! deployment only ever populates a single row, so multi-account setups are
//! not precluded by the schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An administrative account.
///
/// The password is stored as a PBKDF2 hash alongside a per-account salt.
/// Neither field is ever serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Hex-encoded PBKDF2-HMAC-SHA512 output
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Hex-encoded random salt, generated once at account creation
    #[serde(skip_serializing)]
    pub salt: String,
    /// Inactive accounts cannot log in
    pub is_active: bool,
    /// Timestamp of the most recent successful login
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    /// Create a new account record. The password must already be hashed.
    pub fn new(username: String, password_hash: String, salt: String) -> Self {
        Self {
            id: 0, // assigned by the database
            username,
            password_hash,
            salt,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        }
    }

    /// The minimal descriptor exposed to API clients.
    pub fn summary(&self) -> AdminUserSummary {
        AdminUserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Minimal user descriptor returned by login and `/api/auth/me`.
///
/// Deliberately excludes everything except id and username — the hash and
/// salt never leave the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserSummary {
    pub id: i64,
    pub username: String,
}
