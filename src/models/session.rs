//! Admin session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A login session for an administrative account.
///
/// The id doubles as the bearer token carried in the session cookie; it is
/// opaque and unguessable (UUIDv4). Expiry is fixed at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    /// Session identifier (cookie value)
    pub id: String,
    /// Owning account
    pub user_id: i64,
    /// Expiration timestamp (creation + TTL)
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AdminSession {
    /// Check whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let live = AdminSession {
            id: "live".into(),
            user_id: 1,
            expires_at: now + Duration::hours(1),
            created_at: now,
        };
        let dead = AdminSession {
            id: "dead".into(),
            user_id: 1,
            expires_at: now - Duration::seconds(1),
            created_at: now - Duration::hours(25),
        };
        assert!(!live.is_expired());
        assert!(dead.is_expired());
    }
}
