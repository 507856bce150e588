//! Login throttle
//!
//! Slows down online password guessing: after 5 failed attempts for a
//! username within 15 minutes, further logins for that username are refused
//! until the window drains. Successful login clears the counter.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Failed attempts allowed per username inside the window.
const MAX_FAILED_ATTEMPTS: usize = 5;

/// Window length in minutes.
const WINDOW_MINUTES: i64 = 15;

/// Per-username failed-login throttle.
pub struct LoginThrottle {
    attempts: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self {
            attempts: RwLock::new(HashMap::new()),
        }
    }

    /// Whether logins for this username are currently refused.
    pub async fn is_limited(&self, username: &str) -> bool {
        let cutoff = Utc::now() - Duration::minutes(WINDOW_MINUTES);
        let mut attempts = self.attempts.write().await;
        let entry = attempts.entry(username.to_lowercase()).or_default();
        entry.retain(|t| *t > cutoff);
        entry.len() >= MAX_FAILED_ATTEMPTS
    }

    /// Record a failed login.
    pub async fn record_failure(&self, username: &str) {
        let mut attempts = self.attempts.write().await;
        attempts
            .entry(username.to_lowercase())
            .or_default()
            .push(Utc::now());
    }

    /// Clear the counter after a successful login.
    pub async fn clear(&self, username: &str) {
        let mut attempts = self.attempts.write().await;
        attempts.remove(&username.to_lowercase());
    }

    /// Drop stale entries. Called periodically from the maintenance task.
    pub async fn cleanup(&self) {
        let cutoff = Utc::now() - Duration::minutes(WINDOW_MINUTES);
        let mut attempts = self.attempts.write().await;
        attempts.retain(|_, times| {
            times.retain(|t| *t > cutoff);
            !times.is_empty()
        });
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new()
    }
}
