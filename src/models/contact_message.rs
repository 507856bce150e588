//! Contact message model
//!
//! Messages submitted through the public contact form, read from the admin
//! inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message from the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for the public contact form submit
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactMessageInput {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}
