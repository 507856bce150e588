//! Contact message service

use crate::db::repositories::ContactMessageRepository;
use crate::models::{ContactMessage, CreateContactMessageInput};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Upper bound on message body length for the public form.
const MAX_MESSAGE_LENGTH: usize = 10_000;

pub struct ContactService {
    repo: Arc<dyn ContactMessageRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactMessageRepository>) -> Self {
        Self { repo }
    }

    /// Accept a message from the public contact form.
    pub async fn submit(&self, input: CreateContactMessageInput) -> Result<ContactMessage> {
        if input.name.trim().is_empty() {
            anyhow::bail!("Name is required");
        }
        if !input.email.contains('@') {
            anyhow::bail!("Invalid email address");
        }
        if input.message.trim().is_empty() {
            anyhow::bail!("Message is required");
        }
        if input.message.len() > MAX_MESSAGE_LENGTH {
            anyhow::bail!("Message is too long");
        }

        let message = ContactMessage {
            id: 0,
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            is_read: false,
            created_at: Utc::now(),
        };
        self.repo
            .create(&message)
            .await
            .context("Failed to store contact message")
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>> {
        self.repo.list().await
    }

    /// Returns `None` when the id does not exist.
    pub async fn mark_read(&self, id: i64) -> Result<Option<ContactMessage>> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(None);
        }
        self.repo.mark_read(id).await?;
        self.repo.get_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }
}
