//! Blog service

use crate::db::repositories::BlogPostRepository;
use crate::models::{BlogPost, CreateBlogPostInput, UpdateBlogPostInput};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

pub struct BlogService {
    repo: Arc<dyn BlogPostRepository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogPostRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateBlogPostInput) -> Result<BlogPost> {
        if input.title.trim().is_empty() {
            anyhow::bail!("Title cannot be empty");
        }
        if input.slug.trim().is_empty() {
            anyhow::bail!("Slug cannot be empty");
        }

        let now = Utc::now();
        let post = BlogPost {
            id: 0,
            title: input.title,
            slug: input.slug,
            excerpt: input.excerpt,
            content: input.content,
            category: input.category,
            tags: input.tags,
            // Publishing without an explicit timestamp stamps it now
            published_at: input
                .published_at
                .or_else(|| input.is_published.then_some(now)),
            created_at: now,
            updated_at: now,
            is_published: input.is_published,
            read_time: input.read_time,
            views: 0,
        };

        self.repo.create(&post).await.context("Failed to create blog post")
    }

    pub async fn get(&self, id: i64) -> Result<Option<BlogPost>> {
        self.repo.get_by_id(id).await
    }

    pub async fn list(&self, published: Option<bool>) -> Result<Vec<BlogPost>> {
        self.repo.list(published).await
    }

    /// Patch a post. Returns `None` when the id does not exist.
    pub async fn update(&self, id: i64, input: UpdateBlogPostInput) -> Result<Option<BlogPost>> {
        let Some(mut post) = self.repo.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(slug) = input.slug {
            post.slug = slug;
        }
        if let Some(excerpt) = input.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(category) = input.category {
            post.category = category;
        }
        if let Some(tags) = input.tags {
            post.tags = tags;
        }
        if let Some(published_at) = input.published_at {
            post.published_at = published_at;
        }
        if let Some(is_published) = input.is_published {
            if is_published && !post.is_published && post.published_at.is_none() {
                post.published_at = Some(Utc::now());
            }
            post.is_published = is_published;
        }
        if let Some(read_time) = input.read_time {
            post.read_time = Some(read_time);
        }

        Ok(Some(self.repo.update(&post).await?))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }
}
