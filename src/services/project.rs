//! Project service

use crate::db::repositories::ProjectRepository;
use crate::models::{CreateProjectInput, Project, UpdateProjectInput};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateProjectInput) -> Result<Project> {
        if input.name.trim().is_empty() {
            anyhow::bail!("Project name is required");
        }

        let now = Utc::now();
        let project = Project {
            id: 0,
            name: input.name,
            description: input.description,
            technologies: input.technologies,
            github_url: input.github_url,
            live_url: input.live_url,
            image_url: input.image_url,
            featured: input.featured,
            stars: input.stars,
            forks: input.forks,
            language: input.language,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&project).await.context("Failed to create project")
    }

    pub async fn list(&self, featured: Option<bool>) -> Result<Vec<Project>> {
        self.repo.list(featured).await
    }

    pub async fn update(&self, id: i64, input: UpdateProjectInput) -> Result<Option<Project>> {
        let Some(mut project) = self.repo.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            project.name = name;
        }
        if let Some(description) = input.description {
            project.description = description;
        }
        if let Some(technologies) = input.technologies {
            project.technologies = technologies;
        }
        if let Some(github_url) = input.github_url {
            project.github_url = Some(github_url);
        }
        if let Some(live_url) = input.live_url {
            project.live_url = Some(live_url);
        }
        if let Some(image_url) = input.image_url {
            project.image_url = Some(image_url);
        }
        if let Some(featured) = input.featured {
            project.featured = featured;
        }
        if let Some(stars) = input.stars {
            project.stars = stars;
        }
        if let Some(forks) = input.forks {
            project.forks = forks;
        }
        if let Some(language) = input.language {
            project.language = Some(language);
        }
        if let Some(sort_order) = input.sort_order {
            project.sort_order = sort_order;
        }

        Ok(Some(self.repo.update(&project).await?))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }
}
