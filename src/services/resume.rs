//! Resume service
//!
//! One service for the three resume sections: experiences, education, and
//! skills. They share a lifecycle (admin-edited, publicly listed in sort
//! order) and are always rendered together.

use crate::db::repositories::{EducationRepository, ExperienceRepository, SkillRepository};
use crate::models::{
    CreateEducationInput, CreateExperienceInput, CreateSkillCategoryInput, CreateSkillInput,
    Education, Experience, Skill, SkillCategory, SkillCategoryWithSkills, UpdateEducationInput,
    UpdateExperienceInput, UpdateSkillCategoryInput, UpdateSkillInput,
};
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct ResumeService {
    experiences: Arc<dyn ExperienceRepository>,
    education: Arc<dyn EducationRepository>,
    skills: Arc<dyn SkillRepository>,
}

impl ResumeService {
    pub fn new(
        experiences: Arc<dyn ExperienceRepository>,
        education: Arc<dyn EducationRepository>,
        skills: Arc<dyn SkillRepository>,
    ) -> Self {
        Self {
            experiences,
            education,
            skills,
        }
    }

    // ------------------------------------------------------------------
    // Experiences
    // ------------------------------------------------------------------

    pub async fn create_experience(&self, input: CreateExperienceInput) -> Result<Experience> {
        if input.title.trim().is_empty() || input.company.trim().is_empty() {
            anyhow::bail!("Title and company are required");
        }

        let experience = Experience {
            id: 0,
            title: input.title,
            company: input.company,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
            achievements: input.achievements,
            technologies: input.technologies,
            sort_order: input.sort_order,
        };
        self.experiences
            .create(&experience)
            .await
            .context("Failed to create experience")
    }

    pub async fn list_experiences(&self) -> Result<Vec<Experience>> {
        self.experiences.list().await
    }

    pub async fn update_experience(
        &self,
        id: i64,
        input: UpdateExperienceInput,
    ) -> Result<Option<Experience>> {
        let Some(mut experience) = self.experiences.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            experience.title = title;
        }
        if let Some(company) = input.company {
            experience.company = company;
        }
        if let Some(location) = input.location {
            experience.location = Some(location);
        }
        if let Some(start_date) = input.start_date {
            experience.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            experience.end_date = end_date;
        }
        if let Some(description) = input.description {
            experience.description = Some(description);
        }
        if let Some(achievements) = input.achievements {
            experience.achievements = achievements;
        }
        if let Some(technologies) = input.technologies {
            experience.technologies = technologies;
        }
        if let Some(sort_order) = input.sort_order {
            experience.sort_order = sort_order;
        }

        Ok(Some(self.experiences.update(&experience).await?))
    }

    pub async fn delete_experience(&self, id: i64) -> Result<()> {
        self.experiences.delete(id).await
    }

    // ------------------------------------------------------------------
    // Education
    // ------------------------------------------------------------------

    pub async fn create_education(&self, input: CreateEducationInput) -> Result<Education> {
        if input.degree.trim().is_empty() || input.institution.trim().is_empty() {
            anyhow::bail!("Degree and institution are required");
        }

        let education = Education {
            id: 0,
            degree: input.degree,
            institution: input.institution,
            location: input.location,
            start_year: input.start_year,
            end_year: input.end_year,
            description: input.description,
            gpa: input.gpa,
            sort_order: input.sort_order,
        };
        self.education
            .create(&education)
            .await
            .context("Failed to create education entry")
    }

    pub async fn list_education(&self) -> Result<Vec<Education>> {
        self.education.list().await
    }

    pub async fn update_education(
        &self,
        id: i64,
        input: UpdateEducationInput,
    ) -> Result<Option<Education>> {
        let Some(mut education) = self.education.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(degree) = input.degree {
            education.degree = degree;
        }
        if let Some(institution) = input.institution {
            education.institution = institution;
        }
        if let Some(location) = input.location {
            education.location = Some(location);
        }
        if let Some(start_year) = input.start_year {
            education.start_year = start_year;
        }
        if let Some(end_year) = input.end_year {
            education.end_year = end_year;
        }
        if let Some(description) = input.description {
            education.description = Some(description);
        }
        if let Some(gpa) = input.gpa {
            education.gpa = Some(gpa);
        }
        if let Some(sort_order) = input.sort_order {
            education.sort_order = sort_order;
        }

        Ok(Some(self.education.update(&education).await?))
    }

    pub async fn delete_education(&self, id: i64) -> Result<()> {
        self.education.delete(id).await
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    pub async fn list_skills(&self) -> Result<Vec<SkillCategoryWithSkills>> {
        self.skills.list_grouped().await
    }

    pub async fn create_skill_category(
        &self,
        input: CreateSkillCategoryInput,
    ) -> Result<SkillCategory> {
        if input.name.trim().is_empty() {
            anyhow::bail!("Category name is required");
        }
        let category = SkillCategory {
            id: 0,
            name: input.name,
            sort_order: input.sort_order,
        };
        self.skills
            .create_category(&category)
            .await
            .context("Failed to create skill category")
    }

    pub async fn update_skill_category(
        &self,
        id: i64,
        input: UpdateSkillCategoryInput,
    ) -> Result<Option<SkillCategory>> {
        let Some(mut category) = self.skills.get_category_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(sort_order) = input.sort_order {
            category.sort_order = sort_order;
        }

        Ok(Some(self.skills.update_category(&category).await?))
    }

    pub async fn delete_skill_category(&self, id: i64) -> Result<()> {
        self.skills.delete_category(id).await
    }

    pub async fn create_skill(&self, input: CreateSkillInput) -> Result<Skill> {
        if input.name.trim().is_empty() {
            anyhow::bail!("Skill name is required");
        }
        if !(1..=100).contains(&input.level) {
            anyhow::bail!("Skill level must be between 1 and 100");
        }

        let skill = Skill {
            id: 0,
            category_id: input.category_id,
            name: input.name,
            level: input.level,
            sort_order: input.sort_order,
        };
        self.skills
            .create_skill(&skill)
            .await
            .context("Failed to create skill")
    }

    pub async fn update_skill(&self, id: i64, input: UpdateSkillInput) -> Result<Option<Skill>> {
        let Some(mut skill) = self.skills.get_skill_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(category_id) = input.category_id {
            skill.category_id = category_id;
        }
        if let Some(name) = input.name {
            skill.name = name;
        }
        if let Some(level) = input.level {
            if !(1..=100).contains(&level) {
                anyhow::bail!("Skill level must be between 1 and 100");
            }
            skill.level = level;
        }
        if let Some(sort_order) = input.sort_order {
            skill.sort_order = sort_order;
        }

        Ok(Some(self.skills.update_skill(&skill).await?))
    }

    pub async fn delete_skill(&self, id: i64) -> Result<()> {
        self.skills.delete_skill(id).await
    }
}
