//! Skill repository
//!
//! Covers both the `skill_categories` and `skills` tables; the public read
//! path joins them into categories with nested skills.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Skill, SkillCategory, SkillCategoryWithSkills};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_category(&self, category: &SkillCategory) -> Result<SkillCategory>;
    async fn get_category_by_id(&self, id: i64) -> Result<Option<SkillCategory>>;
    async fn update_category(&self, category: &SkillCategory) -> Result<SkillCategory>;
    async fn delete_category(&self, id: i64) -> Result<()>;

    async fn create_skill(&self, skill: &Skill) -> Result<Skill>;
    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>>;
    async fn update_skill(&self, skill: &Skill) -> Result<Skill>;
    async fn delete_skill(&self, id: i64) -> Result<()>;

    /// Categories with their skills nested, both in sort order.
    async fn list_grouped(&self) -> Result<Vec<SkillCategoryWithSkills>>;
}

pub struct SqlxSkillRepository {
    pool: DynDatabasePool,
}

impl SqlxSkillRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SkillRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepository {
    async fn create_category(&self, category: &SkillCategory) -> Result<SkillCategory> {
        let query = "INSERT INTO skill_categories (name, sort_order) VALUES (?, ?)";
        let mut created = category.clone();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let result = sqlx::query(query)
                    .bind(&category.name)
                    .bind(category.sort_order)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to create skill category")?;
                created.id = result.last_insert_rowid();
            }
            DatabaseDriver::Mysql => {
                let result = sqlx::query(query)
                    .bind(&category.name)
                    .bind(category.sort_order)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to create skill category")?;
                created.id = result.last_insert_id() as i64;
            }
        }
        Ok(created)
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<SkillCategory>> {
        let query = "SELECT id, name, sort_order FROM skill_categories WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(query)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get skill category")?;
                Ok(row.map(|r| SkillCategory {
                    id: r.get("id"),
                    name: r.get("name"),
                    sort_order: r.get("sort_order"),
                }))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(query)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get skill category")?;
                Ok(row.map(|r| SkillCategory {
                    id: r.get("id"),
                    name: r.get("name"),
                    sort_order: r.get("sort_order"),
                }))
            }
        }
    }

    async fn update_category(&self, category: &SkillCategory) -> Result<SkillCategory> {
        let query = "UPDATE skill_categories SET name = ?, sort_order = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(&category.name)
                    .bind(category.sort_order)
                    .bind(category.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update skill category")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(&category.name)
                    .bind(category.sort_order)
                    .bind(category.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update skill category")?;
            }
        }
        self.get_category_by_id(category.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Skill category not found after update"))
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM skill_categories WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete skill category")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete skill category")?;
            }
        }
        Ok(())
    }

    async fn create_skill(&self, skill: &Skill) -> Result<Skill> {
        let query = "INSERT INTO skills (category_id, name, level, sort_order) VALUES (?, ?, ?, ?)";
        let mut created = skill.clone();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let result = sqlx::query(query)
                    .bind(skill.category_id)
                    .bind(&skill.name)
                    .bind(skill.level)
                    .bind(skill.sort_order)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to create skill")?;
                created.id = result.last_insert_rowid();
            }
            DatabaseDriver::Mysql => {
                let result = sqlx::query(query)
                    .bind(skill.category_id)
                    .bind(&skill.name)
                    .bind(skill.level)
                    .bind(skill.sort_order)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to create skill")?;
                created.id = result.last_insert_id() as i64;
            }
        }
        Ok(created)
    }

    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>> {
        let query = "SELECT id, category_id, name, level, sort_order FROM skills WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(query)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get skill")?;
                Ok(row.map(|r| row_to_skill_sqlite(&r)))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(query)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get skill")?;
                Ok(row.map(|r| row_to_skill_mysql(&r)))
            }
        }
    }

    async fn update_skill(&self, skill: &Skill) -> Result<Skill> {
        let query =
            "UPDATE skills SET category_id = ?, name = ?, level = ?, sort_order = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(skill.category_id)
                    .bind(&skill.name)
                    .bind(skill.level)
                    .bind(skill.sort_order)
                    .bind(skill.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update skill")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(skill.category_id)
                    .bind(&skill.name)
                    .bind(skill.level)
                    .bind(skill.sort_order)
                    .bind(skill.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update skill")?;
            }
        }
        self.get_skill_by_id(skill.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Skill not found after update"))
    }

    async fn delete_skill(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM skills WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete skill")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete skill")?;
            }
        }
        Ok(())
    }

    async fn list_grouped(&self) -> Result<Vec<SkillCategoryWithSkills>> {
        let categories_query = "SELECT id, name, sort_order FROM skill_categories ORDER BY sort_order";
        let skills_query =
            "SELECT id, category_id, name, level, sort_order FROM skills ORDER BY sort_order";

        let (categories, skills): (Vec<SkillCategory>, Vec<Skill>) = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let category_rows = sqlx::query(categories_query)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list skill categories")?;
                let skill_rows = sqlx::query(skills_query)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list skills")?;
                (
                    category_rows
                        .iter()
                        .map(|r| SkillCategory {
                            id: r.get("id"),
                            name: r.get("name"),
                            sort_order: r.get("sort_order"),
                        })
                        .collect(),
                    skill_rows.iter().map(row_to_skill_sqlite).collect(),
                )
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let category_rows = sqlx::query(categories_query)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list skill categories")?;
                let skill_rows = sqlx::query(skills_query)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list skills")?;
                (
                    category_rows
                        .iter()
                        .map(|r| SkillCategory {
                            id: r.get("id"),
                            name: r.get("name"),
                            sort_order: r.get("sort_order"),
                        })
                        .collect(),
                    skill_rows.iter().map(row_to_skill_mysql).collect(),
                )
            }
        };

        Ok(group_skills(categories, skills))
    }
}

/// Nest skills under their categories, preserving sort order.
fn group_skills(categories: Vec<SkillCategory>, skills: Vec<Skill>) -> Vec<SkillCategoryWithSkills> {
    categories
        .into_iter()
        .map(|category| {
            let members = skills
                .iter()
                .filter(|s| s.category_id == Some(category.id))
                .cloned()
                .collect();
            SkillCategoryWithSkills {
                category,
                skills: members,
            }
        })
        .collect()
}

fn row_to_skill_sqlite(row: &sqlx::sqlite::SqliteRow) -> Skill {
    Skill {
        id: row.get("id"),
        category_id: row.get("category_id"),
        name: row.get("name"),
        level: row.get("level"),
        sort_order: row.get("sort_order"),
    }
}

fn row_to_skill_mysql(row: &sqlx::mysql::MySqlRow) -> Skill {
    Skill {
        id: row.get("id"),
        category_id: row.get("category_id"),
        name: row.get("name"),
        level: row.get("level"),
        sort_order: row.get("sort_order"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxSkillRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSkillRepository::new(pool)
    }

    fn category(name: &str, sort_order: i32) -> SkillCategory {
        SkillCategory {
            id: 0,
            name: name.into(),
            sort_order,
        }
    }

    fn skill(category_id: Option<i64>, name: &str, level: i32) -> Skill {
        Skill {
            id: 0,
            category_id,
            name: name.into(),
            level,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_list_grouped_nests_skills() {
        let repo = setup_test_repo().await;

        let langs = repo.create_category(&category("Languages", 0)).await.unwrap();
        let tools = repo.create_category(&category("Tooling", 1)).await.unwrap();

        repo.create_skill(&skill(Some(langs.id), "Rust", 90)).await.unwrap();
        repo.create_skill(&skill(Some(langs.id), "TypeScript", 80)).await.unwrap();
        repo.create_skill(&skill(Some(tools.id), "Docker", 70)).await.unwrap();

        let grouped = repo.list_grouped().await.unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].category.name, "Languages");
        assert_eq!(grouped[0].skills.len(), 2);
        assert_eq!(grouped[1].skills.len(), 1);
    }

    #[tokio::test]
    async fn test_update_skill_and_category() {
        let repo = setup_test_repo().await;

        let mut cat = repo.create_category(&category("Langs", 0)).await.unwrap();
        cat.name = "Languages".into();
        assert_eq!(repo.update_category(&cat).await.unwrap().name, "Languages");

        let mut s = repo.create_skill(&skill(Some(cat.id), "Rust", 50)).await.unwrap();
        s.level = 95;
        assert_eq!(repo.update_skill(&s).await.unwrap().level, 95);
    }

    #[tokio::test]
    async fn test_deleting_category_orphans_skills() {
        let repo = setup_test_repo().await;

        let cat = repo.create_category(&category("Languages", 0)).await.unwrap();
        let s = repo.create_skill(&skill(Some(cat.id), "Rust", 90)).await.unwrap();

        repo.delete_category(cat.id).await.unwrap();

        // FK is ON DELETE SET NULL: the skill survives without a category
        let orphan = repo.get_skill_by_id(s.id).await.unwrap().unwrap();
        assert!(orphan.category_id.is_none());
        assert!(repo.list_grouped().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_skill() {
        let repo = setup_test_repo().await;

        let s = repo.create_skill(&skill(None, "Rust", 90)).await.unwrap();
        repo.delete_skill(s.id).await.unwrap();
        assert!(repo.get_skill_by_id(s.id).await.unwrap().is_none());
    }
}
