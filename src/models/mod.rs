//! Data models
//!
//! This module contains all data structures used throughout the Folio
//! portfolio system:
//! - Database entities (AdminUser, AdminSession, NavigationItem, ContentSection,
//!   BlogPost, Experience, Education, SkillCategory, Skill, Project, Profile,
//!   ContactMessage)
//! - Create/Update input types deserialized from API request bodies

mod admin;
mod blog_post;
mod contact_message;
mod content_section;
mod education;
mod experience;
mod navigation;
mod profile;
mod project;
mod session;
mod skill;

pub use admin::{AdminUser, AdminUserSummary};
pub use blog_post::{BlogPost, CreateBlogPostInput, UpdateBlogPostInput};
pub use contact_message::{ContactMessage, CreateContactMessageInput};
pub use content_section::{ContentSection, UpsertContentSectionInput};
pub use education::{CreateEducationInput, Education, UpdateEducationInput};
pub use experience::{CreateExperienceInput, Experience, UpdateExperienceInput};
pub use navigation::{CreateNavigationItemInput, NavigationItem, UpdateNavigationItemInput};
pub use profile::{Profile, UpsertProfileInput};
pub use project::{CreateProjectInput, Project, UpdateProjectInput};
pub use session::AdminSession;
pub use skill::{
    CreateSkillCategoryInput, CreateSkillInput, Skill, SkillCategory, SkillCategoryWithSkills,
    UpdateSkillCategoryInput, UpdateSkillInput,
};
