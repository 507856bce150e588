//! Services layer - Business logic
//!
//! Services implement business rules, coordinate repositories and the cache,
//! and handle validation. The auth service is the security core; the rest
//! are thin wrappers over their repositories.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod content;
pub mod navigation;
pub mod password;
pub mod profile;
pub mod project;
pub mod rate_limiter;
pub mod resume;

pub use auth::{AuthContext, AuthError, AuthService, LoginOutcome};
pub use blog::BlogService;
pub use contact::ContactService;
pub use content::ContentService;
pub use navigation::NavigationService;
pub use password::{generate_salt, hash_password, verify_password};
pub use profile::ProfileService;
pub use project::ProjectService;
pub use rate_limiter::LoginThrottle;
pub use resume::ResumeService;
