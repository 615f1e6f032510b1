//! Data models for the crowdfunding admin API.
//!
//! - `Credentials`, `AuthUser`, `LoginResponse`: authentication
//! - `Project`, `NewProject`, `ProjectUpdate`: campaigns, normalized at the boundary
//! - `User`, `UserDraft`: platform accounts
//! - `Category`, `Subcategory` and their drafts
//! - `Transaction`: pledges
//! - `DashboardStats`, `FundingStats`, `StatsOverview`: aggregates

pub mod auth;
pub mod category;
pub mod project;
pub mod stats;
pub mod transaction;
pub mod user;

pub use auth::{AuthUser, Credentials, LoginResponse, LoginUser};
pub use category::{Category, CategoryDraft, Subcategory, SubcategoryDraft};
pub use project::{CreateProjectRequest, NewProject, Project, ProjectRecord, ProjectUpdate};
pub use stats::{DashboardStats, FundingStats, StatsOverview};
pub use transaction::Transaction;
pub use user::{User, UserDraft};
