//! Typed feature endpoints used by the dashboard screens.
//!
//! Every call goes through [`HttpClient`], so the session cookie and bearer
//! token are attached and failures arrive as [`ApiError`].

use chrono::Utc;
use tracing::debug;

use super::{ApiError, HttpClient};
use crate::models::{
    Category, CategoryDraft, DashboardStats, FundingStats, NewProject, Project, ProjectUpdate,
    StatsOverview, Subcategory, SubcategoryDraft, Transaction, User, UserDraft,
};

/// Query parameters for list endpoints (`page`, `status`, search terms...)
pub type ListParams = [(String, String)];

#[derive(Clone)]
pub struct ApiService {
    http: HttpClient,
}

impl ApiService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ===== Projects =====

    pub async fn projects(&self, params: &ListParams) -> Result<Vec<Project>, ApiError> {
        let projects: Vec<Project> = self
            .http
            .get_with_params("/projects/admin/all", params)
            .await?;
        debug!(count = projects.len(), "Projects fetched");
        Ok(projects)
    }

    pub async fn project(&self, id: &str) -> Result<Project, ApiError> {
        self.http.get(&format!("/projects/{}", id)).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        let body = project.to_request(Utc::now());
        self.http.post("/projects/create", &body).await
    }

    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project, ApiError> {
        self.http.put(&format!("/projects/{}", id), update).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.http.delete(&format!("/projects/{}", id)).await
    }

    // ===== Users =====

    pub async fn users(&self, params: &ListParams) -> Result<Vec<User>, ApiError> {
        let users: Vec<User> = self.http.get_with_params("/users", params).await?;
        debug!(count = users.len(), "Users fetched");
        Ok(users)
    }

    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        self.http.get(&format!("/users/{}", id)).await
    }

    pub async fn create_user(&self, user: &UserDraft) -> Result<User, ApiError> {
        self.http.post("/users", user).await
    }

    pub async fn update_user(&self, id: &str, user: &UserDraft) -> Result<User, ApiError> {
        self.http.put(&format!("/users/{}", id), user).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.http.delete(&format!("/users/{}", id)).await
    }

    // ===== Categories =====

    pub async fn categories(&self, params: &ListParams) -> Result<Vec<Category>, ApiError> {
        let categories: Vec<Category> = self.http.get_with_params("/category/all", params).await?;
        debug!(count = categories.len(), "Categories fetched");
        Ok(categories)
    }

    pub async fn category(&self, id: &str) -> Result<Category, ApiError> {
        self.http.get(&format!("/categories/{}", id)).await
    }

    pub async fn create_category(&self, category: &CategoryDraft) -> Result<Category, ApiError> {
        self.http.post("/category/create", category).await
    }

    pub async fn create_subcategory(&self, subcategory: &SubcategoryDraft) -> Result<Subcategory, ApiError> {
        self.http.post("/category/sub/create", subcategory).await
    }

    pub async fn update_category(&self, id: &str, category: &CategoryDraft) -> Result<Category, ApiError> {
        self.http.put(&format!("/categories/{}", id), category).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.http.delete(&format!("/categories/{}", id)).await
    }

    // ===== Transactions =====

    pub async fn transactions(&self, params: &ListParams) -> Result<Vec<Transaction>, ApiError> {
        self.http.get_with_params("/transactions", params).await
    }

    // ===== Stats =====

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.http.get("/stats/dashboard").await
    }

    pub async fn funding_stats(&self) -> Result<FundingStats, ApiError> {
        self.http.get("/stats/funding").await
    }

    /// Fetch dashboard and funding stats concurrently
    pub async fn overview(&self) -> Result<StatsOverview, ApiError> {
        let (dashboard, funding) =
            futures::try_join!(self.dashboard_stats(), self.funding_stats())?;
        Ok(StatsOverview { dashboard, funding })
    }
}
