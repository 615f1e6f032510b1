//! Crowdfunding project models.
//!
//! The backend is inconsistent about project field names: the goal arrives
//! as `funding_goal` or `goal`, the title as `title` or `name`, the deadline
//! as `deadline` or `endDate`. [`ProjectRecord`] accepts every variant and
//! is converted into the canonical [`Project`] at deserialization time, so
//! only one name per field exists past the API boundary.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{amount, string_id};

/// Campaign length used when neither a deadline nor a duration is given
pub const DEFAULT_DURATION_DAYS: u32 = 30;

/// Wire shape of a project as returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRecord {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "string_id::deserialize_opt")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_id::deserialize_opt")]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default, deserialize_with = "amount::deserialize_opt")]
    pub current_amount: Option<f64>,
    #[serde(default, deserialize_with = "amount::deserialize_opt")]
    pub funding_goal: Option<f64>,
    #[serde(default, deserialize_with = "amount::deserialize_opt")]
    pub goal: Option<f64>,
    #[serde(default, deserialize_with = "amount::deserialize_opt")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub backers: Option<u64>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

/// A project in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProjectRecord")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Project {
    pub id: String,
    pub title: String,
    pub creator: Option<String>,
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub subcategory_id: Option<String>,
    pub funding: Option<String>,
    pub current_amount: f64,
    pub funding_goal: f64,
    /// Percentage of the goal reached
    pub progress: f64,
    pub status: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub backers: u64,
    pub created_at: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        let current_amount = record.current_amount.unwrap_or(0.0);
        let funding_goal = record.funding_goal.or(record.goal).unwrap_or(0.0);

        // Derive progress when the backend leaves it out
        let progress = record.progress.unwrap_or_else(|| {
            if funding_goal > 0.0 {
                (current_amount / funding_goal * 100.0).round()
            } else {
                0.0
            }
        });

        Self {
            id: record.id,
            title: non_empty(record.title)
                .or_else(|| non_empty(record.name))
                .unwrap_or_default(),
            creator: record.creator,
            user_id: record.user_id,
            category: record.category,
            subcategory_id: record.subcategory_id,
            funding: record.funding,
            current_amount,
            funding_goal,
            progress,
            status: record.status.unwrap_or_else(|| "active".to_string()),
            description: record.description,
            deadline: non_empty(record.deadline).or_else(|| non_empty(record.end_date)),
            backers: record.backers.unwrap_or(0),
            created_at: record.created_at,
        }
    }
}

impl Project {
    pub fn is_funded(&self) -> bool {
        self.funding_goal > 0.0 && self.current_amount >= self.funding_goal
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub user_id: String,
    pub subcategory_id: String,
    pub title: String,
    pub description: Option<String>,
    pub funding_goal: f64,
    pub current_amount: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    /// Used to compute the deadline when none is given
    pub duration_days: Option<u32>,
    pub status: Option<String>,
}

/// Body of `POST /projects/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProjectRequest {
    pub user_id: String,
    pub subcategory_id: String,
    pub title: String,
    pub description: String,
    pub funding_goal: f64,
    pub current_amount: f64,
    pub deadline: String,
    pub status: String,
}

impl NewProject {
    /// Map to the wire body, resolving the deadline relative to `now`
    pub fn to_request(&self, now: DateTime<Utc>) -> CreateProjectRequest {
        let deadline = self.deadline.unwrap_or_else(|| {
            let days = self.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
            now + Duration::days(i64::from(days))
        });

        CreateProjectRequest {
            user_id: self.user_id.clone(),
            subcategory_id: self.subcategory_id.clone(),
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            funding_goal: self.funding_goal,
            current_amount: self.current_amount.unwrap_or(0.0),
            deadline: deadline.to_rfc3339(),
            status: self.status.clone().unwrap_or_else(|| "active".to_string()),
        }
    }
}

/// Partial update for `PUT /projects/{id}`; unset fields are not sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
