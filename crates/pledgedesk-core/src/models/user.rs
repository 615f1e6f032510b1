//! Platform user accounts (creators and backers) as managed by staff.

use serde::{Deserialize, Serialize};

use crate::utils::string_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Number of projects created
    #[serde(default)]
    pub projects: u64,
    /// Number of projects backed
    #[serde(default)]
    pub backed: u64,
    #[serde(default)]
    pub pledged: String,
    #[serde(default)]
    pub joined: String,
    #[serde(default)]
    pub status: String,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Fields sent when creating or updating a user; unset fields are omitted
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
