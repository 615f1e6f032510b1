//! Project categories and their subcategories.

use serde::{Deserialize, Serialize};

use crate::utils::string_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Category {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub projects: u64,
    #[serde(default)]
    pub funding: String,
    #[serde(default)]
    pub success_rate: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Subcategory {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "parent_id", deserialize_with = "string_id::deserialize_opt")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub projects: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
}

/// Body for `POST /category/create` and `PUT /categories/{id}`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}

/// Body for `POST /category/sub/create`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDraft {
    pub name: String,
    pub parent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}
