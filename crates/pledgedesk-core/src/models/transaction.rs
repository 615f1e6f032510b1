use serde::{Deserialize, Serialize};

use crate::utils::string_id;

/// A pledge made by a backer to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Transaction {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub backer: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}
