//! Aggregate statistics shown on the dashboard landing page.

use serde::{Deserialize, Serialize};

/// Response of `GET /stats/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardStats {
    pub total_projects: String,
    pub total_funding: String,
    pub total_pledges: String,
    pub active_projects: String,
    pub projects_growth: String,
    pub funding_growth: String,
    pub pledges_growth: String,
    pub active_projects_growth: String,
}

/// Response of `GET /stats/funding`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FundingStats {
    pub monthly_funding: String,
    pub average_pledge: String,
    pub successful_projects: String,
    pub failed_projects: String,
    pub monthly_funding_growth: String,
    pub average_pledge_growth: String,
    pub successful_projects_growth: String,
    pub failed_projects_growth: String,
}

/// Both stat groups, fetched together
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatsOverview {
    pub dashboard: DashboardStats,
    pub funding: FundingStats,
}
