// Wire types for the backend REST surface.
//
// These mirror the backend's JSON exactly (camelCase keys); the core
// crate converts them into domain types and never hands them onward.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time read of the backend's cumulative counters.
///
/// `total_upload`/`total_download` are monotonically non-decreasing
/// except across a backend restart — consumers must not assume
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_upload: u64,
    pub total_download: u64,
    #[serde(default)]
    pub active_connections: u32,
    #[serde(default)]
    pub top_domains: HashMap<String, u64>,
    #[serde(default)]
    pub adblock_hits: u64,
}

/// One historical rate sample from the chart endpoint.
///
/// Timestamps here are backend-supplied and passed through unchanged
/// by the seeding path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub upload_rate: u64,
    pub download_rate: u64,
}

/// A live system connection as reported by the OS tracker.
///
/// The view-model layer only consumes the *count* of these (as a
/// fallback for `active_connections`); the fields exist so richer
/// shells can render the full table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub protocol: String,
    pub local_addr: String,
    pub remote_addr: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub process_name: Option<String>,
}

/// One filtering rule as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: String,
    pub kind: String,
    pub pattern: String,
    pub enabled: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub hit_count: u64,
}

/// A server-side page of rules plus the filtered total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesPageResponse {
    #[serde(default)]
    pub rules: Vec<RuleResponse>,
    pub total: u32,
}

/// Body for `POST /rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRuleRequest {
    pub pattern: String,
    pub kind: String,
}

/// Body for `PATCH /rules/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRuleRequest {
    pub enabled: bool,
}
