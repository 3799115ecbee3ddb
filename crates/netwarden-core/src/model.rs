// ── Domain model ──
//
// View-model-facing types derived from the backend wire types.
// Conversions from `netwarden_api` live here; the raw wire structs
// never escape this crate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Telemetry ────────────────────────────────────────────────────────

/// One point-in-time read of the backend's cumulative counters.
///
/// Immutable once received; superseded by the next snapshot. Counters
/// are monotonically non-decreasing except across a backend restart,
/// which the rate engine detects and clamps (never assumes absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub total_upload: u64,
    pub total_download: u64,
    pub active_connections: u32,
    pub top_domains: HashMap<String, u64>,
    pub adblock_hits: u64,
}

impl From<netwarden_api::StatsResponse> for CounterSnapshot {
    fn from(raw: netwarden_api::StatsResponse) -> Self {
        Self {
            total_upload: raw.total_upload,
            total_download: raw.total_download,
            active_connections: raw.active_connections,
            top_domains: raw.top_domains,
            adblock_hits: raw.adblock_hits,
        }
    }
}

/// One derived per-interval rate sample. Never negative by
/// construction (the engine clamps counter resets to zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub upload_rate: u64,
    pub download_rate: u64,
}

impl RatePoint {
    /// A zero-value placeholder used to pad an empty seeded window.
    pub(crate) fn placeholder(timestamp: DateTime<Utc>) -> Self {
        Self {
            label: String::new(),
            timestamp,
            upload_rate: 0,
            download_rate: 0,
        }
    }
}

impl From<netwarden_api::ChartPoint> for RatePoint {
    fn from(raw: netwarden_api::ChartPoint) -> Self {
        // Historical points keep the backend-supplied timestamps.
        Self {
            label: raw.label,
            timestamp: raw.timestamp,
            upload_rate: raw.upload_rate,
            download_rate: raw.download_rate,
        }
    }
}

/// Named historical window selector. Controls both the seeded history
/// depth requested from the backend and the live buffer capacity —
/// shorter ranges use smaller, denser windows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum TimeRange {
    #[default]
    #[strum(serialize = "1h")]
    LastHour,
    #[strum(serialize = "3h")]
    Last3Hours,
    #[strum(serialize = "24h")]
    Last24Hours,
}

impl TimeRange {
    /// The token sent to the backend chart endpoint.
    pub fn token(self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::Last3Hours => "3h",
            Self::Last24Hours => "24h",
        }
    }

    /// Fixed sliding-window capacity for this range.
    pub fn capacity(self) -> usize {
        match self {
            Self::LastHour => 120,
            Self::Last3Hours => 180,
            Self::Last24Hours => 200,
        }
    }
}

/// One ranked "top consumer" row, display-ready.
///
/// Carries both the raw byte value (for bar lengths) and the formatted
/// string (for labels) so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedConsumer {
    pub display_domain: String,
    pub raw_bytes: u64,
    pub formatted: String,
}

// ── Rules ────────────────────────────────────────────────────────────

/// What a rule does when its pattern matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleKind {
    Block,
    Allow,
}

/// Where a rule came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
    Default,
    #[default]
    Custom,
}

/// One filtering rule. Owned by the backend — the controller only ever
/// caches the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub kind: RuleKind,
    pub pattern: String,
    pub enabled: bool,
    pub source: RuleSource,
    pub hit_count: u64,
}

impl From<netwarden_api::RuleResponse> for RuleRecord {
    fn from(raw: netwarden_api::RuleResponse) -> Self {
        // An unrecognized kind/source string degrades to a safe default
        // rather than failing the whole page.
        Self {
            id: raw.id,
            kind: raw.kind.parse().unwrap_or(RuleKind::Block),
            pattern: raw.pattern,
            enabled: raw.enabled,
            source: raw
                .source
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            hit_count: raw.hit_count,
        }
    }
}

/// One fetched page of rules plus the filtered total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesPage {
    pub rows: Vec<RuleRecord>,
    pub total_items: u32,
}

impl From<netwarden_api::RulesPageResponse> for RulesPage {
    fn from(raw: netwarden_api::RulesPageResponse) -> Self {
        Self {
            rows: raw.rules.into_iter().map(RuleRecord::from).collect(),
            total_items: raw.total,
        }
    }
}

/// The visible page and its pagination bookkeeping.
///
/// Invariants (held after every successful fetch):
/// `rows.len() <= page_size` and `page_number <= max(1, total_pages())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page_number: u32,
    pub page_size: u32,
    pub search_term: String,
    pub total_items: u32,
    pub rows: Vec<RuleRecord>,
}

impl PageState {
    pub(crate) fn new(page_size: u32) -> Self {
        debug_assert!(page_size > 0);
        Self {
            page_number: 1,
            page_size,
            search_term: String::new(),
            total_items: 0,
            rows: Vec::new(),
        }
    }

    /// Number of pages implied by the current total (0 when empty).
    pub fn total_pages(&self) -> u32 {
        self.total_items.div_ceil(self.page_size)
    }

    /// Whether a later page exists.
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }

    /// Whether an earlier page exists.
    pub fn has_prev_page(&self) -> bool {
        self.page_number > 1
    }
}
