//! Reactive view-model layer between `netwarden-api` and UI consumers.
//!
//! This crate owns the dashboard's business logic: it polls the
//! filtering backend, derives per-interval rates from cumulative
//! counters, maintains the chart's sliding window, ranks top
//! consumers, and mediates the paginated rules collection.
//!
//! - **[`TelemetryFeed`]** — Polling pipeline for the live dashboard:
//!   one tick fetches a [`CounterSnapshot`], derives a [`RatePoint`]
//!   via the [`RateEngine`], appends it to the [`SlidingWindow`], and
//!   publishes the full derived [`TelemetryState`] over a
//!   `tokio::sync::watch` channel.
//!
//! - **[`RulesController`]** — State machine over one server-side page
//!   of the rules collection. Search, navigation, and mutations all
//!   resolve to explicit fetches; mutations are confirmed by refetch,
//!   never applied optimistically.
//!
//! - **[`Poller`]** — Owned periodic scheduler with explicit
//!   spawn/shutdown lifecycle and single-flight ticks. Drives both
//!   pipelines via the [`PollTask`] trait.
//!
//! - **[`SelectionModel`]** — Marked-row set independent of
//!   pagination, with all-or-nothing select-all semantics.

pub mod config;
pub mod error;
pub mod fmt;
pub mod model;
pub mod poller;
pub mod ranker;
pub mod rate;
pub mod rules;
pub mod selection;
pub mod series;
pub mod telemetry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BackendConfig, TlsVerification, ViewConfig};
pub use error::{CoreError, Result};
pub use fmt::{format_bytes, format_rate};
pub use model::{
    CounterSnapshot, PageState, RankedConsumer, RatePoint, RuleKind, RuleRecord, RuleSource,
    RulesPage, TimeRange,
};
pub use poller::{PollTask, Poller};
pub use ranker::{TOP_CONSUMER_LIMIT, rank_top_consumers};
pub use rate::RateEngine;
pub use rules::{RulesBackend, RulesController, RulesRefreshTask};
pub use selection::SelectionModel;
pub use series::SlidingWindow;
pub use telemetry::{
    TelemetryBackend, TelemetryFeed, TelemetryPollTask, TelemetryState,
};
