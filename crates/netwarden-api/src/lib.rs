// netwarden-api: Async Rust client for the counting/filtering backend.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::BackendClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    AddRuleRequest, ChartPoint, ConnectionInfo, RuleResponse, RulesPageResponse, StatsResponse,
    ToggleRuleRequest,
};
