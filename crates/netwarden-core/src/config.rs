// ── Runtime configuration ──
//
// These types describe how to reach the backend and how fast the view
// layer polls it. The shell constructs them and hands them in — core
// never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use netwarden_api::{BackendClient, TlsMode, TransportConfig};

use crate::error::Result;
use crate::model::TimeRange;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local
    /// backends.
    #[default]
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// How to connect to the filtering backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base URL (e.g. `http://127.0.0.1:8787`).
    pub url: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8787".to_owned(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl BackendConfig {
    /// Build a ready-to-use client from this config.
    pub fn connect(&self) -> Result<BackendClient> {
        let transport = TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        };
        Ok(BackendClient::new(&self.url, &transport)?)
    }
}

/// Cadence and sizing knobs. Defaults mirror the shipped UI: a 1s
/// telemetry poll, a 2s rules refresh, and 50-row pages.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Interval between counter-snapshot polls.
    pub poll_interval: Duration,
    /// Interval between background refreshes of the visible rules page.
    pub rules_refresh_interval: Duration,
    /// Fixed page size for the rules list.
    pub page_size: u32,
    /// Time range selected when the dashboard first mounts.
    pub initial_range: TimeRange,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            rules_refresh_interval: Duration::from_secs(2),
            page_size: 50,
            initial_range: TimeRange::LastHour,
        }
    }
}
