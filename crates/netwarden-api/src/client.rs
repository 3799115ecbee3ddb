// Hand-crafted async HTTP client for the backend REST surface.
//
// Base path: /api/v1/
// All endpoints are unauthenticated — the backend binds to loopback.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    AddRuleRequest, ChartPoint, ConnectionInfo, RulesPageResponse, StatsResponse,
    ToggleRuleRequest,
};

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the counting/filtering backend.
///
/// Cheap to clone — `reqwest::Client` is internally reference-counted.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::from_reqwest(base_url, http)?;
        client.timeout = transport.timeout;
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Build the base URL so it always ends with `/api/v1/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/v1/"));
        }
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"stats"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Fold a hit deadline into `Timeout`; everything else stays a
    /// plain transport error.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            err.into()
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::handle_empty(resp).await
    }

    async fn patch_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::handle_empty(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() { status.to_string() } else { raw },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Telemetry ────────────────────────────────────────────────────

    /// Fetch the current cumulative counter snapshot.
    pub async fn get_stats(&self) -> Result<StatsResponse, Error> {
        self.get("stats").await
    }

    /// Fetch the historical rate series for a named range token
    /// (e.g. `"1h"`, `"3h"`, `"24h"`).
    pub async fn get_chart_data(&self, range_token: &str) -> Result<Vec<ChartPoint>, Error> {
        self.get_with_params("stats/chart", &[("range", range_token.to_owned())])
            .await
    }

    /// Fetch the live system connection table.
    pub async fn get_system_connections(&self) -> Result<Vec<ConnectionInfo>, Error> {
        self.get("system/connections").await
    }

    // ── Rules ────────────────────────────────────────────────────────

    /// Fetch one server-side page of rules, filtered by `search`.
    pub async fn get_rules_paginated(
        &self,
        page: u32,
        page_size: u32,
        search: &str,
    ) -> Result<RulesPageResponse, Error> {
        self.get_with_params(
            "rules",
            &[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
                ("search", search.to_owned()),
            ],
        )
        .await
    }

    /// Enable or disable a single rule.
    pub async fn toggle_rule(&self, id: &str, enabled: bool) -> Result<(), Error> {
        self.patch_no_response(&format!("rules/{id}"), &ToggleRuleRequest { enabled })
            .await
    }

    /// Delete a single rule.
    pub async fn delete_rule(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("rules/{id}")).await
    }

    /// Create a new rule from a pattern and kind string
    /// (`"BLOCK"` / `"ALLOW"`).
    pub async fn add_rule(&self, pattern: &str, kind: &str) -> Result<(), Error> {
        self.post_no_response(
            "rules",
            &AddRuleRequest {
                pattern: pattern.to_owned(),
                kind: kind.to_owned(),
            },
        )
        .await
    }
}
