// Integration tests for `BackendClient` using wiremock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwarden_api::{BackendClient, Error, TlsMode, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let client = BackendClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_stats() {
    let (server, client) = setup().await;

    let body = json!({
        "totalUpload": 1024u64,
        "totalDownload": 4096u64,
        "activeConnections": 12,
        "topDomains": { "cdn.example.com": 2048u64, "example.com": 1024u64 },
        "adblockHits": 7u64,
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.get_stats().await.unwrap();

    assert_eq!(stats.total_upload, 1024);
    assert_eq!(stats.total_download, 4096);
    assert_eq!(stats.active_connections, 12);
    assert_eq!(stats.top_domains.get("cdn.example.com"), Some(&2048));
    assert_eq!(stats.adblock_hits, 7);
}

#[tokio::test]
async fn test_get_stats_missing_optional_fields() {
    let (server, client) = setup().await;

    // A minimal backend only reports the two counters.
    let body = json!({ "totalUpload": 10u64, "totalDownload": 20u64 });

    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.get_stats().await.unwrap();
    assert_eq!(stats.active_connections, 0);
    assert!(stats.top_domains.is_empty());
}

#[tokio::test]
async fn test_get_chart_data_passes_range_token() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "label": "10:00:00",
            "timestamp": "2025-06-01T10:00:00Z",
            "uploadRate": 100u64,
            "downloadRate": 300u64,
        },
        {
            "label": "10:00:01",
            "timestamp": "2025-06-01T10:00:01Z",
            "uploadRate": 120u64,
            "downloadRate": 280u64,
        },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v1/stats/chart"))
        .and(query_param("range", "1h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let points = client.get_chart_data("1h").await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].upload_rate, 100);
    assert_eq!(points[1].label, "10:00:01");
    assert!(points[0].timestamp < points[1].timestamp);
}

#[tokio::test]
async fn test_get_rules_paginated_query_shape() {
    let (server, client) = setup().await;

    let body = json!({
        "rules": [
            {
                "id": "r-1",
                "kind": "BLOCK",
                "pattern": "*.doubleclick.net",
                "enabled": true,
                "source": "default",
                "hitCount": 1452u64,
            },
        ],
        "total": 101,
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/rules"))
        .and(query_param("page", "3"))
        .and(query_param("pageSize", "50"))
        .and(query_param("search", "double"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page = client.get_rules_paginated(3, 50, "double").await.unwrap();

    assert_eq!(page.total, 101);
    assert_eq!(page.rules.len(), 1);
    assert_eq!(page.rules[0].id, "r-1");
    assert_eq!(page.rules[0].hit_count, 1452);
}

#[tokio::test]
async fn test_toggle_rule_sends_patch_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/rules/r-42"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.toggle_rule("r-42", false).await.unwrap();
}

#[tokio::test]
async fn test_delete_rule() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/rules/r-7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_rule("r-7").await.unwrap();
}

#[tokio::test]
async fn test_add_rule_sends_post_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/rules"))
        .and(body_json(json!({ "pattern": "ads.example.com", "kind": "BLOCK" })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    client.add_rule("ads.example.com", "BLOCK").await.unwrap();
}

#[tokio::test]
async fn test_get_system_connections() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "protocol": "tcp",
            "localAddr": "127.0.0.1:54321",
            "remoteAddr": "142.250.1.1:443",
            "state": "ESTABLISHED",
            "pid": 4321,
            "processName": "browser",
        },
        {
            "protocol": "udp",
            "localAddr": "127.0.0.1:5353",
            "remoteAddr": "1.1.1.1:53",
        },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v1/system/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let conns = client.get_system_connections().await.unwrap();
    assert_eq!(conns.len(), 2);
    assert_eq!(conns[0].process_name.as_deref(), Some("browser"));
    assert!(conns[1].pid.is_none());
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_hit_deadline_surfaces_as_timeout() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_millis(200),
    };
    let client = BackendClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = client.get_stats().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_structured_error_body_is_parsed() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/rules/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "rule not found",
            "code": "rules.not_found",
        })))
        .mount(&server)
        .await;

    let err = client.delete_rule("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.api_error_code(), Some("rules.not_found"));
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "rule not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_error_body_is_preserved() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine unavailable"))
        .mount(&server)
        .await;

    let err = client.get_stats().await.unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Api { status, message, code } => {
            assert_eq!(status, 500);
            assert_eq!(message, "engine unavailable");
            assert!(code.is_none());
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_stats().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}
