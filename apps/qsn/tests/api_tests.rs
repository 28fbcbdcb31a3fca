//! Integration tests for the QSN HTTP API.
//!
//! Each test builds its own router, so rate limiter state never leaks
//! between tests. Free-tier servers allow a burst of 10 requests.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use qsn::api::{AppState, router};
use qsn_core::SecurityTier;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn server(tier: SecurityTier) -> TestServer {
    TestServer::new(router(Arc::new(AppState::new(tier)))).unwrap()
}

// =============================================================================
// HEALTH + CATALOG
// =============================================================================

#[tokio::test]
async fn test_health_reports_selected_level() {
    let server = server(SecurityTier::Government);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["level"], 100);
}

#[tokio::test]
async fn test_list_tiers() {
    let server = server(SecurityTier::Free);
    let body = server.get("/tiers").await.json::<Value>();
    let tiers = body.as_array().unwrap();

    let levels: Vec<i64> = tiers.iter().map(|t| t["level"].as_i64().unwrap()).collect();
    assert_eq!(levels, vec![65, 99, 100, 1000]);
    assert_eq!(tiers[3]["encryption"]["bits"], 512);
    assert_eq!(tiers[0]["checkout"]["href"], "/demo");
    assert_eq!(tiers[0]["upgrade_to"], 99);
}

#[tokio::test]
async fn test_get_tier_clamps_undefined_level() {
    let server = server(SecurityTier::Free);

    let body = server.get("/tiers/250").await.json::<Value>();
    assert_eq!(body["level"], 100);
    assert_eq!(body["name"], "Government");

    let body = server.get("/tiers/-1").await.json::<Value>();
    assert_eq!(body["level"], 65);
}

// =============================================================================
// RESOLVER
// =============================================================================

#[tokio::test]
async fn test_resolve_reports_clamping() {
    let server = server(SecurityTier::Free);

    let body = server.get("/resolve/-5").await.json::<Value>();
    assert_eq!(body["requested"], -5);
    assert_eq!(body["tier"], 65);
    assert_eq!(body["clamped"], true);
    assert_eq!(body["features"], json!(["quantumEncryption"]));

    let body = server.get("/resolve/99").await.json::<Value>();
    assert_eq!(body["clamped"], false);
    assert_eq!(
        body["features"],
        json!(["quantumEncryption", "temporalMonitoring"])
    );
}

#[tokio::test]
async fn test_resolve_rejects_non_numeric_level() {
    let server = server(SecurityTier::Free);
    let response = server.get("/resolve/ninety").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compare_table() {
    let server = server(SecurityTier::Free);
    let body = server.get("/compare").await.json::<Value>();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4]["feature"], "consciousnessIntegration");
    assert_eq!(rows[4]["availability"], json!([false, false, false, true]));
}

// =============================================================================
// SELECTION
// =============================================================================

#[tokio::test]
async fn test_select_clamps_and_counts_changes() {
    let server = server(SecurityTier::Free);

    let body = server
        .post("/selection")
        .json(&json!({ "level": 500 }))
        .await
        .json::<Value>();
    assert_eq!(body["level"], 100);
    assert_eq!(body["name"], "Government");
    assert_eq!(body["changes"], 1);

    let body = server.get("/selection").await.json::<Value>();
    assert_eq!(body["level"], 100);
    assert_eq!(body["features"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_select_lower_tier_is_allowed() {
    let server = server(SecurityTier::Developer);
    let body = server
        .post("/selection")
        .json(&json!({ "level": 65 }))
        .await
        .json::<Value>();
    assert_eq!(body["level"], 65);
}

#[tokio::test]
async fn test_upgrade_moves_up() {
    let server = server(SecurityTier::Free);
    let response = server
        .post("/selection/upgrade")
        .json(&json!({ "level": 99 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["level"], 99);
}

#[tokio::test]
async fn test_upgrade_rejects_downgrade() {
    let server = server(SecurityTier::Government);

    let response = server
        .post("/selection/upgrade")
        .json(&json!({ "level": 99 }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert!(response.json::<Value>()["error"].is_string());

    // Selection is unchanged.
    let body = server.get("/selection").await.json::<Value>();
    assert_eq!(body["level"], 100);
    assert_eq!(body["changes"], 0);
}

// =============================================================================
// METRICS + CHECKOUT
// =============================================================================

#[tokio::test]
async fn test_metrics_gated_by_selected_tier() {
    let server = server(SecurityTier::Free);

    let body = server.get("/metrics").await.json::<Value>();
    assert_eq!(body["level"], 65);
    assert!(body["network"].is_object());
    assert!(body["temporal"].is_null());
    assert!(body["strata"].is_null());
    assert!(body["noir"].is_null());
    assert_eq!(body["locked"][0]["panel"], "temporal monitoring");
    assert_eq!(body["locked"][0]["requires_level"], 99);

    server
        .post("/selection")
        .json(&json!({ "level": 1000 }))
        .await
        .assert_status_ok();

    let body = server.get("/metrics").await.json::<Value>();
    assert_eq!(body["level"], 1000);
    assert!(body["network"].is_object());
    assert!(body["temporal"].is_object());
    assert_eq!(body["strata"].as_array().unwrap().len(), 5);
    assert!(body["noir"].is_object());
    assert_eq!(body["locked"], json!([]));
    assert_eq!(body["encryption_bits"], 512);
}

#[tokio::test]
async fn test_checkout_redirects() {
    let server = server(SecurityTier::Developer);

    let response = server.get("/checkout/99").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "https://www.paypal.com/paypalme/qsnsecurity/299"
    );

    let response = server.get("/checkout/65").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/demo");

    let response = server.get("/checkout/1000").await;
    assert_eq!(response.header("location"), "/contact");
}

// =============================================================================
// RATE LIMITING
// =============================================================================

#[tokio::test]
async fn test_free_tier_is_rate_limited() {
    let server = server(SecurityTier::Free);

    let mut limited = None;
    for attempt in 0..20 {
        let response = server.get("/tiers").await;
        if response.status_code() == StatusCode::TOO_MANY_REQUESTS {
            limited = Some((attempt, response.json::<Value>()));
            break;
        }
    }

    let (attempt, body) = limited.unwrap();
    assert!(attempt >= 10);
    assert!(body["error"].as_str().unwrap().contains("rate limit"));
}

#[tokio::test]
async fn test_upgrade_replaces_exhausted_limiter() {
    let server = server(SecurityTier::Free);

    // Spend 9 of the 10-request Free burst; the upgrade itself is the 10th.
    for _ in 0..9 {
        server.get("/tiers").await.assert_status_ok();
    }
    server
        .post("/selection/upgrade")
        .json(&json!({ "level": 1000 }))
        .await
        .assert_status_ok();

    for _ in 0..25 {
        let response = server.get("/tiers").await;
        assert_ne!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }
}

#[tokio::test]
async fn test_select_same_tier_keeps_budget() {
    let server = server(SecurityTier::Free);

    for _ in 0..9 {
        server.get("/tiers").await.assert_status_ok();
    }
    let body = server
        .post("/selection")
        .json(&json!({ "level": 70 }))
        .await
        .json::<Value>();
    assert_eq!(body["level"], 65);
    assert_eq!(body["changes"], 0);

    let mut limited = false;
    for _ in 0..3 {
        if server.get("/tiers").await.status_code() == StatusCode::TOO_MANY_REQUESTS {
            limited = true;
            break;
        }
    }
    assert!(limited, "same-tier selection reset the rate limit");
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let server = server(SecurityTier::Free);
    for _ in 0..20 {
        server.get("/health").await.assert_status_ok();
    }
}
