//! Integration tests for the public storefront pages.
//!
//! These tests require the storefront running (cargo run -p
//! copperleaf-storefront) with `COMMERCE_API_BASE_URL` pointing at a
//! reachable commerce API.

use reqwest::StatusCode;

use copperleaf_integration_tests::{client, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn health_endpoint_responds() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn home_page_renders_or_degrades() {
    let resp = client()
        .get(storefront_base_url())
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    // Either the category grid or the inline error panel; never a blank page.
    assert!(body.contains("Copperleaf Market"));
    assert!(body.contains("category") || body.contains("Try again"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn responses_carry_request_id_and_security_headers() {
    let resp = client()
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(
        resp.headers()
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn orders_page_requires_sign_in() {
    let resp = client()
        .get(format!("{}/orders", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    // The redirect lands on the login page with a notice.
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().starts_with("/auth/login"));
}
