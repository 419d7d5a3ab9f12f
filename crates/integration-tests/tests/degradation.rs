//! End-to-end tests for kitchen API outages.

use std::time::Duration;

use axum::http::StatusCode;
use yoloverse_integration_tests::{TestApp, cart_count};

#[tokio::test]
async fn test_pages_render_while_api_is_down() {
    let app = TestApp::spawn().await;
    app.kitchen.set_down(true);

    let (status, html) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Opening hours are not available right now"));
    assert!(html.contains("Our story is on its way"));
    assert!(html.contains(r#"<a class="navbar-brand" href="/">Yoloverse Kitchen</a>"#));
    assert!(!html.contains("footer-logo"));
    assert!(!html.contains("mailto:"));

    let (status, html) = app.get("/menus").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("The menu is not available right now"));

    let (status, _) = app.get("/faq").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/testimonials").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cart_survives_api_outage() {
    let app = TestApp::spawn_with_cache_ttl(Duration::from_millis(1)).await;

    app.add_to_cart(1).await;
    app.kitchen.set_down(true);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, html) = app.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart_count(&html), Some(1));
    assert!(html.contains("$12.50"));
}

#[tokio::test]
async fn test_stale_menu_served_when_api_fails() {
    let app = TestApp::spawn_with_cache_ttl(Duration::from_millis(1)).await;

    let (_, html) = app.get("/menus").await;
    assert!(html.contains("<h2>Nasi Goreng</h2>"));

    app.kitchen.set_down(true);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, html) = app.get("/menus").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h2>Nasi Goreng</h2>"));
    assert!(!html.contains("The menu is not available right now"));
}
