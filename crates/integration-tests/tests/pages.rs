//! End-to-end tests for the read-only pages.

use axum::http::StatusCode;
use yoloverse_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_shows_profile_and_hours() {
    let app = TestApp::spawn().await;

    let (status, html) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Home cooking since 2019."));
    assert!(html.contains("<td>Monday</td><td>08:00</td><td>21:30</td>"));
    assert!(!html.contains("08:00:00"));
}

#[tokio::test]
async fn test_every_page_shows_profile_in_navbar_and_footer() {
    let app = TestApp::spawn().await;

    let paths = [
        "/",
        "/menus",
        "/menus/1",
        "/cart",
        "/faq",
        "/contact",
        "/testimonials",
        "/thank-you",
    ];
    for path in paths {
        let (status, html) = app.get(path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(
            html.contains(r#"<a class="navbar-brand" href="/">Warung Yolo</a>"#),
            "{path}"
        );
        assert!(html.contains("Jl. Braga 12, Bandung"), "{path}");
        assert!(html.contains("+62 22 555 0199"), "{path}");
        assert!(html.contains(r#"href="mailto:halo@warungyolo.test""#), "{path}");
        assert!(html.contains(r#"href="https://facebook.com/warungyolo""#), "{path}");
        assert!(html.contains(">Instagram</a>"), "{path}");
        assert!(!html.contains(">Twitter</a>"), "{path}");
        assert!(
            html.contains(r#"class="footer-logo" src="https://cdn.yoloverse.test/logo.png""#),
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_photo_strip_on_home_and_menu() {
    let app = TestApp::spawn().await;

    for path in ["/", "/menus"] {
        let (_, html) = app.get(path).await;
        assert_eq!(html.matches(r#"class="photo-strip-item""#).count(), 4, "{path}");
        assert!(html.contains("/static/images/gallery/satay.svg"), "{path}");
    }

    let (_, html) = app.get("/faq").await;
    assert!(!html.contains("photo-strip"));

    let (status, _) = app.get("/static/images/gallery/iced-tea.svg").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_menu_lists_categories_in_catalog_order() {
    let app = TestApp::spawn().await;

    let (status, html) = app.get("/menus").await;
    assert_eq!(status, StatusCode::OK);

    let all = html.find(">All</option>").expect("All category");
    let main = html.find(">Main Course</option>").expect("Main Course category");
    let drinks = html.find(">Drinks</option>").expect("Drinks category");
    assert!(all < main && main < drinks);
    assert_eq!(html.matches(">Main Course</option>").count(), 1);

    assert!(html.contains("<h2>Nasi Goreng</h2>"));
    assert!(html.contains("$12.50"));
}

#[tokio::test]
async fn test_menu_filters() {
    let app = TestApp::spawn().await;

    let (_, html) = app.get("/menus?category=Drinks").await;
    assert!(html.contains("<h2>Es Teh Manis</h2>"));
    assert!(!html.contains("<h2>Nasi Goreng</h2>"));

    let (_, html) = app.get("/menus?category=All&search=GORENG").await;
    assert!(html.contains("<h2>Nasi Goreng</h2>"));
    assert!(html.contains("<h2>Mie Goreng</h2>"));
    assert!(!html.contains("<h2>Es Teh Manis</h2>"));

    let (_, html) = app.get("/menus?category=Drinks&search=goreng").await;
    assert!(html.contains("No dishes match your filter"));
}

#[tokio::test]
async fn test_menu_detail() {
    let app = TestApp::spawn().await;

    let (status, html) = app.get("/menus/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Fried rice with egg, chicken and sambal."));

    let (status, _) = app.get("/menus/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_faq_and_testimonials() {
    let app = TestApp::spawn().await;

    let (status, html) = app.get("/faq").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Do you deliver?"));

    let (status, html) = app.get("/testimonials").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("★★★★☆"));
    assert!(html.contains(r#"<p class="testimonial-email">rina@mail.test</p>"#));
    assert!(html.contains(&format!(
        "{}media/testimonials/rina.jpg",
        app.kitchen.base_url().trim_end_matches("api/")
    )));
}

#[tokio::test]
async fn test_security_headers_and_static_assets() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/static/css/main.css"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    assert!(response.headers().contains_key("x-request-id"));
}
