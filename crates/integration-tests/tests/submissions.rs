//! End-to-end tests for the contact and testimonial forms.

use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use yoloverse_integration_tests::TestApp;

#[tokio::test]
async fn test_contact_message_reaches_api() {
    let app = TestApp::spawn().await;

    let (status, html) = app
        .post_form(
            "/contact",
            &[
                ("name", "Budi"),
                ("email", "Budi@Mail.test"),
                ("phone_number", ""),
                ("message", "Do you cater weddings?"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Your message has been sent"));
    assert!(!html.contains("Do you cater weddings?"));

    let contacts = app.kitchen.contacts().await;
    assert_eq!(contacts.len(), 1);
    let contact = contacts.first().expect("one contact");
    assert_eq!(contact["email"], "Budi@mail.test");
    assert_eq!(contact["phone_number"], "");
    assert_eq!(contact["text"], "Do you cater weddings?");
}

#[tokio::test]
async fn test_contact_failure_keeps_input() {
    let app = TestApp::spawn().await;
    app.kitchen.set_down(true);

    let (status, html) = app
        .post_form(
            "/contact",
            &[
                ("name", "Budi"),
                ("email", "budi@mail.test"),
                ("message", "Are you open on holidays?"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("Something went wrong"));
    assert!(html.contains("Are you open on holidays?"));
    assert!(!html.contains("kitchen is down"));
}

#[tokio::test]
async fn test_contact_rejects_invalid_email() {
    let app = TestApp::spawn().await;

    let (status, html) = app
        .post_form(
            "/contact",
            &[("name", "Budi"), ("email", "budi"), ("message", "Hi")],
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("valid email"));
    assert!(app.kitchen.contacts().await.is_empty());
}

#[tokio::test]
async fn test_testimonial_with_image_is_listed() {
    let app = TestApp::spawn().await;

    let image = Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("sari.png")
        .mime_str("image/png")
        .expect("mime");
    let form = Form::new()
        .text("name", "Sari")
        .text("email", "sari@mail.test")
        .text("rating", "9")
        .text("text", "Best rendang in town")
        .part("image", image);

    let response = app
        .client
        .post(app.url("/testimonials"))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.expect("body");

    assert!(html.contains("Thank you for your testimonial"));
    assert!(html.contains("Best rendang in town"));
    assert!(html.contains("★★★★★"));

    let received = app.kitchen.received_testimonials().await;
    let sent = received.first().expect("one testimonial");
    assert_eq!(sent.rating, "5");
    assert_eq!(sent.image_name.as_deref(), Some("sari.png"));
    assert_eq!(sent.image_type.as_deref(), Some("image/png"));
    assert_eq!(sent.image_len, 4);
}

#[tokio::test]
async fn test_testimonial_without_image() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("name", "Tono")
        .text("email", "tono@mail.test")
        .text("rating", "0")
        .text("text", "Porsinya besar")
        .part(
            "image",
            Part::bytes(Vec::new())
                .file_name("")
                .mime_str("application/octet-stream")
                .expect("mime"),
        );

    let response = app
        .client
        .post(app.url("/testimonials"))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let received = app.kitchen.received_testimonials().await;
    let sent = received.first().expect("one testimonial");
    assert_eq!(sent.rating, "1");
    assert!(sent.image_name.is_none());
}
