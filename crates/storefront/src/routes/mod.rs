//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero, profile, opening hours)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (kitchen API reachable)
//!
//! # Menu
//! GET  /menus                  - Menu list (?category=&search=&added=)
//! GET  /menus/{id}             - Menu item detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add item, redirect back to the menu
//! POST /cart/update            - Set quantity (min 1), redirect to cart
//! POST /cart/remove            - Remove line, redirect to cart
//! POST /checkout               - Clear cart, redirect to thank-you
//!
//! # Pages
//! GET  /contact                - Contact form
//! POST /contact                - Send contact message (rate limited)
//! GET  /faq                    - Frequently asked questions
//! GET  /testimonials           - Testimonials and submission form
//! POST /testimonials           - Submit testimonial, multipart (rate limited)
//! GET  /thank-you              - Order confirmation
//! ```

pub mod cart;
pub mod contact;
pub mod faq;
pub mod home;
pub mod layout;
pub mod menus;
pub mod pages;
pub mod testimonials;

use std::convert::Infallible;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::form_rate_limiter;
use crate::state::AppState;

pub use layout::{NavView, PHOTO_STRIP};

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menus::index))
        .route("/{id}", get(menus::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
///
/// `config` supplies the trusted proxies for the form rate limiters.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    let proxies = &config.trusted_proxies;

    Router::new()
        // Home page
        .route("/", get(home::home))
        // Menu routes
        .nest("/menus", menu_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        // Form posts are forwarded to the kitchen API
        .route(
            "/contact",
            get(contact::page).merge(
                post(contact::submit).layer::<_, Infallible>(form_rate_limiter(proxies)),
            ),
        )
        .route(
            "/testimonials",
            get(testimonials::index).merge(
                post(testimonials::submit)
                    .layer::<_, Infallible>(form_rate_limiter(proxies))
                    .layer::<_, Infallible>(DefaultBodyLimit::max(testimonials::MAX_UPLOAD_BYTES)),
            ),
        )
        .route("/faq", get(faq::index))
        .route("/thank-you", get(pages::thank_you))
}
