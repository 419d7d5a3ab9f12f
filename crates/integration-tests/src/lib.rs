//! Integration test harness for the Yoloverse storefront.
//!
//! Every test gets its own pair of servers on ephemeral ports:
//!
//! - a [`FakeKitchen`] standing in for the kitchen API, serving a small
//!   fixed menu and recording everything posted to it
//! - the real storefront router, pointed at the fake
//!
//! A `reqwest` client with a cookie store plays the visitor, so the
//! session (and with it the cart) survives across requests.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let (status, html) = app.get("/menus").await;
//! assert_eq!(status, 200);
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Request, State},
    http::StatusCode,
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use yoloverse_storefront::{
    app,
    config::{KitchenApiConfig, StorefrontConfig},
    state::AppState,
};

// =============================================================================
// Fake Kitchen API
// =============================================================================

/// A testimonial as received by the fake API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceivedTestimonial {
    pub name: String,
    pub email: String,
    pub rating: String,
    pub text: String,
    pub image_name: Option<String>,
    pub image_type: Option<String>,
    pub image_len: usize,
}

#[derive(Default)]
struct KitchenState {
    failing: AtomicBool,
    next_id: AtomicI64,
    contacts: Mutex<Vec<Value>>,
    testimonials: Mutex<Vec<ReceivedTestimonial>>,
}

/// In-process stand-in for the kitchen API.
#[derive(Clone)]
pub struct FakeKitchen {
    addr: SocketAddr,
    state: Arc<KitchenState>,
}

impl FakeKitchen {
    /// Start the fake API on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener can't be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(KitchenState {
            next_id: AtomicI64::new(100),
            ..KitchenState::default()
        });

        let api = Router::new()
            .route("/api/profile/", get(profile))
            .route("/api/menus/", get(menus))
            .route("/api/opening-hour/", get(opening_hours))
            .route("/api/faq/", get(faqs))
            .route(
                "/api/contact/testimonials/",
                get(testimonials).post(create_testimonial),
            )
            .route("/api/contact/", axum::routing::post(create_contact))
            .layer(from_fn_with_state(state.clone(), fail_when_down))
            .with_state(state.clone());

        let addr = serve(api).await;
        Self { addr, state }
    }

    /// API base URL, with the `/api/` prefix the real service uses.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Make every endpoint answer 500 (or recover with `false`).
    pub fn set_down(&self, down: bool) {
        self.state.failing.store(down, Ordering::SeqCst);
    }

    /// Contact messages received so far, as posted JSON.
    pub async fn contacts(&self) -> Vec<Value> {
        self.state.contacts.lock().await.clone()
    }

    /// Testimonials received so far.
    pub async fn received_testimonials(&self) -> Vec<ReceivedTestimonial> {
        self.state.testimonials.lock().await.clone()
    }
}

async fn fail_when_down(
    State(state): State<Arc<KitchenState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "kitchen is down").into_response();
    }
    next.run(request).await
}

async fn profile() -> Json<Value> {
    Json(json!([{
        "logo": "https://cdn.yoloverse.test/logo.png",
        "name": "Warung Yolo",
        "about_us": "Home cooking since 2019.",
        "address": "Jl. Braga 12, Bandung",
        "phone": "+62 22 555 0199",
        "email": "halo@warungyolo.test",
        "facebook": "https://facebook.com/warungyolo",
        "instagram": "https://instagram.com/warungyolo",
        "twitter": ""
    }]))
}

async fn menus() -> Json<Value> {
    Json(json!([
        {
            "id": 1,
            "name": "Nasi Goreng",
            "price": "12.50",
            "image": "https://cdn.yoloverse.test/nasi-goreng.jpg",
            "category": "Main Course",
            "description": "Fried rice with egg, chicken and sambal."
        },
        {
            "id": 2,
            "name": "Es Teh Manis",
            "price": "3.00",
            "image": "https://cdn.yoloverse.test/es-teh.jpg",
            "category": "Drinks",
            "description": "Sweet iced tea."
        },
        {
            "id": 3,
            "name": "Mie Goreng",
            "price": 10,
            "image": "https://cdn.yoloverse.test/mie-goreng.jpg",
            "category": "Main Course",
            "description": "Fried noodles."
        }
    ]))
}

async fn opening_hours() -> Json<Value> {
    Json(json!([
        {"id": 1, "day": "Monday", "opening_time": "08:00:00", "closing_time": "21:30:00"},
        {"id": 2, "day": "Saturday", "opening_time": "10:00:00", "closing_time": "23:00:00"}
    ]))
}

async fn faqs() -> Json<Value> {
    Json(json!([
        {"id": 1, "question": "Do you deliver?", "answer": "Pick-up only for now."}
    ]))
}

async fn testimonials(State(state): State<Arc<KitchenState>>) -> Json<Value> {
    let mut list = vec![json!({
        "id": 1,
        "name": "Rina",
        "email": "rina@mail.test",
        "rating": 4,
        "text": "Sambalnya juara!",
        "image": "/media/testimonials/rina.jpg"
    })];

    for (offset, t) in (0_i64..).zip(state.testimonials.lock().await.iter()) {
        list.push(json!({
            "id": 1000 + offset,
            "name": t.name,
            "email": t.email,
            "rating": t.rating.parse::<i64>().unwrap_or(0),
            "text": t.text,
            "image": t.image_name.as_ref().map(|n| format!("/media/testimonials/{n}")),
        }));
    }

    Json(Value::Array(list))
}

async fn create_contact(
    State(state): State<Arc<KitchenState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.contacts.lock().await.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn create_testimonial(
    State(state): State<Arc<KitchenState>>,
    mut multipart: Multipart,
) -> Response {
    let mut received = ReceivedTestimonial::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            received.image_name = field.file_name().map(str::to_string);
            received.image_type = field.content_type().map(str::to_string);
            received.image_len = field.bytes().await.map_or(0, |b| b.len());
            continue;
        }

        let text = field.text().await.unwrap_or_default();
        match name.as_str() {
            "name" => received.name = text,
            "email" => received.email = text,
            "rating" => received.rating = text,
            "text" => received.text = text,
            _ => {}
        }
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let body = json!({
        "id": id,
        "name": received.name,
        "email": received.email,
        "rating": received.rating.parse::<i64>().unwrap_or(0),
        "text": received.text,
        "image": received.image_name.as_ref().map(|n| format!("/media/testimonials/{n}")),
    });

    state.testimonials.lock().await.push(received);
    (StatusCode::CREATED, Json(body)).into_response()
}

// =============================================================================
// Storefront
// =============================================================================

/// A running storefront wired to its own fake kitchen API.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub kitchen: FakeKitchen,
}

impl TestApp {
    /// Start a storefront with the default cache TTL.
    pub async fn spawn() -> Self {
        Self::spawn_with_cache_ttl(Duration::from_secs(300)).await
    }

    /// Start a storefront whose API cache expires after `cache_ttl`.
    pub async fn spawn_with_cache_ttl(cache_ttl: Duration) -> Self {
        Self::spawn_with(cache_ttl, Vec::new()).await
    }

    /// Start a storefront that treats the loopback client as its reverse
    /// proxy, so `X-Forwarded-For` decides the rate limit key.
    pub async fn spawn_behind_proxy() -> Self {
        Self::spawn_with(Duration::from_secs(300), vec![IpAddr::from([127, 0, 0, 1])]).await
    }

    /// Start a storefront with the given cache TTL and trusted proxies.
    ///
    /// # Panics
    ///
    /// Panics if a server can't be started.
    pub async fn spawn_with(cache_ttl: Duration, trusted_proxies: Vec<IpAddr>) -> Self {
        let kitchen = FakeKitchen::spawn().await;

        let mut kitchen_config =
            KitchenApiConfig::new(&kitchen.base_url()).expect("fake API URL is valid");
        kitchen_config.timeout = Duration::from_secs(5);
        kitchen_config.cache_ttl = cache_ttl;

        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            trusted_proxies,
            kitchen: kitchen_config,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("Failed to build app state");
        let addr = serve(app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            kitchen,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page, returning status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        read(response).await
    }

    /// POST an urlencoded form, following the redirect if there is one.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed");
        read(response).await
    }

    /// POST an urlencoded form claiming to come from `forwarded_for`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form_forwarded(
        &self,
        path: &str,
        forwarded_for: &str,
        form: &[(&str, &str)],
    ) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .header("x-forwarded-for", forwarded_for)
            .form(form)
            .send()
            .await
            .expect("POST request failed");
        read(response).await
    }

    /// Add a menu item to the cart.
    pub async fn add_to_cart(&self, menu_id: i64) -> (StatusCode, String) {
        self.post_form("/cart/add", &[("menu_id", &menu_id.to_string())])
            .await
    }
}

/// Cart count shown in the navbar badge of a rendered page.
#[must_use]
pub fn cart_count(html: &str) -> Option<u32> {
    let marker = "data-cart-count=\"";
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end)?.parse().ok()
}

async fn read(response: reqwest::Response) -> (StatusCode, String) {
    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

/// Serve `router` on an ephemeral local port with peer addresses available.
async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("test server failed");
    });

    addr
}
