//! Kitchen API client.
//!
//! # Architecture
//!
//! - The kitchen API is the source of truth for the catalog, profile, opening
//!   hours, FAQ and testimonials. Nothing is stored locally.
//! - Reads are cached in two `moka` caches: a fresh cache with the configured
//!   TTL, and a bounded stale cache without TTL holding the last good value
//!   per endpoint. When a read fails, the stale value is served instead.
//! - Writes (contact messages, testimonials) go straight through.
//!
//! # Example
//!
//! ```rust,ignore
//! use yoloverse_storefront::kitchen::KitchenClient;
//!
//! let client = KitchenClient::new(&config.kitchen)?;
//! let menus = client.menus().await?;
//! let profile = client.profile().await?;
//! ```

mod cache;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use yoloverse_core::{CatalogItem, MenuId, catalog};

use crate::config::KitchenApiConfig;
use cache::{CacheKey, CacheValue};
pub use types::{
    ContactMessage, FaqItem, ImageUpload, NewTestimonial, OpeningHour, Profile, Testimonial,
};

/// Longest slice of a response body kept for logs and errors.
const MAX_LOGGED_BODY: usize = 300;

/// Errors that can occur when talking to the kitchen API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Client for the kitchen API.
///
/// Cheap to clone; clones share the HTTP connection pool and caches.
#[derive(Clone)]
pub struct KitchenClient {
    inner: Arc<KitchenClientInner>,
}

struct KitchenClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    fresh: Cache<CacheKey, CacheValue>,
    stale: Cache<CacheKey, CacheValue>,
}

impl KitchenClient {
    /// Create a new kitchen API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &KitchenApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("yoloverse-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let fresh = Cache::builder()
            .max_capacity(32)
            .time_to_live(config.cache_ttl)
            .build();
        let stale = Cache::builder().max_capacity(32).build();

        Ok(Self {
            inner: Arc::new(KitchenClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                fresh,
                stale,
            }),
        })
    }

    /// The API base URL, used to resolve relative media paths.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the restaurant profile (the first record the API returns).
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and no stale copy exists.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Option<Profile>, ApiError> {
        let profiles = self
            .read_cached(CacheKey::Profiles, "profile/", CacheValue::Profiles, |v| match v {
                CacheValue::Profiles(p) => Some(p),
                _ => None,
            })
            .await?;
        Ok(profiles.into_iter().next())
    }

    /// Get the full menu.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and no stale copy exists.
    #[instrument(skip(self))]
    pub async fn menus(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.read_cached(CacheKey::Menus, "menus/", CacheValue::Menus, |v| match v {
            CacheValue::Menus(m) => Some(m),
            _ => None,
        })
        .await
    }

    /// Get one menu item by id.
    ///
    /// The API has no per-item endpoint, so this looks the id up in the
    /// (cached) full menu.
    ///
    /// # Errors
    ///
    /// Returns error if the menu can't be fetched.
    #[instrument(skip(self))]
    pub async fn menu(&self, id: MenuId) -> Result<Option<CatalogItem>, ApiError> {
        let menus = self.menus().await?;
        Ok(catalog::find(&menus, id).cloned())
    }

    /// Get the weekly opening hours.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and no stale copy exists.
    #[instrument(skip(self))]
    pub async fn opening_hours(&self) -> Result<Vec<OpeningHour>, ApiError> {
        self.read_cached(
            CacheKey::OpeningHours,
            "opening-hour/",
            CacheValue::OpeningHours,
            |v| match v {
                CacheValue::OpeningHours(h) => Some(h),
                _ => None,
            },
        )
        .await
    }

    /// Get the FAQ entries.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and no stale copy exists.
    #[instrument(skip(self))]
    pub async fn faqs(&self) -> Result<Vec<FaqItem>, ApiError> {
        self.read_cached(CacheKey::Faqs, "faq/", CacheValue::Faqs, |v| match v {
            CacheValue::Faqs(f) => Some(f),
            _ => None,
        })
        .await
    }

    /// Get the published testimonials.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and no stale copy exists.
    #[instrument(skip(self))]
    pub async fn testimonials(&self) -> Result<Vec<Testimonial>, ApiError> {
        self.read_cached(
            CacheKey::Testimonials,
            "contact/testimonials/",
            CacheValue::Testimonials,
            |v| match v {
                CacheValue::Testimonials(t) => Some(t),
                _ => None,
            },
        )
        .await
    }

    /// Check that the API answers at all.
    ///
    /// Bypasses the caches.
    ///
    /// # Errors
    ///
    /// Returns error if the profile endpoint is unreachable or not successful.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.endpoint("profile/")?;
        let response = self.authorized(self.inner.client.get(url)).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Submit a contact message as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the message.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        let url = self.endpoint("contact/")?;
        let response = self
            .authorized(self.inner.client.post(url))
            .json(message)
            .send()
            .await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    /// Submit a testimonial as multipart form data.
    ///
    /// Returns the testimonial as stored by the API and drops the cached
    /// testimonial list so the next read includes it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the testimonial.
    #[instrument(skip(self, testimonial), fields(email = %testimonial.email, rating = testimonial.rating))]
    pub async fn submit_testimonial(
        &self,
        testimonial: NewTestimonial,
    ) -> Result<Testimonial, ApiError> {
        let mut form = Form::new()
            .text("name", testimonial.name)
            .text("email", testimonial.email)
            .text("rating", testimonial.rating.to_string())
            .text("text", testimonial.text);

        if let Some(image) = testimonial.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        let url = self.endpoint("contact/testimonials/")?;
        let response = self
            .authorized(self.inner.client.post(url))
            .multipart(form)
            .send()
            .await?;
        let body = Self::ensure_success(response).await?;

        self.inner.fresh.invalidate(&CacheKey::Testimonials).await;

        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Serve from the fresh cache, else fetch, else fall back to stale data.
    async fn read_cached<T>(
        &self,
        key: CacheKey,
        path: &str,
        wrap: fn(T) -> CacheValue,
        unwrap: fn(CacheValue) -> Option<T>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Clone,
    {
        if let Some(value) = self.inner.fresh.get(&key).await.and_then(unwrap) {
            debug!(?key, "Cache hit");
            return Ok(value);
        }

        match self.get_json::<T>(path).await {
            Ok(value) => {
                self.inner.fresh.insert(key, wrap(value.clone())).await;
                self.inner.stale.insert(key, wrap(value.clone())).await;
                Ok(value)
            }
            Err(e) => match self.inner.stale.get(&key).await.and_then(unwrap) {
                Some(value) => {
                    warn!(?key, error = %e, "Kitchen API read failed, serving stale data");
                    Ok(value)
                }
                None => Err(e),
            },
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.authorized(self.inner.client.get(url)).send().await?;
        let body = Self::ensure_success(response).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %truncate(&body),
                "Failed to parse kitchen API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Turn non-success statuses into errors; return the body otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Kitchen API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(body)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_LOGGED_BODY).collect()
}
