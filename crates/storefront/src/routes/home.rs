//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::kitchen::{OpeningHour, Profile};
use crate::routes::{NavView, PHOTO_STRIP, layout::GalleryPhoto};
use crate::services::SessionCart;
use crate::state::AppState;

// =============================================================================
// Hero Configuration
// =============================================================================

/// The hero block at the top of the home page.
#[derive(Clone)]
pub struct HeroView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button_text: &'static str,
    pub button_url: &'static str,
    pub image_path: &'static str,
}

impl Default for HeroView {
    fn default() -> Self {
        Self {
            title: "Good food, made fresh every day",
            subtitle: "Browse the menu, fill your cart and we'll have it ready for you.",
            button_text: "See the menu",
            button_url: "/menus",
            image_path: "/static/images/hero.svg",
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Restaurant profile display data.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub logo: String,
    pub about_us: String,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            logo: profile.logo,
            about_us: profile.about_us,
        }
    }
}

/// One row of the opening hours table.
#[derive(Clone)]
pub struct OpeningHourView {
    pub day: String,
    pub opens: String,
    pub closes: String,
}

impl From<&OpeningHour> for OpeningHourView {
    fn from(hour: &OpeningHour) -> Self {
        Self {
            day: hour.day.clone(),
            opens: hour.opens(),
            closes: hour.closes(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub hero: HeroView,
    pub photos: &'static [GalleryPhoto],
    /// `None` when the profile couldn't be loaded.
    pub profile: Option<ProfileView>,
    pub opening_hours: Vec<OpeningHourView>,
    /// Whether the opening hours fetch failed.
    pub hours_unavailable: bool,
}

/// Display the home page.
///
/// Profile and opening hours are fetched concurrently; either may fail
/// without taking the other section down.
#[instrument(skip(state, cart))]
pub async fn home(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    let kitchen = state.kitchen();
    let (profile, hours) = tokio::join!(kitchen.profile(), kitchen.opening_hours());

    let profile = profile.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load profile");
        None
    });
    let nav = NavView::new(&cart, profile.as_ref());

    let (opening_hours, hours_unavailable) = match hours {
        Ok(hours) => (hours.iter().map(OpeningHourView::from).collect(), false),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load opening hours");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        nav,
        hero: HeroView::default(),
        photos: PHOTO_STRIP,
        profile: profile.map(ProfileView::from),
        opening_hours,
        hours_unavailable,
    }
}
