//! Data shared by every page: the navbar, the footer and the photo strip.

use crate::kitchen::Profile;
use crate::services::SessionCart;
use crate::state::AppState;

/// Brand shown when the profile hasn't loaded.
pub const DEFAULT_SITE_NAME: &str = "Yoloverse Kitchen";

/// A photo in the strip on the home and menu pages.
#[derive(Clone, Copy, Debug)]
pub struct GalleryPhoto {
    pub src: &'static str,
    pub alt: &'static str,
}

/// Photos shown in the strip, in order.
pub const PHOTO_STRIP: &[GalleryPhoto] = &[
    GalleryPhoto {
        src: "/static/images/gallery/rice-bowl.svg",
        alt: "A bowl of fried rice",
    },
    GalleryPhoto {
        src: "/static/images/gallery/noodles.svg",
        alt: "Fried noodles with vegetables",
    },
    GalleryPhoto {
        src: "/static/images/gallery/satay.svg",
        alt: "Satay skewers on the grill",
    },
    GalleryPhoto {
        src: "/static/images/gallery/iced-tea.svg",
        alt: "A glass of sweet iced tea",
    },
];

/// A link to one of the restaurant's social accounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub url: String,
}

/// Restaurant identity for the navbar brand and the footer.
///
/// Empty profile fields are `None` so the footer can skip them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteView {
    pub name: String,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_links: Vec<SocialLink>,
}

impl Default for SiteView {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            logo: None,
            address: None,
            phone: None,
            email: None,
            social_links: Vec::new(),
        }
    }
}

impl From<&Profile> for SiteView {
    fn from(profile: &Profile) -> Self {
        let social_links = [
            ("Facebook", &profile.facebook),
            ("Instagram", &profile.instagram),
            ("Twitter", &profile.twitter),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            web_link(url).map(|url| SocialLink { label, url })
        })
        .collect();

        Self {
            name: non_empty(&profile.name).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            logo: non_empty(&profile.logo),
            address: non_empty(&profile.address),
            phone: non_empty(&profile.phone),
            email: non_empty(&profile.email),
            social_links,
        }
    }
}

/// Navbar and footer data shared by every page.
#[derive(Clone, Debug, Default)]
pub struct NavView {
    /// Items in the visitor's cart; `None` when the cart couldn't be read.
    pub cart_count: Option<u32>,
    pub site: SiteView,
}

impl NavView {
    /// Layout data from an already fetched profile.
    #[must_use]
    pub fn new(cart: &SessionCart, profile: Option<&Profile>) -> Self {
        Self {
            cart_count: Some(cart.item_count()),
            site: profile.map(SiteView::from).unwrap_or_default(),
        }
    }

    /// Layout data with the profile read through the API cache.
    ///
    /// Falls back to the default brand when the profile is unavailable.
    pub async fn load(state: &AppState, cart: &SessionCart) -> Self {
        let profile = match state.kitchen().profile().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!(error = %e, "Profile unavailable for page layout");
                None
            }
        };
        Self::new(cart, profile.as_ref())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Only absolute http(s) URLs become links.
fn web_link(value: &str) -> Option<String> {
    let url = url::Url::parse(value.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
