//! Cache types for kitchen API reads.

use yoloverse_core::CatalogItem;

use super::types::{FaqItem, OpeningHour, Profile, Testimonial};

/// One cache entry per read endpoint.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Profiles,
    Menus,
    OpeningHours,
    Faqs,
    Testimonials,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Profiles(Vec<Profile>),
    Menus(Vec<CatalogItem>),
    OpeningHours(Vec<OpeningHour>),
    Faqs(Vec<FaqItem>),
    Testimonials(Vec<Testimonial>),
}
