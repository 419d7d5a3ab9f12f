//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Highest rating a testimonial can carry.
const MAX_STARS: usize = 5;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating as five stars, filled up to the rating.
///
/// Usage in templates: `{{ testimonial.rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let filled = rating.to_string().trim().parse::<usize>().unwrap_or(0);
    Ok(render_stars(filled))
}

fn render_stars(filled: usize) -> String {
    let filled = filled.min(MAX_STARS);
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_STARS - filled));
    out
}
