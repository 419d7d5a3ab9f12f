//! Records exchanged with the kitchen API.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use url::Url;

use yoloverse_core::{FaqId, OpeningHourId, TestimonialId};

/// The restaurant's public profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Absolute URL of the logo.
    pub logo: String,
    pub name: String,
    #[serde(default)]
    pub about_us: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Social account URLs; empty when the kitchen has none.
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
}

/// Opening hours for one day of the week.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHour {
    pub id: OpeningHourId,
    pub day: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl OpeningHour {
    /// Opening time as `HH:MM`.
    #[must_use]
    pub fn opens(&self) -> String {
        self.opening_time.format("%H:%M").to_string()
    }

    /// Closing time as `HH:MM`.
    #[must_use]
    pub fn closes(&self) -> String {
        self.closing_time.format("%H:%M").to_string()
    }
}

/// A frequently asked question.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqItem {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
}

/// A published customer testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub rating: u8,
    pub text: String,
    /// Image path, usually relative to the API host (e.g. `/media/a.jpg`).
    #[serde(default)]
    pub image: Option<String>,
}

impl Testimonial {
    /// Resolve the image path against the API origin.
    ///
    /// Absolute URLs are returned as-is; empty paths yield `None`.
    #[must_use]
    pub fn image_url(&self, api_base: &Url) -> Option<String> {
        let path = self.image.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        api_base.join(path).ok().map(String::from)
    }
}

/// A message from the contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    /// Sent as an empty string when the visitor leaves it blank.
    pub phone_number: String,
    pub text: String,
}

/// An uploaded testimonial photo.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A testimonial submitted through the site.
#[derive(Debug, Clone)]
pub struct NewTestimonial {
    pub name: String,
    pub email: String,
    /// Always within `1..=5`.
    pub rating: u8,
    pub text: String,
    pub image: Option<ImageUpload>,
}

/// Clamp a submitted rating into `1..=5`.
#[must_use]
pub fn clamp_rating(rating: i64) -> u8 {
    u8::try_from(rating.clamp(1, 5)).unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_hour_trims_seconds() {
        let hour: OpeningHour = serde_json::from_str(
            r#"{"id":1,"day":"Senin","opening_time":"08:00:00","closing_time":"21:30:00"}"#,
        )
        .unwrap();
        assert_eq!(hour.opens(), "08:00");
        assert_eq!(hour.closes(), "21:30");
    }

    #[test]
    fn test_testimonial_image_url() {
        let base = Url::parse("https://api.test/api/").unwrap();
        let mut testimonial: Testimonial = serde_json::from_str(
            r#"{"id":3,"name":"Rina","email":"rina@mail.test","rating":5,"text":"Enak!","image":"/media/rina.jpg"}"#,
        )
        .unwrap();
        assert_eq!(
            testimonial.image_url(&base).as_deref(),
            Some("https://api.test/media/rina.jpg")
        );

        testimonial.image = Some("https://cdn.test/x.png".to_string());
        assert_eq!(
            testimonial.image_url(&base).as_deref(),
            Some("https://cdn.test/x.png")
        );

        testimonial.image = None;
        assert!(testimonial.image_url(&base).is_none());
    }

    #[test]
    fn test_testimonial_without_image_field() {
        let testimonial: Testimonial =
            serde_json::from_str(r#"{"id":1,"name":"A","rating":4,"text":"ok","image":null}"#)
                .unwrap();
        assert!(testimonial.image.is_none());
        assert!(testimonial.email.is_empty());
    }

    #[test]
    fn test_profile_contact_fields_are_optional() {
        let bare: Profile =
            serde_json::from_str(r#"{"logo":"https://cdn.test/l.png","name":"Yolo"}"#).unwrap();
        assert!(bare.address.is_empty());
        assert!(bare.twitter.is_empty());

        let full: Profile = serde_json::from_str(
            r#"{"logo":"l","name":"Yolo","address":"Jl. Braga 1","phone":"0812","email":"hi@yolo.test","facebook":"https://fb.test/yolo","instagram":"https://ig.test/yolo","twitter":"https://x.test/yolo"}"#,
        )
        .unwrap();
        assert_eq!(full.address, "Jl. Braga 1");
        assert_eq!(full.instagram, "https://ig.test/yolo");
    }

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating(0), 1);
        assert_eq!(clamp_rating(3), 3);
        assert_eq!(clamp_rating(99), 5);
        assert_eq!(clamp_rating(i64::MIN), 1);
    }
}
