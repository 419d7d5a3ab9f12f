//! Testimonial route handlers.
//!
//! Submissions arrive as multipart form data with an optional photo and are
//! forwarded to the kitchen API as multipart as well.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use yoloverse_core::Email;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::kitchen::{ImageUpload, NewTestimonial, Testimonial, types::clamp_rating};
use crate::routes::NavView;
use crate::services::SessionCart;
use crate::state::AppState;

/// Largest accepted testimonial request, photo included.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const SEND_FAILED: &str = "Something went wrong sending your testimonial. Please try again.";

/// Testimonial display data for templates.
#[derive(Clone)]
pub struct TestimonialView {
    pub name: String,
    pub email: String,
    pub rating: u8,
    pub text: String,
    pub image_url: Option<String>,
}

impl TestimonialView {
    fn new(testimonial: &Testimonial, api_base: &Url) -> Self {
        Self {
            name: testimonial.name.clone(),
            email: testimonial.email.clone(),
            rating: testimonial.rating,
            text: testimonial.text.clone(),
            image_url: testimonial.image_url(api_base),
        }
    }
}

/// Text fields of the submission form, kept for re-rendering.
#[derive(Debug, Clone, Default)]
pub struct TestimonialForm {
    pub name: String,
    pub email: String,
    pub rating: String,
    pub text: String,
}

/// Query parameters for the testimonial page.
#[derive(Debug, Default, Deserialize)]
pub struct TestimonialQuery {
    #[serde(default)]
    pub submitted: bool,
}

/// Testimonial page template.
#[derive(Template, WebTemplate)]
#[template(path = "testimonials.html")]
pub struct TestimonialsTemplate {
    pub nav: NavView,
    pub testimonials: Vec<TestimonialView>,
    pub unavailable: bool,
    pub form: TestimonialForm,
    pub success: bool,
    pub error: Option<String>,
}

/// Display testimonials and the submission form.
#[instrument(skip(state, cart))]
pub async fn index(
    State(state): State<AppState>,
    cart: SessionCart,
    Query(query): Query<TestimonialQuery>,
) -> impl IntoResponse {
    render(&state, &cart, TestimonialForm::default(), query.submitted, None).await
}

/// Submit a testimonial.
///
/// Redirects back to the list on success; re-renders the form with the
/// visitor's input on failure.
#[instrument(skip(state, cart, multipart))]
pub async fn submit(
    State(state): State<AppState>,
    cart: SessionCart,
    multipart: Multipart,
) -> Response {
    let (form, image) = match read_multipart(multipart).await {
        Ok(parts) => parts,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed testimonial upload");
            let page = render(
                &state,
                &cart,
                TestimonialForm::default(),
                false,
                Some("Your upload could not be read. Please try again.".to_string()),
            )
            .await;
            return (StatusCode::BAD_REQUEST, page).into_response();
        }
    };

    let testimonial = match validate(&form, image) {
        Ok(testimonial) => testimonial,
        Err(error) => {
            let page = render(&state, &cart, form, false, Some(error.to_string())).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.kitchen().submit_testimonial(testimonial).await {
        Ok(created) => {
            add_breadcrumb("testimonials", "Testimonial submitted", None);
            tracing::info!(id = %created.id, rating = created.rating, "Testimonial submitted");
            Redirect::to("/testimonials?submitted=true").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit testimonial");
            let page = render(&state, &cart, form, false, Some(SEND_FAILED.to_string())).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

async fn render(
    state: &AppState,
    cart: &SessionCart,
    form: TestimonialForm,
    success: bool,
    error: Option<String>,
) -> TestimonialsTemplate {
    let kitchen = state.kitchen();
    let (nav, testimonials) = tokio::join!(NavView::load(state, cart), kitchen.testimonials());
    let (testimonials, unavailable) = match testimonials {
        Ok(list) => (
            list.iter()
                .map(|t| TestimonialView::new(t, kitchen.base_url()))
                .collect(),
            false,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load testimonials");
            (Vec::new(), true)
        }
    };

    TestimonialsTemplate {
        nav,
        testimonials,
        unavailable,
        form,
        success,
        error,
    }
}

/// Collect text fields and the optional photo.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(TestimonialForm, Option<ImageUpload>), MultipartError> {
    let mut form = TestimonialForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "name" => form.name = field.text().await?,
            "email" => form.email = field.text().await?,
            "rating" => form.rating = field.text().await?,
            "text" => form.text = field.text().await?,
            _ => {}
        }
    }

    Ok((form, image))
}

fn validate(
    form: &TestimonialForm,
    image: Option<ImageUpload>,
) -> Result<NewTestimonial, &'static str> {
    let name = form.name.trim();
    let text = form.text.trim();
    if name.is_empty() || text.is_empty() {
        return Err("Name and testimonial are required.");
    }

    let email = Email::parse(&form.email).map_err(|_| "Please enter a valid email address.")?;

    let rating = form
        .rating
        .trim()
        .parse::<i64>()
        .map_err(|_| "Please choose a rating.")?;

    if image
        .as_ref()
        .is_some_and(|img| !img.content_type.starts_with("image/"))
    {
        return Err("The photo must be an image file.");
    }

    Ok(NewTestimonial {
        name: name.to_string(),
        email: email.into_inner(),
        rating: clamp_rating(rating),
        text: text.to_string(),
        image,
    })
}
