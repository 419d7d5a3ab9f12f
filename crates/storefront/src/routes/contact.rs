//! Contact form route handlers.
//!
//! Messages are forwarded to the kitchen API as JSON. The page re-renders
//! in place: a success banner with an empty form, or an error banner with
//! the visitor's input kept.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use yoloverse_core::Email;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::kitchen::ContactMessage;
use crate::routes::NavView;
use crate::services::SessionCart;
use crate::state::AppState;

/// Generic failure message; API details are never shown.
const SEND_FAILED: &str = "Something went wrong sending your message. Please try again.";

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub nav: NavView,
    pub form: ContactForm,
    pub success: bool,
    pub error: Option<String>,
}

/// Display the contact form.
#[instrument(skip(state, cart))]
pub async fn page(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    ContactTemplate {
        nav: NavView::load(&state, &cart).await,
        form: ContactForm::default(),
        success: false,
        error: None,
    }
}

/// Send a contact message.
#[instrument(skip(state, cart, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let nav = NavView::load(&state, &cart).await;

    let message = match validate(&form) {
        Ok(message) => message,
        Err(error) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                ContactTemplate {
                    nav,
                    form,
                    success: false,
                    error: Some(error.to_string()),
                },
            );
        }
    };

    match state.kitchen().submit_contact(&message).await {
        Ok(()) => {
            add_breadcrumb("contact", "Message sent", None);
            tracing::info!(email = %message.email, "Contact message sent");
            (
                StatusCode::OK,
                ContactTemplate {
                    nav,
                    form: ContactForm::default(),
                    success: true,
                    error: None,
                },
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send contact message");
            (
                StatusCode::BAD_GATEWAY,
                ContactTemplate {
                    nav,
                    form,
                    success: false,
                    error: Some(SEND_FAILED.to_string()),
                },
            )
        }
    }
}

/// Light server-side checks on top of the browser's own.
fn validate(form: &ContactForm) -> Result<ContactMessage, &'static str> {
    let name = form.name.trim();
    let text = form.message.trim();
    if name.is_empty() || text.is_empty() {
        return Err("Name and message are required.");
    }

    let email = Email::parse(&form.email).map_err(|_| "Please enter a valid email address.")?;

    Ok(ContactMessage {
        name: name.to_string(),
        email: email.into_inner(),
        phone_number: form.phone_number.trim().to_string(),
        text: text.to_string(),
    })
}
