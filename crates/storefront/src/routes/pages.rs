//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::NavView;
use crate::services::SessionCart;
use crate::state::AppState;

/// Thank-you page template.
#[derive(Template, WebTemplate)]
#[template(path = "thank_you.html")]
pub struct ThankYouTemplate {
    pub nav: NavView,
}

/// Display the order confirmation.
#[instrument(skip(state, cart))]
pub async fn thank_you(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    ThankYouTemplate {
        nav: NavView::load(&state, &cart).await,
    }
}
