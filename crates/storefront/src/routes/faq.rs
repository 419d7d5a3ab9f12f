//! FAQ route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::kitchen::FaqItem;
use crate::routes::NavView;
use crate::services::SessionCart;
use crate::state::AppState;

/// FAQ page template.
#[derive(Template, WebTemplate)]
#[template(path = "faq.html")]
pub struct FaqTemplate {
    pub nav: NavView,
    pub faqs: Vec<FaqItem>,
    pub unavailable: bool,
}

/// Display the frequently asked questions.
#[instrument(skip(state, cart))]
pub async fn index(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    let (nav, faqs) = tokio::join!(NavView::load(&state, &cart), state.kitchen().faqs());
    let (faqs, unavailable) = match faqs {
        Ok(faqs) => (faqs, false),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load FAQ");
            (Vec::new(), true)
        }
    };

    FaqTemplate {
        nav,
        faqs,
        unavailable,
    }
}
