//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation is a plain form
//! post that redirects, so the navbar count is always rendered server-side.

use askama::Template;
use askama_web::WebTemplate;
use std::num::IntErrorKind;

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;
use url::form_urlencoded;

use yoloverse_core::{CartLine, MenuId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::NavView;
use crate::services::SessionCart;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: MenuId,
    pub name: String,
    pub image: String,
    pub price: String,
    pub line_price: String,
    pub quantity: u32,
    /// Quantity the minus button submits; never below 1.
    pub decrement: u32,
    pub increment: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id(),
            name: line.item.name.clone(),
            image: line.item.image.clone(),
            price: line.item.price.display(),
            line_price: line.line_total().display(),
            quantity: line.quantity,
            decrement: line.quantity.saturating_sub(1).max(1),
            increment: line.quantity.saturating_add(1),
        }
    }
}

impl From<&SessionCart> for CartView {
    fn from(cart: &SessionCart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
///
/// `category` and `search` carry the menu filter the visitor came from.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub menu_id: MenuId,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Update cart form data.
///
/// `quantity` stays raw text so out-of-range numbers can be clamped instead
/// of rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub menu_id: MenuId,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub menu_id: MenuId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    CartShowTemplate {
        nav: NavView::load(&state, &cart).await,
        cart: CartView::from(&cart),
    }
}

/// Add one of a menu item to the cart.
///
/// The item is looked up in the catalog, so the price always comes from the
/// kitchen API. Redirects back to the menu list with a notification.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    form: std::result::Result<Form<AddToCartForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let item = state
        .kitchen()
        .menu(form.menu_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", form.menu_id)))?;

    let item_name = item.name.clone();
    cart.add_item(item)?;
    cart.commit().await?;

    let menu_id = form.menu_id.to_string();
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("menu_id", menu_id.as_str()), ("name", item_name.as_str())]),
    );
    tracing::info!(menu_id = %form.menu_id, "Added item to cart");

    Ok(Redirect::to(&menu_return_url(&form)))
}

/// Set the quantity of a cart line. Quantities below 1 become 1.
#[instrument(skip(cart))]
pub async fn update(
    mut cart: SessionCart,
    form: std::result::Result<Form<UpdateCartForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let quantity = parse_quantity(&form.quantity)
        .ok_or_else(|| AppError::BadRequest("Quantity must be a whole number.".to_string()))?;

    cart.update_quantity(form.menu_id, quantity)?;
    cart.commit().await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(cart))]
pub async fn remove(
    mut cart: SessionCart,
    form: std::result::Result<Form<RemoveFromCartForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    cart.remove_item(form.menu_id)?;
    cart.commit().await?;

    let menu_id = form.menu_id.to_string();
    add_breadcrumb("cart", "Removed item", Some(&[("menu_id", menu_id.as_str())]));

    Ok(Redirect::to("/cart"))
}

/// Place the order: empty the cart and show the thank-you page.
///
/// There is no payment step; the kitchen takes orders at the counter.
#[instrument(skip(cart))]
pub async fn checkout(mut cart: SessionCart) -> Result<Redirect> {
    let item_count = cart.item_count();
    let total = cart.total();

    cart.clear();
    cart.commit().await?;

    tracing::info!(item_count, total = %total, "Checkout completed");

    Ok(Redirect::to("/thank-you"))
}

/// Read a posted quantity, saturating numbers too large for `i64`.
///
/// Returns `None` for anything that isn't a whole number.
fn parse_quantity(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(quantity) => Some(quantity),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Menu list URL carrying the visitor's filter and the added item.
fn menu_return_url(form: &AddToCartForm) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = form.category.as_deref().filter(|c| !c.is_empty()) {
        query.append_pair("category", category);
    }
    if let Some(search) = form.search.as_deref().filter(|s| !s.is_empty()) {
        query.append_pair("search", search);
    }
    query.append_pair("added", &form.menu_id.to_string());
    format!("/menus?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(category: Option<&str>, search: Option<&str>) -> AddToCartForm {
        AddToCartForm {
            menu_id: MenuId::new(7),
            category: category.map(String::from),
            search: search.map(String::from),
        }
    }

    #[test]
    fn test_menu_return_url() {
        assert_eq!(menu_return_url(&form(None, None)), "/menus?added=7");
        assert_eq!(
            menu_return_url(&form(Some("Main Course"), Some("nasi goreng"))),
            "/menus?category=Main+Course&search=nasi+goreng&added=7"
        );
        assert_eq!(menu_return_url(&form(Some(""), None)), "/menus?added=7");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" -2 "), Some(-2));
        assert_eq!(parse_quantity("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_quantity("-99999999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_quantity("two"), None);
        assert_eq!(parse_quantity("1.5"), None);
        assert_eq!(parse_quantity(""), None);
    }
}
