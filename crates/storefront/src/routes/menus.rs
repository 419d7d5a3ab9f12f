//! Menu route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use yoloverse_core::{CatalogItem, MenuFilter, MenuId, catalog};

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::{NavView, PHOTO_STRIP, layout::GalleryPhoto};
use crate::services::SessionCart;
use crate::state::AppState;

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: MenuId,
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub description: String,
}

impl From<&CatalogItem> for MenuItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.display(),
            image: item.image.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
        }
    }
}

/// A category tab in the menu filter bar.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub active: bool,
}

/// Query parameters for the menu list.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// Id of the item just added to the cart.
    pub added: Option<MenuId>,
}

/// Menu list template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/index.html")]
pub struct MenuIndexTemplate {
    pub nav: NavView,
    pub photos: &'static [GalleryPhoto],
    pub items: Vec<MenuItemView>,
    pub categories: Vec<CategoryView>,
    pub category: String,
    pub search: String,
    /// Name of the item just added, for the notification banner.
    pub added: Option<String>,
    /// Whether the menu couldn't be loaded at all.
    pub unavailable: bool,
}

/// Menu item detail template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/show.html")]
pub struct MenuShowTemplate {
    pub nav: NavView,
    pub item: MenuItemView,
}

/// Display the menu, filtered by category and search term.
#[instrument(skip(state, cart))]
pub async fn index(
    State(state): State<AppState>,
    cart: SessionCart,
    Query(query): Query<MenuQuery>,
) -> impl IntoResponse {
    let filter = MenuFilter::new(query.category.as_deref(), query.search.as_deref());

    let (nav, menus) = tokio::join!(NavView::load(&state, &cart), state.kitchen().menus());
    let (menus, unavailable) = match menus {
        Ok(menus) => (menus, false),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load menu");
            (Vec::new(), true)
        }
    };

    let categories = catalog::categories(&menus)
        .into_iter()
        .map(|name| CategoryView {
            active: name == filter.category(),
            name,
        })
        .collect();

    let added = query
        .added
        .and_then(|id| catalog::find(&menus, id))
        .map(|item| item.name.clone());

    MenuIndexTemplate {
        nav,
        photos: PHOTO_STRIP,
        items: filter
            .apply(&menus)
            .into_iter()
            .map(MenuItemView::from)
            .collect(),
        categories,
        category: filter.category().to_string(),
        search: filter.search().to_string(),
        added,
        unavailable,
    }
}

/// Display one menu item.
#[instrument(skip(state, cart))]
pub async fn show(
    State(state): State<AppState>,
    cart: SessionCart,
    Path(id): Path<MenuId>,
) -> Result<MenuShowTemplate> {
    let item = state
        .kitchen()
        .menu(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

    Ok(MenuShowTemplate {
        nav: NavView::load(&state, &cart).await,
        item: MenuItemView::from(&item),
    })
}
