//! Menu items served by the kitchen API and filtering over them.

use serde::{Deserialize, Serialize};

use crate::types::{MenuId, Price};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// A read-only menu entry as served by the kitchen API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: MenuId,
    pub name: String,
    pub price: Price,
    /// Absolute URL of the dish photo.
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Category and name filter for the menu list.
///
/// An empty or `"All"` category matches every item. The search term is
/// matched case-insensitively against the item name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    category: Option<String>,
    search: Option<String>,
}

impl MenuFilter {
    /// Build a filter from raw query values.
    #[must_use]
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_owned);
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { category, search }
    }

    /// The selected category, or `"All"`.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }

    /// The normalized search term, or an empty string.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    /// Whether an item passes this filter.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| item.category == category);
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|term| item.name.to_lowercase().contains(term));
        category_ok && search_ok
    }

    /// Apply the filter, keeping catalog order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Distinct categories in first-seen order, prefixed by `"All"`.
#[must_use]
pub fn categories(items: &[CatalogItem]) -> Vec<String> {
    let mut seen = vec![ALL_CATEGORIES.to_owned()];
    for item in items {
        if !seen.iter().any(|c| *c == item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// Find an item by id.
#[must_use]
pub fn find(items: &[CatalogItem], id: MenuId) -> Option<&CatalogItem> {
    items.iter().find(|item| item.id == id)
}
