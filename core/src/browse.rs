//! Client-side browsing: category pills, text search, and which screen the
//! list view should render.

use std::collections::BTreeSet;

use crate::products::FetchState;
use crate::types::Product;

/// Pseudo-category that matches every product.
pub const CATEGORY_ALL: &str = "All";

/// `"All"` followed by the distinct categories, sorted.
pub fn categories(products: &[Product]) -> Vec<String> {
    let distinct: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
    std::iter::once(CATEGORY_ALL)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseFilter {
    pub category: String,
    pub search: String,
}

impl Default for BrowseFilter {
    fn default() -> Self {
        Self {
            category: CATEGORY_ALL.to_string(),
            search: String::new(),
        }
    }
}

impl BrowseFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.category == CATEGORY_ALL || product.category == self.category;
        let query = self.search.trim().to_lowercase();
        let search_ok = query.is_empty()
            || product.name.to_lowercase().contains(&query)
            || product.category.to_lowercase().contains(&query);
        category_ok && search_ok
    }
}

/// Products passing `filter`, in their original order.
pub fn filter_products<'a>(products: &'a [Product], filter: &BrowseFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    /// First load still running.
    Loading,
    /// Nothing to show and the last fetch failed.
    Failed(String),
    /// Products are loaded but none pass the filter.
    Empty,
    Ready,
}

impl ScreenState {
    /// Stale products win over a spinner or an error page.
    pub fn derive(state: &FetchState, filter: &BrowseFilter) -> Self {
        if state.products.is_empty() {
            if state.loading {
                return ScreenState::Loading;
            }
            if let Some(error) = &state.error {
                return ScreenState::Failed(error.clone());
            }
        }
        if state.products.iter().any(|p| filter.matches(p)) {
            ScreenState::Ready
        } else {
            ScreenState::Empty
        }
    }
}
