//! Fetch-state machine for the product list.
//!
//! # Design
//! `ProductList` owns `{products, loading, error}` behind a shared lock and
//! exposes explicit lifecycle operations instead of relying on a view's
//! mount/unmount hooks:
//!
//! - `start()` / `refetch()` issue a single `GET /products` attempt. Loading
//!   is raised and the previous error cleared before the request goes out;
//!   loading is cleared again whatever the outcome.
//! - A failed fetch records its message and keeps the last good products.
//! - Fetches may overlap. Loading stays raised until the last one finishes,
//!   and a result older than one already applied is dropped.
//! - `dispose()` sets a flag that every state write checks first, so a
//!   response landing after teardown is dropped.
//!
//! Clones share state, which is how checkout orchestration triggers a refetch
//! of the list the view is rendering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::catalog::ProductCatalog;
use crate::sync::lock;
use crate::types::{Product, ProductFilters};

/// Observable state of one product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    /// Last successfully fetched products, in server order.
    pub products: Vec<Product>,
    /// True only while a fetch is outstanding.
    pub loading: bool,
    pub error: Option<String>,
}

/// Fetch state plus the bookkeeping for overlapping fetches.
#[derive(Debug, Default)]
struct Tracked {
    state: FetchState,
    /// Fetches started but not yet finished.
    outstanding: usize,
    /// Generation handed to the most recently started fetch.
    issued: u64,
    /// Generation of the newest result written into `state`.
    applied: u64,
}

#[derive(Debug, Clone)]
pub struct ProductList {
    catalog: ProductCatalog,
    filters: ProductFilters,
    tracked: Arc<Mutex<Tracked>>,
    disposed: Arc<AtomicBool>,
}

impl ProductList {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self::with_filters(catalog, ProductFilters::default())
    }

    pub fn with_filters(catalog: ProductCatalog, filters: ProductFilters) -> Self {
        Self {
            catalog,
            filters,
            tracked: Arc::new(Mutex::new(Tracked::default())),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Initial load.
    pub async fn start(&self) {
        self.load().await;
    }

    pub async fn refetch(&self) {
        self.load().await;
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> FetchState {
        lock(&self.tracked).state.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        lock(&self.tracked).state.products.clone()
    }

    /// Latest known copy of a product, if still listed.
    pub fn find(&self, product_id: &str) -> Option<Product> {
        lock(&self.tracked)
            .state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }

    async fn load(&self) {
        let started = self.update(|tracked| {
            tracked.outstanding += 1;
            tracked.issued += 1;
            tracked.state.loading = true;
            tracked.state.error = None;
            tracked.issued
        });
        let Some(generation) = started else {
            return;
        };

        let result = self.catalog.get_products(&self.filters).await;

        self.update(move |tracked| {
            tracked.outstanding = tracked.outstanding.saturating_sub(1);
            tracked.state.loading = tracked.outstanding > 0;
            if generation < tracked.applied {
                debug!(generation, applied = tracked.applied, "dropping superseded product list result");
                return;
            }
            tracked.applied = generation;
            let state = &mut tracked.state;
            match result {
                Ok(Some(products)) => {
                    debug!(count = products.len(), "product list loaded");
                    state.products = products;
                }
                Ok(None) => debug!("product list response had no body"),
                Err(err) => {
                    warn!(code = %err.code, reason = %err.message, "product list fetch failed");
                    state.error = Some(err.message);
                }
            }
        });
    }

    /// Apply `f` unless the list has been disposed.
    fn update<R>(&self, f: impl FnOnce(&mut Tracked) -> R) -> Option<R> {
        if self.is_disposed() {
            debug!("product list disposed; dropping state update");
            return None;
        }
        let mut tracked = lock(&self.tracked);
        Some(f(&mut *tracked))
    }
}
