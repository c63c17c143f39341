//! Checkout orchestration and the selection state around it.
//!
//! # Design
//! `Storefront` ties the catalog, the product list, and the toast channel
//! together and owns the transient UI state: the product open in the detail
//! view, the quantity selector, and the set of products with a checkout in
//! flight. All methods take `&self` so a pending `buy` never blocks other
//! interactions; the state lives behind a lock that is never held across an
//! await.
//!
//! `buy` does not refuse a second checkout for a product already in flight.
//! The view disables the control via `can_buy`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::catalog::ProductCatalog;
use crate::client::HttpClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::products::ProductList;
use crate::sync::lock;
use crate::toast::{Severity, ToastChannel};
use crate::transport::ReqwestFetch;
use crate::types::{CheckoutResponse, Product};

pub const OUT_OF_STOCK_MESSAGE: &str = "This product is out of stock";
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Rejected locally; nothing was sent.
    OutOfStock,
    Placed(CheckoutResponse),
    Failed(ApiError),
}

#[derive(Debug)]
struct Selection {
    detail: Option<Product>,
    quantity: u32,
    in_flight: HashSet<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            detail: None,
            quantity: 1,
            in_flight: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: ProductCatalog,
    products: ProductList,
    toasts: ToastChannel,
    selection: Arc<Mutex<Selection>>,
}

impl Storefront {
    pub fn new(catalog: ProductCatalog, toasts: ToastChannel) -> Self {
        let products = ProductList::new(catalog.clone());
        Self::with_products(catalog, products, toasts)
    }

    pub fn with_products(
        catalog: ProductCatalog,
        products: ProductList,
        toasts: ToastChannel,
    ) -> Self {
        Self {
            catalog,
            products,
            toasts,
            selection: Arc::new(Mutex::new(Selection::default())),
        }
    }

    /// Wire a storefront against the configured backend over reqwest.
    pub fn from_config(config: &Config) -> Self {
        let client = HttpClient::new(&config.api_url, Arc::new(ReqwestFetch::new()));
        Self::new(
            ProductCatalog::new(client),
            ToastChannel::new(config.toast_duration),
        )
    }

    pub fn products(&self) -> &ProductList {
        &self.products
    }

    pub fn toasts(&self) -> &ToastChannel {
        &self.toasts
    }

    pub fn detail(&self) -> Option<Product> {
        lock(&self.selection).detail.clone()
    }

    pub fn quantity(&self) -> u32 {
        lock(&self.selection).quantity
    }

    pub fn open_detail(&self, product: &Product) {
        let mut selection = lock(&self.selection);
        selection.detail = Some(product.clone());
        selection.quantity = 1;
    }

    pub fn close_detail(&self) {
        lock(&self.selection).detail = None;
    }

    /// Move the selector by `delta`, kept within `[1, stock]` of the product
    /// in the detail view. Returns the new quantity.
    pub fn adjust_quantity(&self, delta: i64) -> u32 {
        let mut selection = lock(&self.selection);
        let stock = selection.detail.as_ref().map_or(1, |p| p.stock.max(1));
        let next = i64::from(selection.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(stock));
        selection.quantity = u32::try_from(next).unwrap_or(1);
        selection.quantity
    }

    pub fn is_checking_out(&self, product_id: &str) -> bool {
        lock(&self.selection).in_flight.contains(product_id)
    }

    /// Whether the buy control for `product` should be enabled.
    pub fn can_buy(&self, product: &Product) -> bool {
        product.in_stock() && !self.is_checking_out(&product.id)
    }

    /// Check out the product in the detail view with the selected quantity.
    pub async fn buy_selected(&self) -> Option<CheckoutOutcome> {
        let (product, quantity) = {
            let selection = lock(&self.selection);
            (selection.detail.clone()?, selection.quantity)
        };
        Some(self.buy(&product, quantity).await)
    }

    /// Place an order for `quantity` of `product`.
    ///
    /// The quantity is clamped to `[1, stock]` before anything is sent. Every
    /// attempt that reaches the network ends with exactly one toast and one
    /// product list refetch.
    pub async fn buy(&self, product: &Product, quantity: u32) -> CheckoutOutcome {
        if !product.in_stock() {
            self.toasts.show(OUT_OF_STOCK_MESSAGE, Severity::Error);
            return CheckoutOutcome::OutOfStock;
        }
        let quantity = quantity.clamp(1, product.stock);

        self.set_in_flight(&product.id, true);
        let result = self.catalog.checkout(&product.id, Some(quantity)).await;
        self.set_in_flight(&product.id, false);

        let outcome = match result {
            Ok(response) => {
                info!(product_id = %product.id, quantity, "order placed");
                let text = response
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| ORDER_PLACED_MESSAGE.to_string());
                self.toasts.show(text, Severity::Success);
                CheckoutOutcome::Placed(response)
            }
            Err(err) => {
                warn!(product_id = %product.id, code = %err.code, reason = %err.message, "checkout failed");
                self.toasts.show(err.message.clone(), Severity::Error);
                CheckoutOutcome::Failed(err)
            }
        };

        self.products.refetch().await;

        if matches!(outcome, CheckoutOutcome::Placed(_)) {
            let mut selection = lock(&self.selection);
            selection.detail = None;
            selection.quantity = 1;
        }
        outcome
    }

    fn set_in_flight(&self, product_id: &str, pending: bool) {
        let mut selection = lock(&self.selection);
        if pending {
            selection.in_flight.insert(product_id.to_string());
        } else {
            selection.in_flight.remove(product_id);
        }
    }
}
