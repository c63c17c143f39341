//! Client core for the Raia-Connect pharmacy storefront.
//!
//! # Overview
//! Talks to a backend exposing `GET /products` and `POST /checkout`, keeps
//! the product list's fetch state, orchestrates checkout, and reports
//! outcomes through a single-slot toast channel. Rendering is left to the
//! embedding application.
//!
//! # Design
//! - `HttpClient` builds plain-data requests, hands them to a `Fetch`
//!   implementation, and parses the responses. Every failure it returns is a
//!   normalized `ApiError { code, message }`.
//! - `ProductList` and `ToastChannel` are explicit state machines with
//!   shared, lock-protected state; clones observe the same state.
//! - `Storefront` is the checkout orchestration: stock guard, quantity
//!   clamping, in-flight markers, toast feedback, refetch.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod browse;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod products;
pub mod toast;
pub mod transport;
pub mod types;

mod sync;
#[cfg(test)]
mod testing;

pub use browse::{categories, filter_products, BrowseFilter, ScreenState, CATEGORY_ALL};
pub use catalog::ProductCatalog;
pub use checkout::{CheckoutOutcome, Storefront};
pub use client::{HttpClient, RequestConfig};
pub use config::{Config, ConfigError};
pub use error::{normalize, normalize_error, ApiError};
pub use http::{Fetch, HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use products::{FetchState, ProductList};
pub use toast::{Severity, Toast, ToastChannel};
pub use transport::ReqwestFetch;
pub use types::{CheckoutRequest, CheckoutResponse, Product, ProductFilters};
