//! Typed calls for the two storefront endpoints.

use crate::client::{HttpClient, RequestConfig};
use crate::error::ApiError;
use crate::types::{CheckoutRequest, CheckoutResponse, Product, ProductFilters};

pub const PRODUCTS_PATH: &str = "/products";
pub const CHECKOUT_PATH: &str = "/checkout";

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    client: HttpClient,
}

impl ProductCatalog {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// `GET /products`, in server order. `Ok(None)` means the server answered
    /// successfully without a usable body.
    pub async fn get_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Option<Vec<Product>>, ApiError> {
        let config = RequestConfig::default()
            .param("category", filters.category.as_deref())
            .param("search", filters.search.as_deref());
        self.client.get(PRODUCTS_PATH, config).await
    }

    /// `POST /checkout`. A missing quantity means 1, and 0 is raised to 1.
    pub async fn checkout(
        &self,
        product_id: &str,
        quantity: Option<u32>,
    ) -> Result<CheckoutResponse, ApiError> {
        let body = CheckoutRequest {
            product_id: product_id.to_string(),
            quantity: quantity.unwrap_or(1).max(1),
        };
        let response = self
            .client
            .post(CHECKOUT_PATH, &body, RequestConfig::default())
            .await?;
        Ok(response.unwrap_or_default())
    }
}
