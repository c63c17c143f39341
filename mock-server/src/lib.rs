use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutInput {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub message: String,
    pub product: Product,
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

/// Products in listing order.
pub type Db = Arc<RwLock<Vec<Product>>>;

fn product(id: &str, name: &str, cents: i64, category: &str, stock: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        category: category.to_string(),
        stock,
        image_url: None,
    }
}

/// The catalog every fresh server starts with.
pub fn seed() -> Vec<Product> {
    vec![
        product("65f1a0c2e4b0a1b2c3d4e501", "Aspirin 500mg", 950, "Pain Relief", 12),
        product("65f1a0c2e4b0a1b2c3d4e502", "Ibuprofen 400mg", 1490, "Pain Relief", 8),
        product("65f1a0c2e4b0a1b2c3d4e503", "Vitamin C 1g", 2290, "Vitamins", 20),
        product("65f1a0c2e4b0a1b2c3d4e504", "Loratadine 10mg", 1875, "Allergy", 5),
        product("65f1a0c2e4b0a1b2c3d4e505", "Saline Nasal Spray", 1200, "Allergy", 0),
        product("65f1a0c2e4b0a1b2c3d4e506", "Adhesive Bandages", 650, "First Aid", 30),
    ]
}

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(products: Vec<Product>) -> Router {
    let db: Db = Arc::new(RwLock::new(products));
    Router::new()
        .route("/products", get(list_products))
        .route("/checkout", post(checkout))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>, Query(query): Query<ProductQuery>) -> Json<Vec<Product>> {
    let products = db.read().await;
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let listed: Vec<Product> = products
        .iter()
        .filter(|p| query.category.as_deref().map_or(true, |c| p.category == c))
        .filter(|p| {
            search.as_deref().map_or(true, |q| {
                p.name.to_lowercase().contains(q) || p.category.to_lowercase().contains(q)
            })
        })
        .cloned()
        .collect();
    debug!(count = listed.len(), "listing products");
    Json(listed)
}

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

async fn checkout(State(db): State<Db>, Json(input): Json<CheckoutInput>) -> ApiResult<CheckoutReceipt> {
    if input.quantity < 1 {
        return Err(reject(StatusCode::BAD_REQUEST, "Quantity must be at least 1"));
    }
    let mut products = db.write().await;
    let product = products
        .iter_mut()
        .find(|p| p.id == input.product_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Product not found"))?;

    let quantity = u32::try_from(input.quantity).unwrap_or(u32::MAX);
    if quantity > product.stock {
        return Err(reject(StatusCode::CONFLICT, "Insufficient stock"));
    }
    product.stock -= quantity;
    info!(product_id = %product.id, quantity, remaining = product.stock, "order placed");

    Ok(Json(CheckoutReceipt {
        message: "Order placed successfully".to_string(),
        product: product.clone(),
        order_id: Uuid::new_v4(),
    }))
}
