use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Category, Product, Publisher, SliderImage},
    response::ApiResponse,
};

pub const CART_PATH: &str = "/Cart/Cart";

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartUpdateItem {
    #[serde(rename = "CartId")]
    pub cart_id: i32,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    #[serde(default)]
    pub cart_items: Vec<CartUpdateItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub cart_id: i32,
}

/// `notice` comes from the client and is echoed as untrusted display text.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CartViewQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    pub id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub product: Product,
    pub category: Option<Category>,
    pub publisher: Option<Publisher>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    /// Sum of quantities over every line.
    pub cart_count: i64,
    pub categories: Vec<Category>,
    pub publishers: Vec<Publisher>,
    pub sliders: Vec<SliderImage>,
    pub best_sellers: Vec<Product>,
    pub notice: Option<String>,
}

/// Result of a cart mutation: a 303 back to the cart view, carrying the
/// transient notice in the query string when there is one.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartRedirect {
    pub redirect_to: String,
    pub notice: Option<String>,
}

impl CartRedirect {
    pub fn to_cart(notice: Option<String>) -> Self {
        let redirect_to = match notice.as_deref() {
            Some(text) => match serde_urlencoded::to_string(&[("notice", text)]) {
                Ok(query) => format!("{CART_PATH}?{query}"),
                Err(_) => CART_PATH.to_string(),
            },
            None => CART_PATH.to_string(),
        };
        Self {
            redirect_to,
            notice,
        }
    }
}

impl IntoResponse for CartRedirect {
    fn into_response(self) -> Response {
        let location = self.redirect_to.clone();
        let message = self
            .notice
            .clone()
            .unwrap_or_else(|| "Redirecting to cart".to_string());
        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location)],
            Json(ApiResponse::success(message, self, None)),
        )
            .into_response()
    }
}
