use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub full_name: String,
    pub login: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SliderImage {
    pub id: i32,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Unit price in whole đồng.
    pub price: i64,
    pub stock: i32,
    pub sold: i32,
    pub image: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub publisher_id: Option<i32>,
}
