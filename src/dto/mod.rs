pub mod auth;
pub mod cart;
