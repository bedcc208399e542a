use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::cart::{
        AddToCartRequest, CartRedirect, CartView, CartViewQuery, RemoveFromCartRequest,
        UpdateCartRequest,
    },
    error::AppResult,
    middleware::{auth::AuthUser, json::AppJson},
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/Cart", get(cart))
        .route("/AddToCart", post(add_to_cart))
        .route("/UpdateCart", post(update_cart))
        .route("/RemoveFromCart", post(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/Cart/Cart",
    params(
        ("notice" = Option<String>, Query, description = "Transient message from the previous cart action")
    ),
    responses(
        (status = 200, description = "Cart lines with catalog widgets", body = ApiResponse<CartView>),
        (status = 303, description = "Not logged in, redirect to /Account/Login"),
        (status = 404, description = "No customer record for the logged-in account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CartViewQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::cart_view(&state, &user, query.notice).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/Cart/AddToCart",
    request_body = AddToCartRequest,
    responses(
        (status = 303, description = "Back to the cart view, with a notice when stock is short", body = ApiResponse<CartRedirect>),
        (status = 400, description = "Quantity below 1 or malformed body"),
        (status = 404, description = "Customer or product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<CartRedirect> {
    let outcome = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(CartRedirect::to_cart(outcome.notice))
}

#[utoipa::path(
    post,
    path = "/Cart/UpdateCart",
    request_body = UpdateCartRequest,
    responses(
        (status = 303, description = "Back to the cart view, with a notice when any line was clamped", body = ApiResponse<CartRedirect>),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Customer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateCartRequest>,
) -> AppResult<CartRedirect> {
    let outcome = cart_service::update_cart(&state, &user, payload).await?;
    Ok(CartRedirect::to_cart(outcome.notice))
}

#[utoipa::path(
    post,
    path = "/Cart/RemoveFromCart",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 303, description = "Back to the cart view; removing a missing line still succeeds", body = ApiResponse<CartRedirect>),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Customer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<RemoveFromCartRequest>,
) -> AppResult<CartRedirect> {
    let outcome = cart_service::remove_from_cart(&state, &user, payload.cart_id).await?;
    Ok(CartRedirect::to_cart(outcome.notice))
}
