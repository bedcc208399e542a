use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    middleware::json::AppJson,
    response::ApiResponse,
    services::auth_service::login_customer,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/Login", get(login_page).post(login))
}

#[utoipa::path(
    get,
    path = "/Account/Login",
    responses(
        (status = 200, description = "Where unauthenticated cart requests land", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Account"
)]
pub async fn login_page() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::message(
        "Login required: POST /Account/Login with taiKhoan and matKhau",
    ))
}

#[utoipa::path(
    post,
    path = "/Account/Login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token for the customer", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Account"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_customer(&state, payload).await?;
    Ok(Json(resp))
}
