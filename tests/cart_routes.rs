use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use bookstore_cart::{
    dto::cart::{AddToCartRequest, CART_PATH, CartRedirect, UpdateCartRequest},
    middleware::auth::LOGIN_PATH,
    routes::create_router,
    services::auth_service::issue_token,
    state::AppState,
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

// Nothing here reaches the database: the pool is lazy and the ORM is disconnected.
fn offline_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://bookstore@127.0.0.1:1/bookstore")
        .expect("lazy pool");
    let state = AppState {
        pool,
        orm: DatabaseConnection::Disconnected,
        jwt_secret: SECRET.to_string(),
    };
    create_router().with_state(state)
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn cart_view_without_login_redirects_to_login() {
    let response = offline_app()
        .oneshot(Request::builder().uri("/Cart/Cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), LOGIN_PATH);
}

#[tokio::test]
async fn mutations_without_login_redirect_to_login() {
    let requests = [
        post_json(
            "/Cart/AddToCart",
            None,
            serde_json::json!({ "productId": 1 }),
        ),
        post_json(
            "/Cart/UpdateCart",
            None,
            serde_json::json!({ "cartItems": [{ "CartId": 1, "Quantity": 2 }] }),
        ),
        post_json(
            "/Cart/RemoveFromCart",
            None,
            serde_json::json!({ "cartId": 1 }),
        ),
    ];

    for request in requests {
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }
}

#[tokio::test]
async fn garbage_token_is_treated_as_logged_out() {
    let response = offline_app()
        .oneshot(post_json(
            "/Cart/UpdateCart",
            Some("not-a-jwt"),
            serde_json::json!({ "cartItems": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), LOGIN_PATH);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let token = issue_token("khachhang", "customer", "some-other-secret").unwrap();
    let response = offline_app()
        .oneshot(post_json(
            "/Cart/RemoveFromCart",
            Some(&token),
            serde_json::json!({ "cartId": 999 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), LOGIN_PATH);
}

#[tokio::test]
async fn add_with_non_positive_quantity_is_bad_request() {
    let token = issue_token("khachhang", "customer", SECRET).unwrap();
    let response = offline_app()
        .oneshot(post_json(
            "/Cart/AddToCart",
            Some(&token),
            serde_json::json!({ "productId": 1, "quantity": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_with_missing_product_id_is_bad_request() {
    let token = issue_token("khachhang", "customer", SECRET).unwrap();
    let response = offline_app()
        .oneshot(post_json("/Cart/AddToCart", Some(&token), serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().starts_with("Bad Request"));
    assert!(json["data"]["error"].is_string());
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let token = issue_token("khachhang", "customer", SECRET).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/Cart/UpdateCart")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{ \"cartItems\": [ "))
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn body_without_json_content_type_is_bad_request() {
    let token = issue_token("khachhang", "customer", SECRET).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/Cart/RemoveFromCart")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(r#"{ "cartId": 1 }"#))
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_page_is_reachable() {
    let response = offline_app()
        .oneshot(Request::builder().uri(LOGIN_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("Login required"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = offline_app()
        .oneshot(Request::builder().uri("/Cart/Checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn redirect_without_notice_points_at_cart() {
    let redirect = CartRedirect::to_cart(None);
    assert_eq!(redirect.redirect_to, CART_PATH);

    let response = redirect.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), CART_PATH);
}

#[tokio::test]
async fn redirect_carries_encoded_notice() {
    let notice = "Book \"Số Đỏ\" has only 2 left in stock. Please choose another product!";
    let redirect = CartRedirect::to_cart(Some(notice.to_string()));

    let (path, query) = redirect.redirect_to.split_once('?').expect("query string");
    assert_eq!(path, CART_PATH);
    assert!(!query.contains(' '));

    let decoded: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    assert_eq!(decoded, vec![("notice".to_string(), notice.to_string())]);

    let response = redirect.into_response();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], notice);
    assert_eq!(json["data"]["notice"], notice);
}

#[test]
fn add_request_defaults_quantity_to_one() {
    let req: AddToCartRequest = serde_json::from_str(r#"{ "productId": 7 }"#).unwrap();
    assert_eq!(req.product_id, 7);
    assert_eq!(req.quantity, 1);
}

#[test]
fn update_request_reads_cart_id_and_quantity_pairs() {
    let req: UpdateCartRequest = serde_json::from_str(
        r#"{ "cartItems": [{ "CartId": 3, "Quantity": 20 }, { "CartId": 4, "Quantity": 0 }] }"#,
    )
    .unwrap();
    assert_eq!(req.cart_items.len(), 2);
    assert_eq!(req.cart_items[0].cart_id, 3);
    assert_eq!(req.cart_items[0].quantity, 20);
    assert_eq!(req.cart_items[1].quantity, 0);
}
