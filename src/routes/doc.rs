use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{
            AddToCartRequest, CartLineView, CartRedirect, CartUpdateItem, CartView,
            RemoveFromCartRequest, UpdateCartRequest,
        },
    },
    models::{Category, Customer, Product, Publisher, SliderImage},
    response::{ApiResponse, Meta},
    routes::{account, cart, health},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        account::login_page,
        account::login,
        cart::cart,
        cart::add_to_cart,
        cart::update_cart,
        cart::remove_from_cart
    ),
    components(
        schemas(
            Customer,
            Product,
            Category,
            Publisher,
            SliderImage,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateCartRequest,
            CartUpdateItem,
            RemoveFromCartRequest,
            CartLineView,
            CartView,
            CartRedirect,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CartRedirect>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Account", description = "Login flow"),
        (name = "Cart", description = "Shopping cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
