use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    entity::users::{Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

/// Map an authenticated identity onto its customer row. A valid token whose
/// login has no row means the identity store and `Users` disagree.
pub async fn resolve_customer<C>(conn: &C, user: &AuthUser) -> AppResult<UserModel>
where
    C: ConnectionTrait,
{
    let customer = Users::find()
        .filter(UserCol::Login.eq(user.login.as_str()))
        .one(conn)
        .await?;

    match customer {
        Some(c) => Ok(c),
        None => {
            tracing::warn!(login = %user.login, "authenticated login has no customer record");
            Err(AppError::NotFound("customer"))
        }
    }
}

pub fn issue_token(login: &str, role: &str, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: login.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn login_customer(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest {
        tai_khoan,
        mat_khau,
    } = payload;
    let customer = Users::find()
        .filter(UserCol::Login.eq(tai_khoan.as_str()))
        .one(&state.orm)
        .await?;

    let customer = match customer {
        Some(c) => c,
        None => return Err(AppError::BadRequest("Invalid account or password".into())),
    };

    let parsed_hash = PasswordHash::new(&customer.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(mat_khau.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid account or password".into()));
    }

    let token = issue_token(&customer.login, &customer.role, &state.jwt_secret)?;
    tracing::info!(customer_id = customer.id, "customer logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            customer: customer_from_entity(customer),
        },
        Some(Meta::empty()),
    ))
}

fn customer_from_entity(model: UserModel) -> Customer {
    Customer {
        id: model.id,
        full_name: model.full_name,
        login: model.login,
        email: model.email,
        address: model.address,
        phone: model.phone,
        birth_date: model.birth_date,
        role: model.role,
    }
}
