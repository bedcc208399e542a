use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    /// HMAC secret for bearer tokens issued by `/Account/Login`.
    pub jwt_secret: String,
}
