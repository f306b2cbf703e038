use serde::Deserialize;
use sqlx::FromRow;

/// Admin account. The password column holds the raw secret.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}
