use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Revoked token identifier. A row here permanently invalidates the token.
#[derive(Debug, Clone, FromRow)]
pub struct BlockedToken {
    pub jti: Uuid,
    pub created_at: OffsetDateTime,
}
