// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The authenticated identity an attempt is attributed to.
///
/// Resolved once by the auth middleware and passed explicitly to the
/// services that need it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}
