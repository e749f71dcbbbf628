// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::AuthUser};

/// JWT Claims structure.
///
/// Tokens are issued by the account service; this crate only validates them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    pub username: String,
    /// User's role (e.g., 'user', 'admin').
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid subject claim".to_string()))?;

        Ok(AuthUser {
            id,
            username: claims.username,
        })
    }
}

/// Signs a token for `user`, valid for `expiration_seconds`.
pub fn sign_jwt(
    user: &AuthUser,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects the
/// caller's `AuthUser` into the request extensions.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let user = verify_jwt(token, &config.jwt_secret)
        .and_then(AuthUser::try_from)
        .map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_round_trips_to_identity() {
        let user = AuthUser { id: 42, username: "alice".into() };
        let token = sign_jwt(&user, "user", "secret", 60).unwrap();

        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.role, "user");
        assert_eq!(AuthUser::try_from(claims).unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = AuthUser { id: 1, username: "bob".into() };
        let token = sign_jwt(&user, "user", "secret", 60).unwrap();
        assert!(matches!(verify_jwt(&token, "other"), Err(AppError::AuthError(_))));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "abc".into(),
            username: "eve".into(),
            role: "user".into(),
            exp: 0,
        };
        assert!(AuthUser::try_from(claims).is_err());
    }
}
