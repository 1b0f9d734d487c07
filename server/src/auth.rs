//! Bearer token validation and the authentication middleware

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AppError;
use crate::handlers::Identity;

/// Paths reachable without a bearer token, whatever the method.
pub const PUBLIC_PATHS: &[&str] = &["/health", "/users/login", "/users/create", "/users/register"];

const USER_ID_CLAIM: &str = "user_id";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("user_id missing")]
    MissingUserId,
}

/// Verifies HMAC-signed JWTs against the pre-shared secret.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // `exp` is enforced when present but not mandatory.
        validation.required_spec_claims.clear();
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(AuthError::InvalidToken)?;

        // A numeric user_id is rejected, not coerced.
        match data.claims.get(USER_ID_CLAIM) {
            Some(Value::String(user_id)) => Ok(Identity::new(user_id.clone())),
            _ => Err(AuthError::MissingUserId),
        }
    }
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Rejects requests to protected paths that lack a valid bearer token and
/// stores the caller's [`Identity`] in the request extensions otherwise.
pub async fn require_bearer(
    State(validator): State<Arc<TokenValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(auth) = req.headers().typed_get::<Authorization<Bearer>>() else {
        tracing::debug!(path = %req.uri().path(), "Missing bearer token");
        return Err(AppError::Unauthorized);
    };

    let identity = validator.validate(auth.token()).map_err(|e| {
        tracing::debug!(path = %req.uri().path(), error = %e, "Token validation failed");
        AppError::Unauthorized
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
