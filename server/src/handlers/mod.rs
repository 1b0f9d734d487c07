//! HTTP request handlers for the gateway

pub mod dialogs;
pub mod health;
pub mod notifications;
pub mod users;

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Authenticated caller, placed in the request extensions by
/// [`crate::auth::require_bearer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.user_id
    }

    /// The identity as the numeric user id the dialog service expects.
    pub fn numeric_id(&self) -> Result<i32> {
        self.user_id.parse().map_err(|_| {
            tracing::debug!(user_id = %self.user_id, "Identity is not a numeric user id");
            AppError::Unauthorized
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// JSON body extractor that answers every failure with a 400, whatever the
/// content type of the request.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::bad_request("invalid request body"))?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            AppError::bad_request("invalid request body")
        })
    }
}

/// Decoded query string. Empty values count as absent and the first
/// occurrence of a key wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }

    /// Parses an optional pagination value. Absent stays `None`; anything
    /// present must be a non-negative 32-bit integer.
    pub fn non_negative(&self, key: &str) -> Result<Option<i32>> {
        self.get(key)
            .map(|raw| {
                raw.parse::<i32>()
                    .ok()
                    .filter(|v| *v >= 0)
                    .ok_or_else(|| {
                        AppError::bad_request(format!("{} must be a non-negative integer", key))
                    })
            })
            .transpose()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query()))
    }
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
