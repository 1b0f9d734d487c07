//! User management handlers, backed by the user service

use axum::{extract::State, Json};

use crate::{
    error::{AppError, Result},
    models::*,
    rpc::{
        users::{CreateUserRequest, CreateUserResponse, GetUserRequest, LoginRequest},
        with_deadline, BackendError,
    },
    session::SessionError,
    AppState,
};

use super::{JsonBody, QueryParams};

/// Register a new user. The body goes to the user service unchanged.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let login = req.login.clone();

    let response = with_deadline(state.rpc_timeout, state.users.create_user(req))
        .await
        .map_err(|e| {
            // Unlike the other endpoints, the backend's reason is shown.
            let reason = match &e {
                BackendError::Status(status) => status.message().to_string(),
                BackendError::DeadlineExceeded(_) => e.to_string(),
            };
            AppError::backend(format!("failed to create user: {}", reason), e)
        })?;

    tracing::info!(login = %login, "User created");

    Ok(Json(response))
}

/// Look users up by any combination of profile fields
pub async fn get_user(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<UserList>> {
    let id = query
        .get("id")
        .map(|raw| {
            raw.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| AppError::bad_request("id must be a positive integer"))
        })
        .transpose()?;

    let request = GetUserRequest {
        id,
        login: query.get_owned("login"),
        first_name: query.get_owned("first_name"),
        last_name: query.get_owned("last_name"),
        email: query.get_owned("email"),
        phone: query.get_owned("phone"),
    };

    if !request.has_filter() {
        return Err(AppError::bad_request("at least one search parameter is required"));
    }

    let response = with_deadline(state.rpc_timeout, state.users.get_user(request))
        .await
        .map_err(|e| AppError::backend("failed to load users", e))?;

    Ok(Json(response.into()))
}

/// Log in with login and password. The issued token is cached under the
/// user's id.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<LoginResult>> {
    if body.login.is_empty() || body.password.is_empty() {
        return Err(AppError::bad_request("login and password are required"));
    }

    let request = LoginRequest {
        login: body.login,
        password: body.password,
    };

    let response = with_deadline(state.rpc_timeout, state.users.login(request))
        .await
        .map_err(|e| AppError::backend("login failed", e))?;

    if response.user_id != 0 && !response.token.is_empty() {
        // Best effort: a cache failure or timeout does not fail the login.
        let stored = tokio::time::timeout(
            state.rpc_timeout,
            state.sessions.store_token(response.user_id, &response.token),
        )
        .await
        .unwrap_or(Err(SessionError::Timeout(state.rpc_timeout)));

        match stored {
            Ok(()) => tracing::info!(user_id = response.user_id, "User logged in"),
            Err(e) => tracing::warn!(
                user_id = response.user_id,
                error = %e,
                "Failed to cache session token"
            ),
        }
    }

    Ok(Json(response.into()))
}
