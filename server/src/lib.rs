//! Messenger Gateway - HTTP front door for the messenger backends
//!
//! This crate handles:
//! - Bearer token (JWT) authentication
//! - REST to gRPC translation for the dialog and user services
//! - Caching of login tokens in Redis
//! - Streaming pass-through to the notification service

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod proxy;
pub mod rpc;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::proxy::NotificationForwarder;
use crate::rpc::{DialogBackend, DialogClient, UserBackend, UserClient};
use crate::session::{RedisSessionStore, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<TokenValidator>,
    pub dialogs: Arc<dyn DialogBackend>,
    pub users: Arc<dyn UserBackend>,
    pub sessions: Arc<dyn SessionStore>,
    pub notifications: Arc<NotificationForwarder>,
    /// Deadline for each backend call.
    pub rpc_timeout: Duration,
}

impl AppState {
    /// Wires the production clients described by `config`. Nothing connects
    /// until the first request needs it.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let dialog_channel =
            rpc::lazy_channel(&config.backends.dialog_url, config.backends.connect_timeout())?;
        let users_channel =
            rpc::lazy_channel(&config.backends.users_url, config.backends.connect_timeout())?;

        Ok(Self {
            validator: Arc::new(TokenValidator::new(&config.auth.jwt_secret)),
            dialogs: Arc::new(DialogClient::new(dialog_channel)),
            users: Arc::new(UserClient::new(users_channel)),
            sessions: Arc::new(RedisSessionStore::new(
                &config.session.redis_url,
                config.session.token_ttl_secs,
            )?),
            notifications: Arc::new(NotificationForwarder::new(&config.notifications)?),
            rpc_timeout: config.backends.request_timeout(),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    use handlers::method_not_allowed;

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Dialogs
        .route(
            "/dialog/create",
            post(handlers::dialogs::create_dialog).fallback(method_not_allowed),
        )
        .route(
            "/dialog/send",
            post(handlers::dialogs::send_message).fallback(method_not_allowed),
        )
        .route(
            "/dialog/messages",
            get(handlers::dialogs::get_dialog_messages).fallback(method_not_allowed),
        )
        .route(
            "/dialog/user",
            get(handlers::dialogs::get_user_dialogs).fallback(method_not_allowed),
        )
        .route(
            "/dialogs/user",
            get(handlers::dialogs::get_user_dialogs).fallback(method_not_allowed),
        )

        // Users
        .route(
            "/users/create",
            post(handlers::users::create_user).fallback(method_not_allowed),
        )
        .route(
            "/users/register",
            post(handlers::users::create_user).fallback(method_not_allowed),
        )
        .route(
            "/users/get",
            get(handlers::users::get_user).fallback(method_not_allowed),
        )
        .route(
            "/users/login",
            post(handlers::users::login).fallback(method_not_allowed),
        )

        // Notifications
        .route("/notifications", any(handlers::notifications::forward))
        .route("/notifications/*path", any(handlers::notifications::forward))

        // Add middleware
        .layer(middleware::from_fn_with_state(
            state.validator.clone(),
            auth::require_bearer,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
