//! Pass-through to the notification service

use axum::{
    extract::{Request, State},
    response::Response,
};

use crate::{error::Result, AppState};

use super::Identity;

/// Forward any `/notifications` request upstream on behalf of the caller
pub async fn forward(
    State(state): State<AppState>,
    identity: Identity,
    req: Request,
) -> Result<Response> {
    state.notifications.forward(&identity, req).await
}
