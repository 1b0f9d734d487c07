//! Dialog handlers, backed by the dialog service

use axum::{extract::State, Json};

use crate::{
    error::{AppError, Result},
    models::*,
    rpc::{
        dialog::{
            CreateDialogRequest, GetDialogMessagesRequest, GetUserDialogsRequest,
            SendMessageRequest,
        },
        with_deadline,
    },
    AppState,
};

use super::{Identity, JsonBody, QueryParams};

/// Create a dialog between the caller and a peer
pub async fn create_dialog(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<CreateDialogBody>,
) -> Result<Json<CreatedDialog>> {
    let request = CreateDialogRequest {
        user_id: identity.numeric_id()?,
        peer_id: body.peer_id,
        dialog_name: body.dialog_name,
    };

    let response = with_deadline(state.rpc_timeout, state.dialogs.create_dialog(request))
        .await
        .map_err(|e| AppError::backend("failed to create dialog", e))?;

    tracing::info!(
        user_id = %identity.as_str(),
        dialog_id = response.dialog_id,
        "Dialog created"
    );

    Ok(Json(response.into()))
}

/// Send a text message to a dialog on behalf of the caller
pub async fn send_message(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<SendMessageBody>,
) -> Result<Json<SentMessage>> {
    if body.dialog_id == 0 || body.text.is_empty() {
        return Err(AppError::bad_request("dialog_id and text are required"));
    }

    let request = SendMessageRequest {
        dialog_id: body.dialog_id,
        user_id: identity.numeric_id()?,
        text: body.text,
    };

    let response = with_deadline(state.rpc_timeout, state.dialogs.send_message(request))
        .await
        .map_err(|e| AppError::backend("failed to send message", e))?;

    Ok(Json(response.into()))
}

/// List the caller's dialogs
pub async fn get_user_dialogs(
    State(state): State<AppState>,
    identity: Identity,
    query: QueryParams,
) -> Result<Json<DialogList>> {
    let request = GetUserDialogsRequest {
        user_id: identity.numeric_id()?,
        limit: query.non_negative("limit")?,
        offset: query.non_negative("offset")?,
    };

    let response = with_deadline(state.rpc_timeout, state.dialogs.get_user_dialogs(request))
        .await
        .map_err(|e| AppError::backend("failed to load dialogs", e))?;

    Ok(Json(response.into()))
}

/// List messages of a dialog
pub async fn get_dialog_messages(
    State(state): State<AppState>,
    _identity: Identity,
    query: QueryParams,
) -> Result<Json<MessageList>> {
    let dialog_id = query
        .get("dialog_id")
        .ok_or_else(|| AppError::bad_request("dialog_id is required"))?
        .parse::<i32>()
        .map_err(|_| AppError::bad_request("dialog_id must be a number"))?;

    let request = GetDialogMessagesRequest {
        dialog_id,
        limit: query.non_negative("limit")?,
        offset: query.non_negative("offset")?,
    };

    let response = with_deadline(state.rpc_timeout, state.dialogs.get_dialog_messages(request))
        .await
        .map_err(|e| AppError::backend("failed to load messages", e))?;

    Ok(Json(response.into()))
}
