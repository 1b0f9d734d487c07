//! HTTP request and response bodies

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::rpc::dialog::{
    CreateDialogResponse, DialogInfo, GetDialogMessagesResponse, GetUserDialogsResponse, Message,
    SendMessageResponse,
};
use crate::rpc::users::{GetUserResponse, LoginResponse, User};

/// Renders a protobuf timestamp as RFC 3339 with second precision. A missing
/// timestamp renders as the Unix epoch.
pub fn format_timestamp(ts: Option<&prost_types::Timestamp>) -> String {
    let (seconds, nanos) = ts.map(|t| (t.seconds, t.nanos)).unwrap_or((0, 0));
    DateTime::<Utc>::from_timestamp(seconds, nanos.max(0) as u32)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// Dialog Models
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateDialogBody {
    pub peer_id: i32,
    pub dialog_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendMessageBody {
    pub dialog_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedDialog {
    pub dialog_id: i32,
    pub dialog_name: String,
    pub success: bool,
}

impl From<CreateDialogResponse> for CreatedDialog {
    fn from(resp: CreateDialogResponse) -> Self {
        Self {
            dialog_id: resp.dialog_id,
            dialog_name: resp.dialog_name,
            success: resp.success,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentMessage {
    pub message_id: i32,
    pub timestamp: String,
}

impl From<SendMessageResponse> for SentMessage {
    fn from(resp: SendMessageResponse) -> Self {
        Self {
            message_id: resp.message_id,
            timestamp: format_timestamp(resp.timestamp.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogSummary {
    pub dialog_id: i32,
    pub peer_id: i32,
    pub peer_login: String,
    pub last_message: String,
}

impl From<DialogInfo> for DialogSummary {
    fn from(info: DialogInfo) -> Self {
        Self {
            dialog_id: info.dialog_id,
            peer_id: info.peer_id,
            peer_login: info.peer_login,
            last_message: info.last_message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogList {
    pub dialogs: Vec<DialogSummary>,
}

impl From<GetUserDialogsResponse> for DialogList {
    fn from(resp: GetUserDialogsResponse) -> Self {
        Self {
            dialogs: resp.dialogs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageView {
    pub id: i32,
    pub user_id: i32,
    pub text: String,
    pub timestamp: String,
}

impl From<Message> for MessageView {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id,
            user_id: msg.user_id,
            timestamp: format_timestamp(msg.timestamp.as_ref()),
            text: msg.text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageList {
    pub messages: Vec<MessageView>,
}

impl From<GetDialogMessagesResponse> for MessageList {
    fn from(resp: GetDialogMessagesResponse) -> Self {
        Self {
            messages: resp.messages.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub id: i64,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserList {
    pub users: Vec<UserView>,
}

impl From<GetUserResponse> for UserList {
    fn from(resp: GetUserResponse) -> Self {
        Self {
            users: resp.users.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResult {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<LoginResponse> for LoginResult {
    fn from(resp: LoginResponse) -> Self {
        Self {
            message: resp.message,
            user_id: (resp.user_id != 0).then_some(resp.user_id),
            token: (!resp.token.is_empty()).then_some(resp.token),
        }
    }
}
