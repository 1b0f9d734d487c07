//! `messenger_dialog_api.DialogService` contract

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::transport::Channel;

use super::unary;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateDialogRequest {
    #[prost(int32, tag = "1")]
    pub user_id: i32,
    #[prost(int32, tag = "2")]
    pub peer_id: i32,
    #[prost(string, tag = "3")]
    pub dialog_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateDialogResponse {
    #[prost(int32, tag = "1")]
    pub dialog_id: i32,
    #[prost(string, tag = "2")]
    pub dialog_name: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub success: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendMessageRequest {
    #[prost(int32, tag = "1")]
    pub dialog_id: i32,
    #[prost(int32, tag = "2")]
    pub user_id: i32,
    #[prost(string, tag = "3")]
    pub text: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendMessageResponse {
    #[prost(int32, tag = "1")]
    pub message_id: i32,
    #[prost(message, optional, tag = "2")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserDialogsRequest {
    #[prost(int32, tag = "1")]
    pub user_id: i32,
    #[prost(int32, optional, tag = "2")]
    pub limit: ::core::option::Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub offset: ::core::option::Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DialogInfo {
    #[prost(int32, tag = "1")]
    pub dialog_id: i32,
    #[prost(int32, tag = "2")]
    pub peer_id: i32,
    #[prost(string, tag = "3")]
    pub peer_login: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub last_message: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserDialogsResponse {
    #[prost(message, repeated, tag = "1")]
    pub dialogs: ::prost::alloc::vec::Vec<DialogInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetDialogMessagesRequest {
    #[prost(int32, tag = "1")]
    pub dialog_id: i32,
    #[prost(int32, optional, tag = "2")]
    pub limit: ::core::option::Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub offset: ::core::option::Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Message {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(int32, tag = "2")]
    pub user_id: i32,
    #[prost(string, tag = "3")]
    pub text: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "4")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetDialogMessagesResponse {
    #[prost(message, repeated, tag = "1")]
    pub messages: ::prost::alloc::vec::Vec<Message>,
}

/// Operations the gateway needs from the dialog service.
#[async_trait]
pub trait DialogBackend: Send + Sync {
    async fn create_dialog(
        &self,
        request: CreateDialogRequest,
    ) -> Result<CreateDialogResponse, tonic::Status>;

    async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, tonic::Status>;

    async fn get_user_dialogs(
        &self,
        request: GetUserDialogsRequest,
    ) -> Result<GetUserDialogsResponse, tonic::Status>;

    async fn get_dialog_messages(
        &self,
        request: GetDialogMessagesRequest,
    ) -> Result<GetDialogMessagesResponse, tonic::Status>;
}

/// tonic client for the dialog service. Cloning is cheap; all clones share
/// one channel.
#[derive(Clone)]
pub struct DialogClient {
    grpc: Grpc<Channel>,
}

impl DialogClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            grpc: Grpc::new(channel),
        }
    }
}

#[async_trait]
impl DialogBackend for DialogClient {
    async fn create_dialog(
        &self,
        request: CreateDialogRequest,
    ) -> Result<CreateDialogResponse, tonic::Status> {
        unary(
            &self.grpc,
            "/messenger_dialog_api.DialogService/CreateDialog",
            request,
        )
        .await
    }

    async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, tonic::Status> {
        unary(
            &self.grpc,
            "/messenger_dialog_api.DialogService/SendMessage",
            request,
        )
        .await
    }

    async fn get_user_dialogs(
        &self,
        request: GetUserDialogsRequest,
    ) -> Result<GetUserDialogsResponse, tonic::Status> {
        unary(
            &self.grpc,
            "/messenger_dialog_api.DialogService/GetUserDialogs",
            request,
        )
        .await
    }

    async fn get_dialog_messages(
        &self,
        request: GetDialogMessagesRequest,
    ) -> Result<GetDialogMessagesResponse, tonic::Status> {
        unary(
            &self.grpc,
            "/messenger_dialog_api.DialogService/GetDialogMessages",
            request,
        )
        .await
    }
}
