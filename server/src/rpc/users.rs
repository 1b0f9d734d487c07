//! `messenger_users_api.UserService` contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tonic::client::Grpc;
use tonic::transport::Channel;

use super::unary;

/// Registration payload. Also the JSON body of `POST /users/create`, which
/// is forwarded as is; missing fields default to empty strings.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    #[prost(string, tag = "1")]
    pub login: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub first_name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub last_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub email: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub phone: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub password: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct CreateUserResponse {
    #[prost(string, tag = "1")]
    pub success: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserRequest {
    #[prost(int64, optional, tag = "1")]
    pub id: ::core::option::Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub login: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub first_name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub last_name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub email: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "6")]
    pub phone: ::core::option::Option<::prost::alloc::string::String>,
}

impl GetUserRequest {
    pub fn has_filter(&self) -> bool {
        self.id.is_some()
            || self.login.is_some()
            || self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct User {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub login: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub first_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub last_name: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub email: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub phone: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserResponse {
    #[prost(message, repeated, tag = "1")]
    pub users: ::prost::alloc::vec::Vec<User>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub login: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub password: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginResponse {
    #[prost(int64, tag = "1")]
    pub user_id: i64,
    #[prost(string, tag = "2")]
    pub token: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub message: ::prost::alloc::string::String,
}

/// Operations the gateway needs from the user service.
#[async_trait]
pub trait UserBackend: Send + Sync {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, tonic::Status>;

    async fn get_user(&self, request: GetUserRequest) -> Result<GetUserResponse, tonic::Status>;

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, tonic::Status>;
}

#[derive(Clone)]
pub struct UserClient {
    grpc: Grpc<Channel>,
}

impl UserClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            grpc: Grpc::new(channel),
        }
    }
}

#[async_trait]
impl UserBackend for UserClient {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, tonic::Status> {
        unary(&self.grpc, "/messenger_users_api.UserService/CreateUser", request).await
    }

    async fn get_user(&self, request: GetUserRequest) -> Result<GetUserResponse, tonic::Status> {
        unary(&self.grpc, "/messenger_users_api.UserService/GetUser", request).await
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, tonic::Status> {
        unary(&self.grpc, "/messenger_users_api.UserService/Login", request).await
    }
}
