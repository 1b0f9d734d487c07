//! Shared fixtures: stub backends, token minting and request helpers
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use messenger_gateway::{
    auth::TokenValidator,
    build_router,
    proxy::NotificationForwarder,
    rpc::dialog::*,
    rpc::users::*,
    rpc::{DialogBackend, UserBackend},
    session::{SessionError, SessionStore},
    AppState,
};

pub const SECRET: &str = "testsecret";

pub fn token_for(user_id: &str) -> String {
    let claims = json!({
        "user_id": user_id,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn sent_at() -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: 1_714_564_800,
        nanos: 0,
    }
}

// ============================================================================
// Stub backends
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DialogCall {
    Create(CreateDialogRequest),
    Send(SendMessageRequest),
    UserDialogs(GetUserDialogsRequest),
    Messages(GetDialogMessagesRequest),
}

#[derive(Default)]
pub struct StubDialogs {
    pub calls: Mutex<Vec<DialogCall>>,
    pub failure: Option<tonic::Status>,
    pub delay: Option<Duration>,
    pub dialogs: Vec<DialogInfo>,
    pub messages: Vec<Message>,
}

impl StubDialogs {
    pub fn failing(status: tonic::Status) -> Self {
        Self {
            failure: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<DialogCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: DialogCall) -> Result<(), tonic::Status> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DialogBackend for StubDialogs {
    async fn create_dialog(
        &self,
        request: CreateDialogRequest,
    ) -> Result<CreateDialogResponse, tonic::Status> {
        self.record(DialogCall::Create(request.clone())).await?;
        Ok(CreateDialogResponse {
            dialog_id: 10,
            dialog_name: request.dialog_name,
            success: true,
        })
    }

    async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, tonic::Status> {
        self.record(DialogCall::Send(request)).await?;
        Ok(SendMessageResponse {
            message_id: 99,
            timestamp: Some(sent_at()),
        })
    }

    async fn get_user_dialogs(
        &self,
        request: GetUserDialogsRequest,
    ) -> Result<GetUserDialogsResponse, tonic::Status> {
        self.record(DialogCall::UserDialogs(request)).await?;
        Ok(GetUserDialogsResponse {
            dialogs: self.dialogs.clone(),
        })
    }

    async fn get_dialog_messages(
        &self,
        request: GetDialogMessagesRequest,
    ) -> Result<GetDialogMessagesResponse, tonic::Status> {
        self.record(DialogCall::Messages(request)).await?;
        Ok(GetDialogMessagesResponse {
            messages: self.messages.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCall {
    Create(CreateUserRequest),
    Get(GetUserRequest),
    Login(LoginRequest),
}

#[derive(Default)]
pub struct StubUsers {
    pub calls: Mutex<Vec<UserCall>>,
    pub failure: Option<tonic::Status>,
    pub users: Vec<User>,
    pub login_response: LoginResponse,
}

impl StubUsers {
    pub fn failing(status: tonic::Status) -> Self {
        Self {
            failure: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<UserCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: UserCall) -> Result<(), tonic::Status> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserBackend for StubUsers {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, tonic::Status> {
        self.record(UserCall::Create(request))?;
        Ok(CreateUserResponse {
            success: "99".to_string(),
        })
    }

    async fn get_user(&self, request: GetUserRequest) -> Result<GetUserResponse, tonic::Status> {
        self.record(UserCall::Get(request))?;
        Ok(GetUserResponse {
            users: self.users.clone(),
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, tonic::Status> {
        self.record(UserCall::Login(request))?;
        Ok(self.login_response.clone())
    }
}

#[derive(Default)]
pub struct StubSessions {
    pub stored: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl StubSessions {
    pub fn stored(&self) -> Vec<(String, String)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for StubSessions {
    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), SessionError> {
        if self.fail {
            return Err(SessionError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection refused",
            ))));
        }
        self.stored
            .lock()
            .unwrap()
            .push((messenger_gateway::session::token_key(user_id), token.to_string()));
        Ok(())
    }
}

// ============================================================================
// Application under test
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub dialogs: Arc<StubDialogs>,
    pub users: Arc<StubUsers>,
    pub sessions: Arc<StubSessions>,
}

pub struct TestAppBuilder {
    dialogs: StubDialogs,
    users: StubUsers,
    sessions: StubSessions,
    notifications_url: String,
    rpc_timeout: Duration,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            dialogs: StubDialogs::default(),
            users: StubUsers::default(),
            sessions: StubSessions::default(),
            notifications_url: "http://127.0.0.1:9/notifications".to_string(),
            rpc_timeout: Duration::from_secs(5),
        }
    }
}

impl TestAppBuilder {
    pub fn dialogs(mut self, dialogs: StubDialogs) -> Self {
        self.dialogs = dialogs;
        self
    }

    pub fn users(mut self, users: StubUsers) -> Self {
        self.users = users;
        self
    }

    pub fn sessions(mut self, sessions: StubSessions) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn notifications_url(mut self, url: impl Into<String>) -> Self {
        self.notifications_url = url.into();
        self
    }

    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn build(self) -> TestApp {
        let dialogs = Arc::new(self.dialogs);
        let users = Arc::new(self.users);
        let sessions = Arc::new(self.sessions);

        let state = AppState {
            validator: Arc::new(TokenValidator::new(SECRET)),
            dialogs: dialogs.clone(),
            users: users.clone(),
            sessions: sessions.clone(),
            notifications: Arc::new(NotificationForwarder::with_client(
                reqwest::Client::new(),
                &self.notifications_url,
            )),
            rpc_timeout: self.rpc_timeout,
        };

        TestApp {
            router: build_router(state),
            dialogs,
            users,
            sessions,
        }
    }
}

pub fn app() -> TestApp {
    TestAppBuilder::default().build()
}

// ============================================================================
// Request helpers
// ============================================================================

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, Body::empty())
}

pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    post_raw(uri, token, body.to_string())
}

pub fn post_raw(uri: &str, token: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut req = request("POST", uri, token, body.into());
    req.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        "application/json".parse().unwrap(),
    );
    req
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(body).unwrap()
}

/// Sends a request through the router and decodes the JSON body
/// (`Value::Null` for an empty body).
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
