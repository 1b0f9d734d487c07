//! Session cache for tokens issued at login

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session cache error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("session cache did not answer within {0:?}")]
    Timeout(Duration),
}

/// Write side of the session cache. The gateway never reads tokens back.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), SessionError>;
}

pub fn token_key(user_id: i64) -> String {
    format!("token:{}", user_id)
}

/// Redis-backed store. The connection is opened on first use and then
/// shared; `ConnectionManager` reconnects on its own.
pub struct RedisSessionStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    ttl_secs: Option<u64>,
}

impl RedisSessionStore {
    pub fn new(url: &str, ttl_secs: Option<u64>) -> Result<Self, SessionError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            conn: OnceCell::new(),
            ttl_secs,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, SessionError> {
        let conn = self
            .conn
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let key = token_key(user_id);

        match self.ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(&key, token, ttl).await?,
            None => conn.set::<_, _, ()>(&key, token).await?,
        }

        tracing::debug!(user_id = user_id, ttl_secs = ?self.ttl_secs, "Stored session token");
        Ok(())
    }
}
