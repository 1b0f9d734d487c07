//! gRPC contracts of the dialog and user services
//!
//! Messages are declared directly with `prost` derives so the build does not
//! need `protoc`. Field tags must stay in sync with the services' `.proto`
//! definitions. Handlers only see the [`DialogBackend`] and [`UserBackend`]
//! traits; the tonic clients below are one implementation of them.

pub mod dialog;
pub mod users;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tonic::client::Grpc;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};

pub use dialog::{DialogBackend, DialogClient};
pub use users::{UserBackend, UserClient};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("rpc failed: {0}")]
    Status(#[from] tonic::Status),

    #[error("rpc deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// Runs a backend call under its own deadline. Dropping the call on expiry
/// cancels the underlying RPC.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, tonic::Status>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(BackendError::Status),
        Err(_) => Err(BackendError::DeadlineExceeded(deadline)),
    }
}

/// Creates a channel that connects on first use, so the gateway can start
/// before its backends are up.
pub fn lazy_channel(url: &str, connect_timeout: Duration) -> anyhow::Result<Channel> {
    let endpoint = Endpoint::from_shared(url.to_string())?.connect_timeout(connect_timeout);
    Ok(endpoint.connect_lazy())
}

async fn unary<Req, Resp>(
    grpc: &Grpc<Channel>,
    path: &'static str,
    request: Req,
) -> Result<Resp, tonic::Status>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    let mut grpc = grpc.clone();
    grpc.ready()
        .await
        .map_err(|e| tonic::Status::unavailable(format!("service was not ready: {}", e)))?;

    let codec = tonic::codec::ProstCodec::<Req, Resp>::default();
    let response = grpc
        .unary(
            tonic::Request::new(request),
            PathAndQuery::from_static(path),
            codec,
        )
        .await?;

    Ok(response.into_inner())
}
