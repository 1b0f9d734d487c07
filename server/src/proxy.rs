//! Streaming reverse proxy to the notification service
//!
//! Requests under [`MOUNT_POINT`] are relayed to the configured base URL with
//! the remaining path appended and the caller's identity added as the
//! `userID` query parameter. Bodies are streamed in both directions and
//! never inspected.

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{
        header::{
            CONNECTION, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER,
            TRANSFER_ENCODING, UPGRADE,
        },
        HeaderMap, HeaderName,
    },
    response::Response,
};
use url::Url;

use crate::config::NotificationsConfig;
use crate::error::{AppError, Result};
use crate::handlers::Identity;

pub const MOUNT_POINT: &str = "/notifications";
pub const IDENTITY_PARAM: &str = "userID";

/// Removes hop-by-hop headers (RFC 9110 section 7.6.1), including any named
/// in `Connection`. They describe a single connection and are never relayed.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in [
        CONNECTION,
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        UPGRADE,
    ] {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
}

pub struct NotificationForwarder {
    client: reqwest::Client,
    base_url: String,
}

impl NotificationForwarder {
    pub fn new(config: &NotificationsConfig) -> anyhow::Result<Self> {
        // No overall timeout: long-poll requests stay open.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the upstream URL for a path suffix. Client-supplied `userID`
    /// values are dropped before the caller's identity is appended.
    pub fn upstream_url(
        &self,
        suffix: &str,
        query: Option<&str>,
        identity: &Identity,
    ) -> std::result::Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, suffix))?;

        let preserved: Vec<(String, String)> = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .filter(|(k, _)| k != IDENTITY_PARAM)
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        url.query_pairs_mut()
            .extend_pairs(preserved)
            .append_pair(IDENTITY_PARAM, identity.as_str());

        Ok(url)
    }

    pub async fn forward(&self, identity: &Identity, req: Request) -> Result<Response> {
        let (parts, body) = req.into_parts();

        let suffix = parts.uri.path().strip_prefix(MOUNT_POINT).unwrap_or_default();
        let url = self
            .upstream_url(suffix, parts.uri.query(), identity)
            .map_err(|e| AppError::Internal(e.into()))?;

        tracing::debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            upstream = %url,
            "Proxying notification request"
        );

        let mut headers = parts.headers;
        headers.remove(HOST);
        strip_hop_by_hop(&mut headers);

        let mut upstream_req = self.client.request(parts.method, url).headers(headers);
        if body.size_hint().exact() != Some(0) {
            upstream_req = upstream_req.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = upstream_req.send().await.map_err(AppError::BadGateway)?;

        tracing::info!(status = %upstream.status(), "Notification upstream responded");

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
