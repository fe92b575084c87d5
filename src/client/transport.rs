//! How the form handler reaches the relay.

use crate::error::RelayError;
use crate::http::{JsonClient, StatusCode};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::Uri;

/// A completed exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: impl Into<StatusCode>, body: impl Into<Bytes>) -> Self {
        Self {
            status: status.into(),
            body: body.into(),
        }
    }

    /// 2xx.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends a JSON body to a path on the relay.
///
/// `Err` means no response arrived at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: Bytes) -> Result<TransportResponse, RelayError>;
}

/// Transport over HTTP to a relay at a base URL such as
/// `http://localhost:3000`.
pub struct HttpTransport {
    base_url: String,
    client: JsonClient,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: JsonClient::new(),
        }
    }

    fn uri_for(&self, path: &str) -> Result<Uri, RelayError> {
        RelayError::parse_uri(&format!("{}{}", self.base_url, path))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: Bytes) -> Result<TransportResponse, RelayError> {
        let uri = self.uri_for(path)?;
        let (status, body) = self.client.post(uri, body).await?;
        Ok(TransportResponse { status, body })
    }
}
