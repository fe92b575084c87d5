//! Outbound JSON POST client shared by the upstream forwarder and the
//! form transport.

use crate::error::{ErrorKind, RelayError};
use crate::http::StatusCode;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

/// Pooled HTTP/1 client that POSTs JSON bodies.
///
/// Plain `http://` only; there is no TLS connector, which is why
/// [`RelayError::parse_uri`] refuses other schemes. Cloning is cheap and shares the connection pool. No timeout is set;
/// a peer that never answers keeps the call pending.
#[derive(Clone)]
pub struct JsonClient {
    inner: Client<HttpConnector, Full<Bytes>>,
}

impl JsonClient {
    pub fn new() -> Self {
        Self {
            inner: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    /// POST `body` to `uri` and collect the full response.
    ///
    /// Returns the status and body whatever the status is; deciding what
    /// counts as failure is left to the caller.
    pub async fn post(&self, uri: Uri, body: Bytes) -> Result<(StatusCode, Bytes), RelayError> {
        debug!("POST {} ({} bytes)", uri, body.len());

        let request = Request::builder()
            .method(hyper::Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(body))
            .map_err(|e| RelayError::new(ErrorKind::Request, e.to_string()))?;

        let response = self.inner.request(request).await?;
        let status = StatusCode(response.status().as_u16());
        let body = response.into_body().collect().await?.to_bytes();

        Ok((status, body))
    }
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new()
    }
}
