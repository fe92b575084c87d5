//! The upstream prediction service seen from the relay.

use crate::error::RelayError;
use crate::http::{JsonClient, Payload};
use async_trait::async_trait;
use hyper::Uri;

/// An upstream that turns a prediction request body into a response body.
///
/// Implementations return `Err` for anything that is not a 2xx answer
/// carrying a JSON body.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn predict(&self, payload: Payload) -> Result<Payload, RelayError>;
}

/// Upstream reached over HTTP at a fixed URL.
pub struct HttpUpstream {
    client: JsonClient,
    uri: Uri,
}

impl HttpUpstream {
    /// Create an upstream posting to `url`, e.g. `http://localhost:5000/predict`.
    pub fn new(url: &str) -> Result<Self, RelayError> {
        let uri = RelayError::parse_uri(url)?;
        Ok(Self {
            client: JsonClient::new(),
            uri,
        })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn predict(&self, payload: Payload) -> Result<Payload, RelayError> {
        let (status, body) = self
            .client
            .post(self.uri.clone(), payload.into_bytes())
            .await?;

        if !status.is_success() {
            return Err(RelayError::status(
                status.0,
                format!(
                    "upstream {} answered {}: {}",
                    self.uri,
                    status.0,
                    String::from_utf8_lossy(&body)
                ),
            ));
        }

        let payload = Payload::from(body);
        if !payload.is_json() {
            return Err(RelayError::malformed(format!(
                "upstream {} answered with a non-JSON body ({} bytes)",
                self.uri,
                payload.len()
            )));
        }

        Ok(payload)
    }
}
