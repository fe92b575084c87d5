//! The `/predict` handler.

use crate::http::{Payload, RelayRequest, RelayResponse, StatusCode};
use crate::proxy::Upstream;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Body of every failed forward. Callers never see more than this.
pub const PREDICTION_ERROR: &str = "Error in making prediction";

/// Body of a rejected inbound JSON request that is not an object or array.
pub const INVALID_JSON: &str = "Invalid JSON body";

/// Forwards prediction requests to an upstream, one attempt each.
#[derive(Clone)]
pub struct PredictHandler {
    upstream: Arc<dyn Upstream>,
}

impl PredictHandler {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Forward the request body upstream and relay the answer.
    ///
    /// A JSON body goes out byte for byte as received. On success the
    /// upstream body comes back unchanged with a 200; on any upstream
    /// failure the error is logged and the caller gets the fixed 500
    /// envelope.
    pub async fn handle_predict(&self, request: RelayRequest) -> RelayResponse {
        let body = match inbound_body(request) {
            Ok(body) => body,
            Err(response) => return response,
        };

        debug!("Forwarding {} bytes upstream", body.len());

        match self.upstream.predict(body).await {
            Ok(payload) => RelayResponse::json(payload),
            Err(e) => {
                error!("Prediction failed: {}", e);
                RelayResponse::error(StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_ERROR)
            }
        }
    }
}

/// Decide what goes upstream for an inbound request.
///
/// Bodies not declared as `application/json`, and empty bodies, are sent
/// as `{}`. A declared JSON body must be an object or array; anything
/// else is answered with a 400 and never forwarded.
fn inbound_body(request: RelayRequest) -> Result<Payload, RelayResponse> {
    if !request.is_json_content_type() || request.body.is_empty() {
        return Ok(Payload::empty_object());
    }

    if !request.body.is_json_container() {
        warn!(
            "Rejecting request body that is not a JSON object or array ({} bytes)",
            request.body.len()
        );
        return Err(RelayResponse::error(StatusCode::BAD_REQUEST, INVALID_JSON));
    }

    Ok(request.body)
}
