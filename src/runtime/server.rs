//! Relay HTTP server.

use crate::error::RelayError;
use crate::http::{Method, Payload, RelayRequest, RelayResponse, StatusCode};
use crate::proxy::{HttpUpstream, PredictHandler, Upstream};
use crate::runtime::RelayConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn, Instrument};

/// Relay server.
///
/// Serves a single `POST` route and forwards each request to the
/// configured upstream. Connections are handled independently; nothing
/// mutable is shared between them.
pub struct RelayServer {
    /// Server configuration.
    config: RelayConfig,
    /// Handler for the prediction route.
    handler: PredictHandler,
}

/// A relay server whose listener is already bound.
pub struct BoundRelay {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Arc<RelayConfig>,
    handler: PredictHandler,
}

impl RelayServer {
    /// Create a relay forwarding to `config.upstream_url` over HTTP.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let upstream = HttpUpstream::new(&config.upstream_url)?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Create a relay forwarding to an arbitrary upstream.
    pub fn with_upstream(config: RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config,
            handler: PredictHandler::new(upstream),
        }
    }

    /// Bind the listening socket.
    pub async fn bind(self) -> Result<BoundRelay, RelayError> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;

        Ok(BoundRelay {
            listener,
            local_addr,
            config: Arc::new(self.config),
            handler: self.handler,
        })
    }

    /// Bind and serve until the accept loop fails.
    pub async fn run(self) -> Result<(), RelayError> {
        self.bind().await?.serve().await
    }
}

impl BoundRelay {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop.
    pub async fn serve(self) -> Result<(), RelayError> {
        info!(
            "Server is running on http://localhost:{}",
            self.local_addr.port()
        );
        info!(
            "Forwarding POST {} to {}",
            self.config.route, self.config.upstream_url
        );

        loop {
            let (stream, remote_addr) = self.listener.accept().await?;
            let io = TokioIo::new(stream);

            let handler = self.handler.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let handler = handler.clone();
                    let config = config.clone();
                    async move { handle_request(req, handler, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    handler: PredictHandler,
    config: Arc<RelayConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let request_id = generate_request_id();
    let span = tracing::info_span!("request", id = %request_id);

    async move {
        debug!("{} {} from {}", req.method(), req.uri().path(), remote_addr);

        let request = convert_request(req).await?;
        let response = route_request(request, &handler, &config).await;

        debug!("Responding {}", response.status.0);
        Ok(build_response(response))
    }
    .instrument(span)
    .await
}

/// Dispatch a collected request to the prediction route or a 404.
pub(crate) async fn route_request(
    request: RelayRequest,
    handler: &PredictHandler,
    config: &RelayConfig,
) -> RelayResponse {
    if request.method == Method::Post && route_matches(&request.path, &config.route) {
        return handler.handle_predict(request).await;
    }

    RelayResponse::text(
        StatusCode::NOT_FOUND,
        format!("Cannot {} {}", request.method, request.path),
    )
}

/// Exact match, tolerating one trailing slash on the request path.
fn route_matches(path: &str, route: &str) -> bool {
    path == route || path.strip_suffix('/') == Some(route)
}

/// Convert a hyper Request into a RelayRequest by collecting its body.
async fn convert_request(req: Request<Incoming>) -> Result<RelayRequest, hyper::Error> {
    let method = Method::from(req.method());
    let path = req.uri().path().to_string();

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body = req.collect().await?.to_bytes();

    Ok(RelayRequest {
        method,
        path,
        headers,
        body: Payload::from(body),
    })
}

/// Build a hyper Response from a RelayResponse.
fn build_response(relay_response: RelayResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(relay_response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            relay_response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut response = Response::new(Full::new(relay_response.body));
    *response.status_mut() = status;

    for (name, value) in relay_response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header {}", name),
        }
    }

    response
}

/// Generate a request ID for log correlation.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoUpstream;

    #[async_trait]
    impl Upstream for EchoUpstream {
        async fn predict(&self, payload: Payload) -> Result<Payload, RelayError> {
            Ok(payload)
        }
    }

    fn handler() -> PredictHandler {
        PredictHandler::new(Arc::new(EchoUpstream))
    }

    #[tokio::test]
    async fn test_post_to_route_is_forwarded() {
        let config = RelayConfig::default();
        let request = RelayRequest::new(Method::Post, "/predict")
            .header("Content-Type", "application/json")
            .body(r#"{"units":2}"#);

        let response = route_request(request, &handler(), &config).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text_body(), r#"{"units":2}"#);
    }

    #[tokio::test]
    async fn test_trailing_slash_is_tolerated() {
        let config = RelayConfig::default();
        let request = RelayRequest::new(Method::Post, "/predict/").body("{}");

        let response = route_request(request, &handler(), &config).await;

        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_routes_are_not_found() {
        let config = RelayConfig::default();

        let response =
            route_request(RelayRequest::new(Method::Get, "/predict"), &handler(), &config).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.text_body(), "Cannot GET /predict");

        let request = RelayRequest::new(Method::Post, "/train").body("{}");
        let response = route_request(request, &handler(), &config).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.text_body(), "Cannot POST /train");
    }

    #[test]
    fn test_build_response_copies_status_and_headers() {
        let response = build_response(RelayResponse::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error in making prediction",
        ));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_build_response_invalid_status_falls_back() {
        let response = build_response(RelayResponse::new(StatusCode(1000)));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
