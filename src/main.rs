//! Relay server binary: listens on :3000 and forwards `POST /predict` to
//! the prediction service on :5000.

use predict_relay::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::default();
    let server = RelayServer::new(config)?;

    server.run().await
}
