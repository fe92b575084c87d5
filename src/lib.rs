//! # predict-relay
//!
//! A thin relay between a prediction form and an upstream prediction
//! service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  POST /predict  ┌──────────────┐  POST /predict  ┌──────────────┐
//! │ FormHandler  │ ──────────────▶ │ RelayServer  │ ──────────────▶ │   Upstream   │
//! │ (client)     │ ◀────────────── │ (:3000)      │ ◀────────────── │   (:5000)    │
//! └──────────────┘   JSON / error  └──────────────┘   JSON          └──────────────┘
//! ```
//!
//! The relay does not look inside bodies. A request is forwarded byte for
//! byte; a 2xx JSON answer comes back unchanged; anything else becomes
//! `{"error":"Error in making prediction"}` with a 500. There are no
//! retries, timeouts or caches on either hop.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use predict_relay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RelayError> {
//!     let config = RelayConfig::new()
//!         .port(3000)
//!         .upstream_url("http://localhost:5000/predict");
//!
//!     RelayServer::new(config)?.run().await
//! }
//! ```
//!
//! Driving it from a form:
//!
//! ```rust,no_run
//! use predict_relay::prelude::*;
//!
//! # async fn submit() {
//! let handler = FormHandler::new(
//!     FormConfig::product_revenue(),
//!     HttpTransport::new("http://localhost:3000"),
//! );
//! let mut page = MemoryView::new()
//!     .with_field("product", "Widget")
//!     .with_field("units", "3");
//!
//! if handler.submit(&mut page).await == SubmitOutcome::Rendered {
//!     println!("{:?}", page.text("result-revenue"));
//! }
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod proxy;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::client::{
        FieldKind, FormConfig, FormHandler, FormView, HttpTransport, MemoryView, OutputFormat,
        SubmitOutcome, Transport,
    };
    pub use crate::error::{ErrorKind, RelayError};
    pub use crate::http::{Payload, RelayResponse, StatusCode};
    pub use crate::proxy::{HttpUpstream, PredictHandler, Upstream};
    pub use crate::runtime::{RelayConfig, RelayServer};
    pub use async_trait::async_trait;
}

pub use error::RelayError;
pub use proxy::{PredictHandler, Upstream};
pub use runtime::{RelayConfig, RelayServer};
