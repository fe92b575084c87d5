//! Form handler: turns a form submission into a relay request and the
//! answer into page updates.
//!
//! The page itself sits behind [`FormView`] and the network behind
//! [`Transport`], so a handler runs the same against a browser binding,
//! an in-memory page, or a test double.

pub mod config;
pub mod handler;
pub mod payload;
pub mod transport;
pub mod view;

pub use config::{FieldKind, FieldSpec, FormConfig, OutputBinding, OutputFormat};
pub use handler::{FormHandler, SubmitOutcome, GENERIC_FAILURE};
pub use payload::build_payload;
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use view::{FormView, MemoryView};
