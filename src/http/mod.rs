//! HTTP value types shared by the relay and the form client.

mod outbound;
mod payload;
mod request;
mod response;

pub use outbound::JsonClient;
pub use payload::Payload;
pub use request::{Method, RelayRequest};
pub use response::{RelayResponse, StatusCode};
