//! Prediction proxy: forwards one JSON body upstream and relays the answer.

pub mod handler;
pub mod upstream;

pub use handler::{PredictHandler, INVALID_JSON, PREDICTION_ERROR};
pub use upstream::{HttpUpstream, Upstream};
