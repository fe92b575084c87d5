//! Form submission handler.

use crate::client::config::FormConfig;
use crate::client::payload::{build_payload, render_output};
use crate::client::transport::Transport;
use crate::client::view::FormView;
use crate::http::Payload;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

/// Alert shown whenever no usable answer came back.
pub const GENERIC_FAILURE: &str =
    "An error occurred while making the prediction. Please try again.";

/// What a submit did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Outputs written and the result container revealed.
    Rendered,
    /// The answer carried an `error`; it was alerted verbatim.
    Rejected(String),
    /// No usable answer; the generic alert was shown.
    Failed,
    /// Dropped by the in-flight guard; nothing was sent.
    Skipped,
}

/// Handles submissions of one form variant.
///
/// Built once when the page loads; each call to [`FormHandler::submit`]
/// is one form submission. Without the in-flight guard, overlapping
/// submits all go out and whichever settles last leaves its result on the
/// page.
pub struct FormHandler<T> {
    config: FormConfig,
    transport: T,
    in_flight: AtomicBool,
}

impl<T: Transport> FormHandler<T> {
    pub fn new(config: FormConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Request body for the current page state.
    pub fn build_request<V: FormView + ?Sized>(&self, view: &V) -> Map<String, Value> {
        build_payload(&self.config, |name| view.field_value(name))
    }

    /// Submit the form once.
    pub async fn submit<V: FormView + ?Sized>(&self, view: &mut V) -> SubmitOutcome {
        let _guard = if self.config.guard_in_flight {
            match InFlight::acquire(&self.in_flight) {
                Some(guard) => Some(guard),
                None => {
                    debug!("Submit ignored, previous request still in flight");
                    return SubmitOutcome::Skipped;
                }
            }
        } else {
            None
        };

        let body = match Payload::from_json(&Value::Object(self.build_request(&*view))) {
            Ok(payload) => payload.into_bytes(),
            Err(e) => return fail(view, format!("could not encode request: {}", e)),
        };

        let response = match self
            .transport
            .post_json(&self.config.endpoint, body)
            .await
        {
            Ok(response) => response,
            Err(e) => return fail(view, format!("request failed: {}", e)),
        };

        if !response.ok() {
            return fail(
                view,
                format!("relay answered with status {}", response.status.0),
            );
        }

        let data: Value = match serde_json::from_slice(&response.body) {
            Ok(data) => data,
            Err(e) => return fail(view, format!("response is not JSON: {}", e)),
        };

        if let Some(message) = data.get("error").filter(|v| is_truthy(v)) {
            let message = match message {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            view.alert(&format!("Error: {}", message));
            return SubmitOutcome::Rejected(message);
        }

        let rendered: Option<Vec<(&str, String)>> = self
            .config
            .outputs
            .iter()
            .map(|binding| {
                render_output(binding, &data).map(|text| (binding.element.as_str(), text))
            })
            .collect();

        let Some(rendered) = rendered else {
            return fail(view, format!("response has no usable result: {}", data));
        };

        for (element, text) in rendered {
            view.set_text(element, &text);
        }
        view.reveal(&self.config.result_container);

        SubmitOutcome::Rendered
    }
}

fn fail<V: FormView + ?Sized>(view: &mut V, detail: String) -> SubmitOutcome {
    error!("Prediction request failed: {}", detail);
    view.alert(GENERIC_FAILURE);
    SubmitOutcome::Failed
}

/// Browser truthiness: `null`, `false`, `0` and `""` do not count.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Holds the in-flight flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportResponse;
    use crate::client::view::MemoryView;
    use crate::error::{ErrorKind, RelayError};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Answers every post with the same scripted reply and records bodies.
    struct MockTransport {
        reply: Result<(u16, &'static str), ErrorKind>,
        sent: Mutex<Vec<(String, Bytes)>>,
    }

    impl MockTransport {
        fn answering(status: u16, body: &'static str) -> Self {
            Self {
                reply: Ok((status, body)),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            Self {
                reply: Err(ErrorKind::Connect),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_json(&self) -> Vec<Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, body)| serde_json::from_slice(body).unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(
            &self,
            path: &str,
            body: Bytes,
        ) -> Result<TransportResponse, RelayError> {
            self.sent.lock().unwrap().push((path.to_string(), body));
            match self.reply {
                Ok((status, body)) => Ok(TransportResponse::new(status, body)),
                Err(kind) => Err(RelayError::new(kind, "connection refused")),
            }
        }
    }

    fn sales_view() -> MemoryView {
        MemoryView::new()
            .with_field("day_of_week", "Mon")
            .with_field("month", "7")
            .with_field("category", "A")
            .with_field("store_id", "S1")
            .with_field("weather_condition", "Sunny")
            .with_field("avg_price", "9.99")
            .with_field("is_weekend", "0")
            .with_field("is_holiday", "0")
            .with_field("promotion_active", "1")
            .with_field("temperature", "72.5")
    }

    #[tokio::test]
    async fn test_submit_posts_coerced_body_to_endpoint() {
        let handler = FormHandler::new(
            FormConfig::sales_forecast(),
            MockTransport::answering(200, r#"{"prediction": 42.5}"#),
        );
        let mut view = sales_view();

        handler.submit(&mut view).await;

        let sent = handler.transport.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "/predict");

        let body: Value = serde_json::from_slice(&sent[0].1).unwrap();
        assert_eq!(body["month"], 7);
        assert_eq!(body["is_weekend"], 0);
        assert_eq!(body["promotion_active"], 1);
        assert_eq!(body["avg_price"], 9.99);
        assert_eq!(body["temperature"], 72.5);
        assert!(body["avg_price"].is_f64());
        assert_eq!(body["store_id"], "S1");
    }

    #[tokio::test]
    async fn test_success_renders_currency_and_reveals_result() {
        let handler = FormHandler::new(
            FormConfig::sales_forecast(),
            MockTransport::answering(200, r#"{"prediction": 42.5}"#),
        );
        let mut view = sales_view();

        let outcome = handler.submit(&mut view).await;

        assert_eq!(outcome, SubmitOutcome::Rendered);
        assert!(view.is_visible("result"));
        assert_eq!(view.text("prediction-value"), Some("$42.50"));
        assert!(view.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_product_form_renders_all_outputs() {
        let handler = FormHandler::new(
            FormConfig::product_revenue(),
            MockTransport::answering(200, r#"{"product":"Widget","units":3,"revenue":30}"#),
        );
        let mut view = MemoryView::new()
            .with_field("product", "Widget")
            .with_field("units", "3");

        let outcome = handler.submit(&mut view).await;

        assert_eq!(outcome, SubmitOutcome::Rendered);
        assert_eq!(view.text("result-product"), Some("Widget"));
        assert_eq!(view.text("result-units"), Some("3"));
        assert_eq!(view.text("result-revenue"), Some("$30.00"));
        assert_eq!(
            handler.transport.sent_json(),
            vec![serde_json::json!({"product": "Widget", "units": 3})]
        );
    }

    #[tokio::test]
    async fn test_error_field_is_alerted_and_result_stays_hidden() {
        let handler = FormHandler::new(
            FormConfig::sales_forecast(),
            MockTransport::answering(200, r#"{"error":"bad input"}"#),
        );
        let mut view = sales_view();

        let outcome = handler.submit(&mut view).await;

        assert_eq!(outcome, SubmitOutcome::Rejected("bad input".to_string()));
        assert_eq!(view.alerts.len(), 1);
        assert!(view.alerts[0].contains("bad input"));
        assert!(!view.is_visible("result"));
    }

    #[tokio::test]
    async fn test_network_failure_shows_generic_alert() {
        let handler = FormHandler::new(FormConfig::sales_forecast(), MockTransport::rejecting());
        let mut view = sales_view();

        let outcome = handler.submit(&mut view).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(view.alerts, vec![GENERIC_FAILURE.to_string()]);
        assert!(!view.is_visible("result"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_generic_failure_even_with_error_body() {
        let handler = FormHandler::new(
            FormConfig::sales_forecast(),
            MockTransport::answering(500, r#"{"error":"Error in making prediction"}"#),
        );
        let mut view = sales_view();

        let outcome = handler.submit(&mut view).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(view.alerts, vec![GENERIC_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn test_unusable_success_body_is_generic_failure() {
        for body in ["not json", r#"{"prediction": "high"}"#, "{}"] {
            let handler = FormHandler::new(
                FormConfig::sales_forecast(),
                MockTransport::answering(200, body),
            );
            let mut view = sales_view();

            assert_eq!(handler.submit(&mut view).await, SubmitOutcome::Failed);
            assert!(!view.is_visible("result"));
            assert!(view.text("prediction-value").is_none());
        }
    }

    #[tokio::test]
    async fn test_falsy_error_is_ignored() {
        let handler = FormHandler::new(
            FormConfig::sales_forecast(),
            MockTransport::answering(200, r#"{"error": null, "prediction": 1}"#),
        );
        let mut view = sales_view();

        assert_eq!(handler.submit(&mut view).await, SubmitOutcome::Rendered);
        assert_eq!(view.text("prediction-value"), Some("$1.00"));
    }

    /// Holds every request until released.
    struct GatedTransport {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn post_json(
            &self,
            _path: &str,
            _body: Bytes,
        ) -> Result<TransportResponse, RelayError> {
            self.gate.notified().await;
            Ok(TransportResponse::new(200, r#"{"prediction": 5}"#))
        }
    }

    #[tokio::test]
    async fn test_in_flight_guard_skips_overlapping_submit() {
        let gate = Arc::new(Notify::new());
        let handler = Arc::new(FormHandler::new(
            FormConfig::sales_forecast().guard_in_flight(true),
            GatedTransport { gate: gate.clone() },
        ));

        let first = tokio::spawn({
            let handler = handler.clone();
            async move {
                let mut view = sales_view();
                handler.submit(&mut view).await
            }
        });

        // wait until the first submit holds the flag
        while !handler.in_flight.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        let mut second_view = sales_view();
        assert_eq!(
            handler.submit(&mut second_view).await,
            SubmitOutcome::Skipped
        );

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Rendered);
        assert!(!handler.in_flight.load(Ordering::Acquire));
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(is_truthy(&serde_json::json!("bad input")));
        assert!(is_truthy(&serde_json::json!({})));
    }
}
