//! Form handler configuration and the two form presets.

use serde::{Deserialize, Serialize};

/// How a raw field value is coerced before it goes into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Sent as the string typed into the form.
    Text,
    /// Leading-integer parse; unparseable input becomes `null`.
    Integer,
    /// Leading-float parse; unparseable input becomes `null`.
    Float,
}

/// A named input of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Element name, also used as the request key.
    pub name: String,
    pub kind: FieldKind,
}

/// How a response value is written into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered as-is.
    Plain,
    /// Rendered as `$` followed by the number with two decimals.
    Currency,
}

/// Maps one response key to the element that displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBinding {
    /// Key looked up in the response body.
    pub key: String,
    /// Element whose text receives the value.
    pub element: String,
    pub format: OutputFormat,
}

/// Everything that distinguishes one form variant from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Path the request is POSTed to.
    pub endpoint: String,
    /// Inputs read on submit, in request order.
    pub fields: Vec<FieldSpec>,
    /// Values written into the page on success.
    pub outputs: Vec<OutputBinding>,
    /// Container revealed once the outputs are written.
    pub result_container: String,
    /// Skip submits while a previous one is still in flight.
    #[serde(default)]
    pub guard_in_flight: bool,
}

impl FormConfig {
    /// Create an empty config posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fields: Vec::new(),
            outputs: Vec::new(),
            result_container: "result".to_string(),
            guard_in_flight: false,
        }
    }

    /// Add an input field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
        });
        self
    }

    /// Add an output binding.
    pub fn output(
        mut self,
        key: impl Into<String>,
        element: impl Into<String>,
        format: OutputFormat,
    ) -> Self {
        self.outputs.push(OutputBinding {
            key: key.into(),
            element: element.into(),
            format,
        });
        self
    }

    /// Set the result container element.
    pub fn result_container(mut self, id: impl Into<String>) -> Self {
        self.result_container = id.into();
        self
    }

    /// Enable or disable the in-flight guard.
    pub fn guard_in_flight(mut self, enabled: bool) -> Self {
        self.guard_in_flight = enabled;
        self
    }

    /// The store sales form: calendar, store and weather features, one
    /// currency prediction back.
    pub fn sales_forecast() -> Self {
        Self::new("/predict")
            .field("day_of_week", FieldKind::Text)
            .field("month", FieldKind::Integer)
            .field("category", FieldKind::Text)
            .field("store_id", FieldKind::Text)
            .field("weather_condition", FieldKind::Text)
            .field("avg_price", FieldKind::Float)
            .field("is_weekend", FieldKind::Integer)
            .field("is_holiday", FieldKind::Integer)
            .field("promotion_active", FieldKind::Integer)
            .field("temperature", FieldKind::Float)
            .output("prediction", "prediction-value", OutputFormat::Currency)
    }

    /// The product form: product and units in, product/units/revenue back.
    pub fn product_revenue() -> Self {
        Self::new("/predict")
            .field("product", FieldKind::Text)
            .field("units", FieldKind::Integer)
            .output("product", "result-product", OutputFormat::Plain)
            .output("units", "result-units", OutputFormat::Plain)
            .output("revenue", "result-revenue", OutputFormat::Currency)
    }
}
