//! Inbound request type seen by the relay handlers.

use crate::http::Payload;
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Any method without a dedicated variant, kept verbatim.
    Other(String),
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
            Method::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        match *method {
            hyper::Method::GET => Method::Get,
            hyper::Method::POST => Method::Post,
            hyper::Method::PUT => Method::Put,
            hyper::Method::DELETE => Method::Delete,
            hyper::Method::PATCH => Method::Patch,
            hyper::Method::HEAD => Method::Head,
            hyper::Method::OPTIONS => Method::Options,
            ref other => Method::Other(other.as_str().to_string()),
        }
    }
}

/// Request as it arrives at the relay, after the body has been collected.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub body: Payload,
}

impl RelayRequest {
    /// Create a new request with an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Payload::default(),
        }
    }

    /// Add a header to the request. Header names are stored lowercased.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Payload>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value, case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&String> {
        self.headers.get(&key.to_ascii_lowercase())
    }

    /// Whether the declared media type is `application/json`, ignoring
    /// parameters such as `charset`.
    pub fn is_json_content_type(&self) -> bool {
        self.get_header("content-type")
            .and_then(|value| value.split(';').next())
            .map(|media| media.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_is_kept_verbatim() {
        let method = hyper::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from(&method).to_string(), "PURGE");
        assert_eq!(Method::from(&hyper::Method::POST), Method::Post);
    }

    #[test]
    fn test_json_content_type() {
        let json = |value: &str| {
            RelayRequest::new(Method::Post, "/predict")
                .header("Content-Type", value)
                .is_json_content_type()
        };
        assert!(json("application/json"));
        assert!(json("application/json; charset=utf-8"));
        assert!(json("Application/JSON"));
        assert!(!json("text/plain"));
        assert!(!json("application/x-www-form-urlencoded"));
        assert!(!RelayRequest::new(Method::Post, "/predict").is_json_content_type());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = RelayRequest::new(Method::Post, "/predict")
            .header("Content-Type", "application/json");
        assert_eq!(
            request.get_header("content-type"),
            Some(&"application/json".to_string())
        );
    }
}
