//! Opaque JSON body carried through the relay untouched.
//!
//! The relay deliberately has no schema for prediction requests or
//! responses. A [`Payload`] is just the bytes that arrived; the only
//! question ever asked of it is whether those bytes are well-formed JSON.

use bytes::Bytes;
use serde::de::IgnoredAny;

/// Raw JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// The `{}` body used when a request arrives with no body at all.
    pub fn empty_object() -> Self {
        Self(Bytes::from_static(b"{}"))
    }

    /// Serialize a value into a payload.
    pub fn from_json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self::from_bytes)
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check that the body parses as a single JSON document.
    ///
    /// Nothing is retained from the parse.
    pub fn is_json(&self) -> bool {
        serde_json::from_slice::<IgnoredAny>(&self.0).is_ok()
    }

    /// Check that the body is a JSON object or array.
    ///
    /// Top-level scalars such as `42`, `null` or `"x"` do not pass, nor
    /// does a body of only whitespace.
    pub fn is_json_container(&self) -> bool {
        let first = self
            .0
            .iter()
            .copied()
            .find(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
        matches!(first, Some(b'{') | Some(b'[')) && self.is_json()
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0).to_string()
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<&'static str> for Payload {
    fn from(text: &'static str) -> Self {
        Self(Bytes::from_static(text.as_bytes()))
    }
}
