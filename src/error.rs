//! Error type for outbound calls made by the relay and the form client.

/// What went wrong with an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The peer could not be reached or the connection dropped.
    Connect,
    /// The peer answered with a non-2xx status.
    Status(u16),
    /// The peer answered 2xx but the body was not JSON.
    MalformedBody,
    /// Reading a body off the wire failed.
    Body,
    /// The configured URL is not a valid absolute `http://` URI.
    InvalidUrl,
    /// An outbound request could not be assembled.
    Request,
    /// Local I/O failure (binding, accepting).
    Io,
}

/// Relay error type.
#[derive(Debug, Clone)]
pub struct RelayError {
    /// Error category.
    pub kind: ErrorKind,
    /// Error message, for logs only.
    pub message: String,
}

impl RelayError {
    /// Create a new RelayError.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a non-success status error.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Status(code), message)
    }

    /// Create a malformed body error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedBody, message)
    }

    /// Create an invalid URL error.
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUrl, message)
    }

    /// Parse an absolute `http://` URL into a URI.
    ///
    /// The outbound client has no TLS connector, so other schemes are
    /// refused here rather than failing on every call.
    pub fn parse_uri(url: &str) -> Result<hyper::Uri, RelayError> {
        let uri: hyper::Uri = url
            .parse()
            .map_err(|e| RelayError::invalid_url(format!("{}: {}", url, e)))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(RelayError::invalid_url(format!("url must be absolute: {}", url)));
        }
        if uri.scheme_str() != Some("http") {
            return Err(RelayError::invalid_url(format!(
                "only http:// urls are supported: {}",
                url
            )));
        }
        Ok(uri)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Connect => write!(f, "connect"),
            ErrorKind::Status(code) => write!(f, "status {}", code),
            ErrorKind::MalformedBody => write!(f, "malformed body"),
            ErrorKind::Body => write!(f, "body"),
            ErrorKind::InvalidUrl => write!(f, "invalid url"),
            ErrorKind::Request => write!(f, "request"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for RelayError {}

impl From<hyper_util::client::legacy::Error> for RelayError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        RelayError::new(ErrorKind::Connect, format!("{:?}", err))
    }
}

impl From<hyper::Error> for RelayError {
    fn from(err: hyper::Error) -> Self {
        RelayError::new(ErrorKind::Body, err.to_string())
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::new(ErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::malformed(err.to_string())
    }
}
