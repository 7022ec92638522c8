//! HTTP transport abstraction.
//!
//! The client core never speaks HTTP itself; it builds an [`HttpRequest`]
//! and hands it to an injected [`Transport`]. Production code uses a
//! reqwest-backed implementation; tests inject in-memory mocks.

use async_trait::async_trait;
use serde_json::Value;

/// A fully-resolved outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (`GET`, `POST`, ...).
    pub method: String,
    /// Absolute request URL, query string included.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Body payload. Structured objects are JSON-encoded by the pipeline
    /// before reaching the transport; form bodies arrive as strings.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a bodyless request.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header with the given name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A decoded HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body decoded as JSON (`Value::Null` for empty bodies).
    pub body: Value,
}

impl HttpResponse {
    /// Creates a 200 response around a JSON body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body,
        }
    }
}

/// Errors raised by a transport implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never reached the server.
    #[error("Connection failed: {message}")]
    Connect {
        /// Description of the connection failure.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response body: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl TransportError {
    /// Creates a new `Connect` error.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Injectable HTTP transport.
///
/// Implementations must be cheap to share (`Arc<dyn Transport>`); the
/// client issues every call, including OAuth token exchanges, through this
/// trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and decodes the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
