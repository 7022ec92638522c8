//! Authentication credential descriptors.
//!
//! A [`Credential`] is attached to a client at construction time and
//! rendered into an `Authorization` header by the request pipeline. It is
//! immutable once constructed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Credential attached to a FHIR client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credential {
    /// No authentication; requests carry no `Authorization` header.
    None,
    /// HTTP Basic authentication.
    Basic {
        /// Username for the Basic challenge.
        username: String,
        /// Password for the Basic challenge.
        password: String,
    },
    /// Bearer token authentication (OAuth2 access token).
    Bearer {
        /// The access token presented as `Bearer <token>`.
        token: String,
    },
}

impl Credential {
    /// Creates a bearer credential.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic credential.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Renders the `Authorization` header value, or `None` for
    /// [`Credential::None`].
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Basic { username, password } => {
                let raw = format!("{username}:{password}");
                Some(format!("Basic {}", STANDARD.encode(raw.as_bytes())))
            }
            Self::Bearer { token } => Some(format!("Bearer {token}")),
        }
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::None
    }
}
