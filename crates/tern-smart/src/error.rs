//! Authorization flow error types.

use tern_core::TransportError;

/// Errors that can occur during the SMART launch and token lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum SmartError {
    /// The launch request is incomplete or inconsistent.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The `state` value threading the redirect round-trip is missing or
    /// does not match a stored session.
    #[error("State mismatch: {message}")]
    StateMismatch {
        /// Description of the state problem.
        message: String,
    },

    /// The server's conformance statement carries no usable SMART OAuth
    /// security metadata.
    #[error("Unrecognized security metadata: {message}")]
    SecurityMetadata {
        /// Description of what was missing.
        message: String,
    },

    /// The token endpoint rejected the exchange.
    #[error("Token exchange failed: {message}")]
    TokenExchange {
        /// Raw failure detail from the token endpoint.
        message: String,
    },

    /// No authorization session is stored under the given state.
    #[error("No session stored for state {state}")]
    SessionNotFound {
        /// The state key that was looked up.
        state: String,
    },

    /// The session store failed.
    #[error("Session storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// A session or token payload could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A discovery or token call failed at the transport level.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SmartError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `StateMismatch` error.
    #[must_use]
    pub fn state_mismatch(message: impl Into<String>) -> Self {
        Self::StateMismatch {
            message: message.into(),
        }
    }

    /// Creates a new `SecurityMetadata` error.
    #[must_use]
    pub fn security_metadata(message: impl Into<String>) -> Self {
        Self::SecurityMetadata {
            message: message.into(),
        }
    }

    /// Creates a new `TokenExchange` error.
    #[must_use]
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
        }
    }

    /// Creates a new `SessionNotFound` error.
    #[must_use]
    pub fn session_not_found(state: impl Into<String>) -> Self {
        Self::SessionNotFound {
            state: state.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Type alias for authorization flow results.
pub type SmartResult<T> = Result<T, SmartError>;
