//! Client error types.
//!
//! This module defines all error types that can occur while building and
//! executing FHIR requests.

use tern_core::{CoreError, TransportError};

/// Errors raised while building or executing a FHIR request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A structured query contained a value of an unsupported runtime type.
    #[error("Unsupported query value type: {type_name} (parameter: {param})")]
    Linearization {
        /// Descriptive name of the offending value's type.
        type_name: String,
        /// The query parameter the value belonged to.
        param: String,
    },

    /// A required URL path segment could not be resolved.
    #[error("Missing parameter: {expression} (descriptor: {descriptor})")]
    MissingParameter {
        /// The unresolved segment expression.
        expression: String,
        /// Debug rendering of the descriptor, for diagnostics.
        descriptor: String,
    },

    /// A contained reference (`#id`) was not found inside the owning
    /// resource's `contained` array.
    #[error("Contained resource not found: #{id}")]
    ContainedResourceNotFound {
        /// The contained resource id that was looked up.
        id: String,
    },

    /// A bundle carried no link with the requested relation.
    #[error("Bundle has no '{relation}' link")]
    MissingLink {
        /// The link relation that was looked up (`next`, `prev`).
        relation: String,
    },

    /// The injected transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The pipeline was assembled incorrectly (programming error).
    #[error(transparent)]
    Adapter(#[from] CoreError),

    /// A payload could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Creates a new `Linearization` error.
    #[must_use]
    pub fn linearization(type_name: impl Into<String>, param: impl Into<String>) -> Self {
        Self::Linearization {
            type_name: type_name.into(),
            param: param.into(),
        }
    }

    /// Creates a new `MissingParameter` error.
    #[must_use]
    pub fn missing_parameter(expression: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::MissingParameter {
            expression: expression.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Creates a new `MissingLink` error.
    #[must_use]
    pub fn missing_link(relation: impl Into<String>) -> Self {
        Self::MissingLink {
            relation: relation.into(),
        }
    }

    /// Creates a new `ContainedResourceNotFound` error.
    #[must_use]
    pub fn contained_not_found(id: impl Into<String>) -> Self {
        Self::ContainedResourceNotFound { id: id.into() }
    }
}

/// Type alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
