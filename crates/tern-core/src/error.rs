//! Core error types shared across the client crates.

/// Errors raised by the shared request machinery.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required request field was never resolved by the pipeline.
    ///
    /// This indicates a programming or configuration error (a pipeline was
    /// assembled without a method/URL step), not a runtime condition.
    #[error("Adapter misconfigured: {message}")]
    AdapterMisconfigured {
        /// Description of the missing configuration.
        message: String,
    },

    /// A required parameter could not be resolved from the descriptor.
    #[error("Missing parameter: {expression} (descriptor: {descriptor})")]
    MissingParameter {
        /// The unresolved segment expression.
        expression: String,
        /// Debug rendering of the descriptor, for diagnostics.
        descriptor: String,
    },
}

impl CoreError {
    /// Creates a new `AdapterMisconfigured` error.
    #[must_use]
    pub fn adapter_misconfigured(message: impl Into<String>) -> Self {
        Self::AdapterMisconfigured {
            message: message.into(),
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
}
