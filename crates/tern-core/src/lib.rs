//! # tern-core
//!
//! Shared building blocks for the tern FHIR client SDK.
//!
//! This crate provides:
//! - The [`RequestDescriptor`] threaded through request middleware
//! - [`Credential`] descriptors (none, basic, bearer)
//! - FHIR reference string parsing and classification
//! - The injectable [`Transport`] abstraction
//!
//! ## Modules
//!
//! - [`descriptor`] - In-flight HTTP request under construction
//! - [`credential`] - Authentication credential descriptors
//! - [`reference`] - FHIR reference string utilities
//! - [`transport`] - HTTP transport trait and request/response types
//! - [`error`] - Core error types

pub mod credential;
pub mod descriptor;
pub mod error;
pub mod reference;
pub mod transport;

pub use credential::Credential;
pub use descriptor::RequestDescriptor;
pub use error::CoreError;
pub use reference::{ParsedReference, absolute_reference_url, parse_reference};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Type alias for core results.
pub type CoreResult<T> = Result<T, CoreError>;
