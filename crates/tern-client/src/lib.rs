//! # tern-client
//!
//! Middleware-composed FHIR REST client.
//!
//! This crate provides:
//! - A request middleware combinator engine ([`middleware`])
//! - Structured search query linearization ([`query`])
//! - Chainable URL path templates ([`path`])
//! - The [`FhirClient`] request pipeline assembler
//! - Pagination and bulk-fetch helpers ([`paging`])
//! - Resource reference resolution ([`resolve`])
//! - A reqwest-backed [`Transport`](tern_core::Transport) implementation
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use tern_client::{ClientConfig, FhirClient, ReqwestTransport};
//! use tern_core::Credential;
//!
//! let config = ClientConfig::new("https://fhir.example.com")
//!     .with_credential(Credential::bearer("token"));
//! let client = FhirClient::new(config, Arc::new(ReqwestTransport::new()));
//! let bundle = client.search("Patient", json!({"name": "Smith"})).await?;
//! ```

pub mod client;
pub mod error;
pub mod middleware;
pub mod paging;
pub mod path;
pub mod query;
pub mod resolve;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::{ClientConfig, FhirClient};
pub use error::{ClientError, ClientResult};
pub use middleware::{AttrSource, BoxFuture, Handler, Middleware, map_request, set_attr};
pub use paging::{SearchOutcome, bundle_entries};
pub use path::PathTemplate;
pub use query::{QueryTerm, linearize, render};
pub use resolve::ResolveParams;
pub use transport::ReqwestTransport;
