//! # tern-smart
//!
//! SMART App Launch (OAuth2) flow for the tern FHIR client.
//!
//! This crate provides:
//! - OAuth endpoint discovery from conformance statements ([`discovery`])
//! - Authorization session persistence ([`session`])
//! - The authorization kickoff ([`SmartLaunch::authorize`])
//! - The callback half producing an authorized client
//!   ([`SmartLaunch::ready`])
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tern_client::ReqwestTransport;
//! use tern_smart::{
//!     CallbackParams, ClientRegistration, LaunchParams, LaunchRequest,
//!     MemorySessionStore, SmartLaunch,
//! };
//!
//! let launch = SmartLaunch::new(
//!     Arc::new(ReqwestTransport::new()),
//!     Arc::new(MemorySessionStore::default()),
//! );
//!
//! let client = ClientRegistration::new("my-app", "patient/*.read")
//!     .with_redirect_uri("https://app.example.com/cb");
//! let params = LaunchParams::from_query(launch_url_query);
//! let outcome = launch.authorize(LaunchRequest::new(client, params)).await?;
//! // ... host navigates, authorization server redirects back ...
//! let smart = launch.ready(CallbackParams::from_url(&callback_url)).await?;
//! let patient = smart.api.read("Patient", "123").await?;
//! ```

pub mod authorize;
pub mod discovery;
pub mod error;
pub mod ready;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use authorize::{AuthorizeOutcome, LaunchParams, LaunchRequest, SmartLaunch};
pub use discovery::{OAUTH_URIS_EXTENSION, discover, extract_oauth_uris};
pub use error::{SmartError, SmartResult};
pub use ready::{CallbackParams, SmartClient};
pub use session::{MemorySessionStore, SessionStore, TokenKeyLayout};
pub use types::{
    AuthorizationSession, ClientRegistration, OAuthUris, Provider, TokenResponse,
    decode_jwt_payload,
};
