//! OAuth endpoint discovery from the server's conformance statement.
//!
//! SMART servers advertise their authorize and token endpoints as an
//! extension on the conformance statement's REST security element. This
//! module fetches `{base}/metadata` and extracts those URIs.

use serde_json::Value;
use tern_core::{HttpRequest, Transport};
use tracing::debug;

use crate::error::{SmartError, SmartResult};
use crate::types::{OAuthUris, Provider};

/// Extension URL carrying the SMART OAuth endpoint URIs.
pub const OAUTH_URIS_EXTENSION: &str =
    "http://fhir-registry.smarthealthit.org/StructureDefinition/oauth-uris";

/// Fetches a server's conformance statement and builds a [`Provider`]
/// with its OAuth endpoints.
///
/// Fails with [`SmartError::SecurityMetadata`] when the statement lacks
/// the SMART oauth-uris extension or the required `authorize`/`token`
/// entries.
pub async fn discover(transport: &dyn Transport, fhir_base: &str) -> SmartResult<Provider> {
    let base = fhir_base.trim_end_matches('/');
    let request = HttpRequest::new("GET", format!("{base}/metadata"))
        .with_header("Accept", "application/json");
    debug!(url = %request.url, "fetching conformance statement");
    let response = transport.send(request).await?;

    let uris = extract_oauth_uris(&response.body)?;
    Ok(Provider {
        url: base.to_string(),
        oauth2: Some(uris),
    })
}

/// Extracts the SMART OAuth URIs from a conformance statement.
pub fn extract_oauth_uris(conformance: &Value) -> SmartResult<OAuthUris> {
    let extensions = conformance
        .get("rest")
        .and_then(|rest| rest.get(0))
        .and_then(|rest| rest.get("security"))
        .and_then(|security| security.get("extension"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SmartError::security_metadata("conformance statement has no REST security extensions")
        })?;

    let oauth_uris = extensions
        .iter()
        .find(|ext| ext.get("url").and_then(Value::as_str) == Some(OAUTH_URIS_EXTENSION))
        .and_then(|ext| ext.get("extension"))
        .and_then(Value::as_array)
        .ok_or_else(|| SmartError::security_metadata("no oauth-uris extension advertised"))?;

    let value_uri = |name: &str| -> Option<String> {
        oauth_uris
            .iter()
            .find(|ext| ext.get("url").and_then(Value::as_str) == Some(name))
            .and_then(|ext| ext.get("valueUri"))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let authorize_uri = value_uri("authorize")
        .ok_or_else(|| SmartError::security_metadata("oauth-uris extension has no authorize URI"))?;
    let token_uri = value_uri("token")
        .ok_or_else(|| SmartError::security_metadata("oauth-uris extension has no token URI"))?;

    Ok(OAuthUris {
        authorize_uri,
        token_uri,
        register_uri: value_uri("register"),
    })
}
