//! Resource reference resolution.
//!
//! Resolution order for a reference:
//!
//! 1. Contained (`#id`): look inside the owning resource's `contained`
//!    array; a miss is an error, contained references have nowhere else to
//!    resolve.
//! 2. Local: absolutize the reference and look it up in the supplied
//!    bundle's entries, then in the client's resource cache. A hit
//!    resolves without a network call.
//! 3. Remote: issue one `GET` for the absolute URL.
//!
//! An input with no reference at all resolves to `None` (the caller treats
//! it as "not a reference").

use serde_json::Value;

use tern_core::reference::{ParsedReference, absolute_reference_url, parse_reference};

use crate::client::FhirClient;
use crate::error::{ClientError, ClientResult};

/// Parameters for a reference resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveParams {
    /// The reference: either a FHIR reference object (`{"reference": ...}`)
    /// or a bare reference string.
    pub reference: Value,
    /// The owning resource, searched for contained references.
    pub resource: Option<Value>,
    /// A bundle whose entries are consulted before the network.
    pub bundle: Option<Value>,
}

impl ResolveParams {
    /// Creates parameters for a bare reference value.
    #[must_use]
    pub fn new(reference: Value) -> Self {
        Self {
            reference,
            resource: None,
            bundle: None,
        }
    }

    /// Sets the owning resource.
    #[must_use]
    pub fn with_resource(mut self, resource: Value) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Sets the lookup bundle.
    #[must_use]
    pub fn with_bundle(mut self, bundle: Value) -> Self {
        self.bundle = Some(bundle);
        self
    }
}

/// Extracts the reference string from a reference object or bare string.
fn reference_string(reference: &Value) -> Option<&str> {
    match reference {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("reference").and_then(Value::as_str),
        _ => None,
    }
}

fn find_contained(resource: Option<&Value>, id: &str) -> Option<Value> {
    resource?
        .get("contained")?
        .as_array()?
        .iter()
        .find(|contained| contained.get("id").and_then(Value::as_str) == Some(id))
        .cloned()
}

fn find_in_bundle(bundle: Option<&Value>, url: &str) -> Option<Value> {
    let entries = bundle?.get("entry")?.as_array()?;
    entries.iter().find_map(|entry| {
        let entry_id = entry.get("id").and_then(Value::as_str);
        let full_url = entry.get("fullUrl").and_then(Value::as_str);
        if entry_id == Some(url) || full_url == Some(url) {
            entry.get("resource").or_else(|| entry.get("content")).cloned()
        } else {
            None
        }
    })
}

impl FhirClient {
    /// Resolves a resource reference locally or over the network.
    ///
    /// Returns `Ok(None)` when the input carries no reference.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ContainedResourceNotFound`] when a `#id`
    /// reference has no match in the owning resource, and transport errors
    /// for failed remote fetches.
    pub async fn resolve(&self, params: ResolveParams) -> ClientResult<Option<Value>> {
        let Some(reference) = reference_string(&params.reference) else {
            return Ok(None);
        };

        match parse_reference(reference) {
            ParsedReference::Contained(id) => find_contained(params.resource.as_ref(), &id)
                .map(Some)
                .ok_or_else(|| ClientError::contained_not_found(id)),
            ParsedReference::Absolute(_) | ParsedReference::Relative(_) => {
                let url = absolute_reference_url(reference, &self.config().base_url);
                if let Some(resource) = find_in_bundle(params.bundle.as_ref(), &url) {
                    return Ok(Some(resource));
                }
                if let Some(resource) = self.config().cache.get(&url) {
                    return Ok(Some(resource.clone()));
                }
                let resource = self.get_url(&url).await?;
                Ok(Some(resource))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::testutil::MockTransport;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_non_reference_resolves_to_none() {
        let transport = MockTransport::returning(json!({}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);
        let resolved = client
            .resolve(ResolveParams::new(json!({"display": "no reference here"})))
            .await
            .unwrap();
        assert!(resolved.is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contained_reference_resolves_locally() {
        let transport = MockTransport::returning(json!({}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);

        let owner = json!({
            "resourceType": "MedicationOrder",
            "id": "m1",
            "contained": [{"resourceType": "Medication", "id": "abc"}],
        });
        let resolved = client
            .resolve(ResolveParams::new(json!({"reference": "#abc"})).with_resource(owner))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved["id"], "abc");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contained_reference_miss_fails() {
        let transport = MockTransport::returning(json!({}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);

        let owner = json!({"resourceType": "MedicationOrder", "id": "m1", "contained": []});
        let err = client
            .resolve(ResolveParams::new(json!({"reference": "#abc"})).with_resource(owner))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::ContainedResourceNotFound { ref id } if id == "abc"
        ));
    }

    #[tokio::test]
    async fn test_bundle_hit_skips_network() {
        let transport = MockTransport::returning(json!({}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);

        let bundle = json!({
            "resourceType": "Bundle",
            "entry": [{
                "fullUrl": "http://x/Patient/123",
                "resource": {"resourceType": "Patient", "id": "123"},
            }],
        });
        let resolved = client
            .resolve(ResolveParams::new(json!({"reference": "Patient/123"})).with_bundle(bundle))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved["id"], "123");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let transport = MockTransport::returning(json!({}));
        let mut cache = HashMap::new();
        cache.insert(
            "http://x/Patient/123".to_string(),
            json!({"resourceType": "Patient", "id": "123"}),
        );
        let config = ClientConfig::new("http://x").with_cache(cache);
        let client = FhirClient::new(config, Arc::clone(&transport) as _);

        let resolved = client
            .resolve(ResolveParams::new(json!({"reference": "Patient/123"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved["id"], "123");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_miss_issues_exactly_one_get() {
        let transport = MockTransport::returning(json!({"resourceType": "Patient", "id": "123"}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);

        let resolved = client
            .resolve(ResolveParams::new(json!({"reference": "Patient/123"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved["id"], "123");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "http://x/Patient/123");
    }

    #[tokio::test]
    async fn test_absolute_reference_used_verbatim() {
        let transport = MockTransport::returning(json!({"resourceType": "Patient", "id": "9"}));
        let client = FhirClient::new(ClientConfig::new("http://x"), Arc::clone(&transport) as _);

        client
            .resolve(ResolveParams::new(json!({"reference": "http://y/Patient/9"})))
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].url, "http://y/Patient/9");
    }
}
