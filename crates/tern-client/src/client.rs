//! FHIR client: the request pipeline assembler.
//!
//! A [`FhirClient`] wires the middleware combinators into a fixed set of
//! named operations (`read`, `search`, `create`, ...), each composed as:
//! configuration defaults → credential injection → JSON body encoding →
//! fixed `Accept`/`Content-Type` headers → operation-specific method and
//! URL path template → injected transport.
//!
//! The transport and configuration are injected at construction; a client
//! owns no global state and can be shared freely.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use tern_core::{CoreError, Credential, HttpRequest, HttpResponse, RequestDescriptor, Transport};

use crate::error::{ClientError, ClientResult};
use crate::middleware::{AttrSource, Handler, Middleware, map_request, set_attr};
use crate::path::PathTemplate;
use crate::query::{linearize, render};

/// Resource types that carry a patient/subject reference and therefore
/// participate in automatic patient-context filtering.
const PATIENT_CONTEXT_TYPES: &[&str] = &[
    "AllergyIntolerance",
    "CarePlan",
    "Condition",
    "DiagnosticReport",
    "DocumentReference",
    "Encounter",
    "Goal",
    "Immunization",
    "MedicationDispense",
    "MedicationOrder",
    "MedicationRequest",
    "MedicationStatement",
    "Observation",
    "Procedure",
];

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// FHIR server base URL (no trailing slash required).
    pub base_url: String,
    /// Credential rendered into the `Authorization` header.
    pub credential: Credential,
    /// Patient context; injected into searches over patient-scoped
    /// resource types.
    pub patient: Option<String>,
    /// Local resource cache keyed by absolute URL, consulted before the
    /// network by the reference resolver.
    pub cache: HashMap<String, Value>,
    /// Log each outbound request at debug level.
    pub debug: bool,
}

impl ClientConfig {
    /// Creates a configuration for a server base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credential: Credential::None,
            patient: None,
            cache: HashMap::new(),
            debug: false,
        }
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    /// Sets the patient context.
    #[must_use]
    pub fn with_patient(mut self, patient: impl Into<String>) -> Self {
        self.patient = Some(patient.into());
        self
    }

    /// Seeds the local resource cache.
    #[must_use]
    pub fn with_cache(mut self, cache: HashMap<String, Value>) -> Self {
        self.cache = cache;
        self
    }

    /// Enables request debug logging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// A configured FHIR client.
#[derive(Clone)]
pub struct FhirClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    base: Middleware,
    terminal: Handler,
}

impl FhirClient {
    /// Creates a client from a configuration and an injected transport.
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        let base = base_pipeline(&config);
        let terminal = terminal_handler(Arc::clone(&transport));
        Self {
            config,
            transport,
            base,
            terminal,
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The injected transport.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    async fn run(&self, op: Middleware, descriptor: RequestDescriptor) -> ClientResult<Value> {
        let handler = self.base.clone().then(op).apply(self.terminal.clone());
        let response = handler(descriptor).await?;
        Ok(response.body)
    }

    fn descriptor(fields: Value) -> RequestDescriptor {
        match fields {
            Value::Object(map) => RequestDescriptor::from_map(map),
            _ => RequestDescriptor::new(),
        }
    }

    /// Reads a resource by type and id (`GET [base]/[type]/[id]`).
    pub async fn read(&self, resource_type: &str, id: &str) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash(":type")
                .slash(":id")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"type": resource_type, "id": id})))
            .await
    }

    /// Reads a specific resource version
    /// (`GET [base]/[type]/[id]/_history/[vid]`).
    pub async fn vread(
        &self,
        resource_type: &str,
        id: &str,
        version_id: &str,
    ) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash(":type")
                .slash(":id")
                .slash("_history")
                .slash(":versionId")
                .into_middleware(),
        );
        self.run(
            op,
            Self::descriptor(json!({
                "type": resource_type,
                "id": id,
                "versionId": version_id,
            })),
        )
        .await
    }

    /// Searches a resource type with a structured query object
    /// (`GET [base]/[type]?...`).
    ///
    /// When the client carries a patient context and the type is
    /// patient-scoped, a `patient` filter (or `_id` for `Patient` itself)
    /// is injected unless the query already constrains it.
    pub async fn search(&self, resource_type: &str, query: Value) -> ClientResult<Value> {
        let op = method("GET")
            .then(patient_context())
            .then(
                PathTemplate::root("baseUrl")
                    .slash(":type")
                    .into_middleware(),
            )
            .then(query_string());
        self.run(
            op,
            Self::descriptor(json!({"type": resource_type, "query": query})),
        )
        .await
    }

    /// Creates a resource (`POST [base]/[type]`).
    pub async fn create(&self, resource: Value) -> ClientResult<Value> {
        let op = method("POST").then(
            PathTemplate::root("baseUrl")
                .slash(":resource.resourceType")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"resource": resource.clone(), "data": resource})))
            .await
    }

    /// Updates a resource in place (`PUT [base]/[type]/[id]`).
    pub async fn update(&self, resource: Value) -> ClientResult<Value> {
        let op = method("PUT").then(
            PathTemplate::root("baseUrl")
                .slash(":resource.resourceType")
                .slash(":resource.id")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"resource": resource.clone(), "data": resource})))
            .await
    }

    /// Deletes a resource (`DELETE [base]/[type]/[id]`).
    pub async fn delete(&self, resource: &Value) -> ClientResult<Value> {
        let op = method("DELETE").then(
            PathTemplate::root("baseUrl")
                .slash(":resource.resourceType")
                .slash(":resource.id")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"resource": resource})))
            .await
    }

    /// Validates a resource against the server
    /// (`POST [base]/[type]/_validate`).
    pub async fn validate(&self, resource: Value) -> ClientResult<Value> {
        let op = method("POST").then(
            PathTemplate::root("baseUrl")
                .slash(":resource.resourceType")
                .slash("_validate")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"resource": resource.clone(), "data": resource})))
            .await
    }

    /// Whole-system history (`GET [base]/_history`).
    pub async fn history(&self) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash("_history")
                .into_middleware(),
        );
        self.run(op, RequestDescriptor::new()).await
    }

    /// Type-level history (`GET [base]/[type]/_history`).
    pub async fn type_history(&self, resource_type: &str) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash(":type")
                .slash("_history")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"type": resource_type})))
            .await
    }

    /// Resource-instance history (`GET [base]/[type]/[id]/_history`).
    pub async fn resource_history(&self, resource_type: &str, id: &str) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash(":type")
                .slash(":id")
                .slash("_history")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"type": resource_type, "id": id})))
            .await
    }

    /// Submits a transaction bundle (`POST [base]`).
    pub async fn transaction(&self, bundle: Value) -> ClientResult<Value> {
        let op = method("POST").then(PathTemplate::root("baseUrl").into_middleware());
        self.run(op, Self::descriptor(json!({"bundle": bundle.clone(), "data": bundle})))
            .await
    }

    /// Submits a document bundle (`POST [base]/Document`).
    pub async fn document(&self, document: Value) -> ClientResult<Value> {
        let op = method("POST").then(
            PathTemplate::root("baseUrl")
                .slash("Document")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"data": document}))).await
    }

    /// Fetches the server conformance statement (`GET [base]/metadata`).
    pub async fn conformance(&self) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash("metadata")
                .into_middleware(),
        );
        self.run(op, RequestDescriptor::new()).await
    }

    /// Fetches a resource profile (`GET [base]/Profile/[type]`).
    pub async fn profile(&self, resource_type: &str) -> ClientResult<Value> {
        let op = method("GET").then(
            PathTemplate::root("baseUrl")
                .slash("Profile")
                .slash(":type")
                .into_middleware(),
        );
        self.run(op, Self::descriptor(json!({"type": resource_type})))
            .await
    }

    /// Follows a bundle's `next` link.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingLink`] when the bundle has no `next`
    /// relation.
    pub async fn next_page(&self, bundle: &Value) -> ClientResult<Value> {
        let op = method("GET").then(bundle_link("next"));
        self.run(op, Self::descriptor(json!({"bundle": bundle}))).await
    }

    /// Follows a bundle's `prev`/`previous` link.
    pub async fn prev_page(&self, bundle: &Value) -> ClientResult<Value> {
        let op = method("GET").then(bundle_link("prev"));
        self.run(op, Self::descriptor(json!({"bundle": bundle}))).await
    }

    /// Fetches an arbitrary absolute URL through the shared pipeline.
    pub async fn get_url(&self, url: &str) -> ClientResult<Value> {
        let op = method("GET");
        self.run(op, Self::descriptor(json!({"url": url}))).await
    }
}

fn method(verb: &str) -> Middleware {
    set_attr("method", json!(verb))
}

/// Injects the patient context into patient-scoped searches.
///
/// `Patient` searches are constrained by `_id`; other allow-listed types
/// by `patient`. An existing constraint in the query wins.
fn patient_context() -> Middleware {
    let patient_filter = set_attr(
        "query.patient",
        AttrSource::computed(|d| {
            let patient = d.get_path("patient")?.as_str()?;
            let resource_type = d.get_path("type")?.as_str()?;
            if !PATIENT_CONTEXT_TYPES.contains(&resource_type) {
                return None;
            }
            if d.get_path("query.patient").is_some() || d.get_path("query.subject").is_some() {
                return None;
            }
            Some(Value::String(patient.to_string()))
        }),
    );
    let id_filter = set_attr(
        "query._id",
        AttrSource::computed(|d| {
            let patient = d.get_path("patient")?.as_str()?;
            if d.get_path("type")?.as_str()? != "Patient" {
                return None;
            }
            if d.get_path("query._id").is_some() {
                return None;
            }
            Some(Value::String(patient.to_string()))
        }),
    );
    patient_filter.then(id_filter)
}

/// Linearizes the structured `query` object and appends it to the URL.
fn query_string() -> Middleware {
    map_request(|descriptor| {
        let Some(query) = descriptor.get_path("query").cloned() else {
            return Ok(());
        };
        let terms = linearize(&query)?;
        if terms.is_empty() {
            return Ok(());
        }
        let url = descriptor
            .url()
            .ok_or_else(|| CoreError::adapter_misconfigured("query step ran before the URL step"))?
            .to_string();
        let rendered = render(&terms);
        descriptor.set_path("url", Value::String(format!("{url}?{rendered}")));
        Ok(())
    })
}

/// Resolves the URL from a previously-fetched bundle's `link` array.
fn bundle_link(relation: &'static str) -> Middleware {
    map_request(move |descriptor| {
        let links = descriptor
            .get_path("bundle.link")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let url = links.iter().find_map(|link| {
            let rel = link.get("relation").and_then(Value::as_str)?;
            // FHIR emits both "prev" and "previous" in the wild.
            let matches = rel == relation || (relation == "prev" && rel == "previous");
            if matches {
                link.get("url").and_then(Value::as_str).map(str::to_string)
            } else {
                None
            }
        });
        match url {
            Some(url) => {
                descriptor.set_path("url", Value::String(url));
                Ok(())
            }
            None => Err(ClientError::missing_link(relation)),
        }
    })
}

/// The shared pipeline prefix applied to every operation.
fn base_pipeline(config: &Arc<ClientConfig>) -> Middleware {
    let cfg = Arc::clone(config);
    let defaults = map_request(move |descriptor| {
        descriptor.set_path("baseUrl", json!(cfg.base_url));
        if let Some(patient) = &cfg.patient {
            descriptor.set_path("patient", json!(patient));
        }
        if cfg.debug {
            descriptor.set_path("debug", json!(true));
        }
        Ok(())
    });

    let cfg = Arc::clone(config);
    let auth = set_attr(
        "headers.Authorization",
        AttrSource::computed(move |_| cfg.credential.authorization_header().map(Value::String)),
    );

    let encode_body = map_request(|descriptor| {
        let Some(data) = descriptor.data().cloned() else {
            return Ok(());
        };
        let body = match data {
            Value::String(s) => s,
            structured => serde_json::to_string(&structured)?,
        };
        descriptor.set_path("body", Value::String(body));
        Ok(())
    });

    let accept = set_attr("headers.Accept", json!("application/json"));
    let content_type = set_attr(
        "headers.Content-Type",
        AttrSource::computed(|d| d.get_path("body").map(|_| json!("application/json"))),
    );

    defaults
        .then(auth)
        .then(encode_body)
        .then(accept)
        .then(content_type)
}

/// The terminal handler: converts the descriptor into a transport request.
fn terminal_handler(transport: Arc<dyn Transport>) -> Handler {
    Arc::new(move |descriptor: RequestDescriptor| {
        let transport = Arc::clone(&transport);
        Box::pin(async move {
            let method = descriptor
                .method()
                .ok_or_else(|| {
                    CoreError::adapter_misconfigured("request reached the transport without a method")
                })?
                .to_string();
            let url = descriptor
                .url()
                .ok_or_else(|| {
                    CoreError::adapter_misconfigured("request reached the transport without a URL")
                })?
                .to_string();

            let mut request = HttpRequest::new(method, url);
            request.headers = descriptor.headers();
            request.body = descriptor
                .get_path("body")
                .and_then(Value::as_str)
                .map(str::to_string);

            if descriptor.debug() {
                debug!(method = %request.method, url = %request.url, "dispatching request");
            }

            let response: HttpResponse = transport.send(request).await?;
            Ok(response)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockTransport;

    fn client_with(transport: Arc<MockTransport>, config: ClientConfig) -> FhirClient {
        FhirClient::new(config, transport)
    }

    #[tokio::test]
    async fn test_read_builds_bearer_get() {
        let transport = MockTransport::returning(json!({"resourceType": "Patient", "id": "5"}));
        let config = ClientConfig::new("http://x").with_credential(Credential::bearer("T"));
        let client = client_with(Arc::clone(&transport), config);

        let resource = client.read("Patient", "5").await.unwrap();
        assert_eq!(resource["id"], "5");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "http://x/Patient/5");
        assert_eq!(requests[0].header("Authorization"), Some("Bearer T"));
        assert_eq!(requests[0].header("Accept"), Some("application/json"));
        assert_eq!(requests[0].header("Content-Type"), None);
    }

    #[tokio::test]
    async fn test_vread_url() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client.vread("Patient", "5", "2").await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://x/Patient/5/_history/2"
        );
    }

    #[tokio::test]
    async fn test_search_renders_query_string() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x/"));
        client
            .search("Patient", json!({"name": "Smith", "$sort": ["birthdate"]}))
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://x/Patient?name=Smith&_sort=birthdate"
        );
    }

    #[tokio::test]
    async fn test_search_injects_patient_context() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let config = ClientConfig::new("http://x").with_patient("p1");
        let client = client_with(Arc::clone(&transport), config);

        client.search("Observation", json!({"code": "8480-6"})).await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://x/Observation?code=8480-6&patient=p1"
        );
    }

    #[tokio::test]
    async fn test_search_patient_type_uses_id_filter() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let config = ClientConfig::new("http://x").with_patient("p1");
        let client = client_with(Arc::clone(&transport), config);

        client.search("Patient", json!({})).await.unwrap();
        assert_eq!(transport.requests()[0].url, "http://x/Patient?_id=p1");
    }

    #[tokio::test]
    async fn test_search_respects_existing_patient_filter() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let config = ClientConfig::new("http://x").with_patient("p1");
        let client = client_with(Arc::clone(&transport), config);

        client
            .search("Observation", json!({"patient": "other"}))
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://x/Observation?patient=other"
        );
    }

    #[tokio::test]
    async fn test_unscoped_type_gets_no_patient_filter() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let config = ClientConfig::new("http://x").with_patient("p1");
        let client = client_with(Arc::clone(&transport), config);

        client.search("Organization", json!({"name": "acme"})).await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://x/Organization?name=acme"
        );
    }

    #[tokio::test]
    async fn test_create_posts_encoded_body() {
        let transport = MockTransport::returning(json!({"resourceType": "Patient", "id": "9"}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));

        let resource = json!({"resourceType": "Patient", "name": [{"family": "Smith"}]});
        client.create(resource.clone()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://x/Patient");
        assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
        let sent: Value = serde_json::from_str(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent, resource);
    }

    #[tokio::test]
    async fn test_update_puts_to_resource_url() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client
            .update(json!({"resourceType": "Patient", "id": "5", "active": "true"}))
            .await
            .unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].url, "http://x/Patient/5");
    }

    #[tokio::test]
    async fn test_update_without_id_fails() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        let err = client
            .update(json!({"resourceType": "Patient"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingParameter { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_url() {
        let transport = MockTransport::returning(Value::Null);
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client
            .delete(&json!({"resourceType": "Patient", "id": "5"}))
            .await
            .unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].url, "http://x/Patient/5");
    }

    #[tokio::test]
    async fn test_history_urls() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client.history().await.unwrap();
        client.type_history("Patient").await.unwrap();
        client.resource_history("Patient", "5").await.unwrap();

        let urls: Vec<String> = transport.requests().iter().map(|r| r.url.clone()).collect();
        assert_eq!(
            urls,
            vec![
                "http://x/_history",
                "http://x/Patient/_history",
                "http://x/Patient/5/_history",
            ]
        );
    }

    #[tokio::test]
    async fn test_conformance_and_profile() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client.conformance().await.unwrap();
        client.profile("Patient").await.unwrap();

        let urls: Vec<String> = transport.requests().iter().map(|r| r.url.clone()).collect();
        assert_eq!(urls, vec!["http://x/metadata", "http://x/Profile/Patient"]);
    }

    #[tokio::test]
    async fn test_transaction_posts_bundle_to_base() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        client
            .transaction(json!({"resourceType": "Bundle", "type": "transaction"}))
            .await
            .unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://x");
        assert!(requests[0].body.is_some());
    }

    #[tokio::test]
    async fn test_next_page_follows_link() {
        let transport = MockTransport::returning(json!({"resourceType": "Bundle"}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        let bundle = json!({
            "resourceType": "Bundle",
            "link": [
                {"relation": "self", "url": "http://x/Patient?page=1"},
                {"relation": "next", "url": "http://x/Patient?page=2"},
            ],
        });
        client.next_page(&bundle).await.unwrap();
        assert_eq!(transport.requests()[0].url, "http://x/Patient?page=2");
    }

    #[tokio::test]
    async fn test_next_page_without_link_fails() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        let bundle = json!({"resourceType": "Bundle", "link": []});
        let err = client.next_page(&bundle).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingLink { ref relation } if relation == "next"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_prev_page_accepts_previous_relation() {
        let transport = MockTransport::returning(json!({}));
        let client = client_with(Arc::clone(&transport), ClientConfig::new("http://x"));
        let bundle = json!({
            "resourceType": "Bundle",
            "link": [{"relation": "previous", "url": "http://x/Patient?page=1"}],
        });
        client.prev_page(&bundle).await.unwrap();
        assert_eq!(transport.requests()[0].url, "http://x/Patient?page=1");
    }

    #[tokio::test]
    async fn test_basic_credential_header() {
        let transport = MockTransport::returning(json!({}));
        let config = ClientConfig::new("http://x")
            .with_credential(Credential::basic("user", "pass"));
        let client = client_with(Arc::clone(&transport), config);
        client.read("Patient", "1").await.unwrap();
        assert_eq!(
            transport.requests()[0].header("Authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }
}
