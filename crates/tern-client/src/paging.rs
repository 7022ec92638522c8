//! Pagination and bulk-fetch helpers.
//!
//! Pages are fetched strictly sequentially: the next page is not requested
//! until the current page's callback has run. Reference resolution in
//! [`FhirClient::fetch_all_with_references`] walks an explicit work queue,
//! one reference at a time, so the resolved map is deterministic and no
//! reference is fetched twice.
//!
//! A failed next-page fetch ends iteration instead of failing the whole
//! drain. This mirrors the long-standing behavior of treating any
//! rejection as "no more pages"; genuine transport failures are logged so
//! they remain distinguishable from completion.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;
use tracing::warn;

use crate::client::FhirClient;
use crate::error::{ClientError, ClientResult};
use crate::resolve::ResolveParams;

/// Extracts the resource array from a bundle's entries.
///
/// Accepts both `entry.resource` and the older `entry.content` envelope.
#[must_use]
pub fn bundle_entries(bundle: &Value) -> Vec<Value> {
    bundle
        .get("entry")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("resource").or_else(|| entry.get("content")))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Result of a bulk fetch with reference resolution.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// All fetched resources, across every page.
    pub resources: Vec<Value>,
    resolved_references: HashMap<String, Value>,
}

impl SearchOutcome {
    /// Looks up a previously-resolved reference of `resource`.
    ///
    /// `reference` is the reference object (or bare string) as it appears
    /// in the resource; local-fragment references are qualified by the
    /// owning resource's `Type/id` the same way they were at resolution
    /// time.
    pub fn resolved(&self, resource: &Value, reference: &Value) -> Option<&Value> {
        let key = reference_key(resource, reference)?;
        self.resolved_references.get(&key)
    }

    /// Number of distinct resolved references.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved_references.len()
    }
}

fn reference_str(reference: &Value) -> Option<&str> {
    match reference {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("reference").and_then(Value::as_str),
        _ => None,
    }
}

/// Normalized map key for a reference: local fragments are qualified with
/// the owning resource's `Type/id`, everything else keys by the reference
/// string itself.
fn reference_key(owner: &Value, reference: &Value) -> Option<String> {
    let reference = reference_str(reference)?;
    if reference.starts_with('#') {
        let owner_type = owner.get("resourceType").and_then(Value::as_str)?;
        let owner_id = owner.get("id").and_then(Value::as_str)?;
        Some(format!("{owner_type}/{owner_id}{reference}"))
    } else {
        Some(reference.to_string())
    }
}

impl FhirClient {
    /// Drains all pages of a search, invoking `on_page` with each page's
    /// resources.
    ///
    /// Iteration ends when no further `next` link resolves; a failed
    /// next-page fetch is treated as completion (and logged when it was a
    /// transport failure rather than a missing link).
    pub async fn drain<F>(
        &self,
        resource_type: &str,
        query: Value,
        mut on_page: F,
    ) -> ClientResult<()>
    where
        F: FnMut(Vec<Value>),
    {
        self.walk_pages(resource_type, query, |bundle| on_page(bundle_entries(bundle)))
            .await
    }

    /// Sequential page walk over the raw bundles.
    async fn walk_pages<F>(
        &self,
        resource_type: &str,
        query: Value,
        mut on_bundle: F,
    ) -> ClientResult<()>
    where
        F: FnMut(&Value),
    {
        let mut bundle = self.search(resource_type, query).await?;
        loop {
            on_bundle(&bundle);
            match self.next_page(&bundle).await {
                Ok(next) => bundle = next,
                Err(ClientError::MissingLink { .. }) => break,
                Err(err) => {
                    warn!(error = %err, "next-page fetch failed; treating as end of results");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Fetches every page of a search into one resource array.
    pub async fn fetch_all(&self, resource_type: &str, query: Value) -> ClientResult<Vec<Value>> {
        let mut all = Vec::new();
        self.drain(resource_type, query, |page| all.extend(page))
            .await?;
        Ok(all)
    }

    /// Fetches every page and resolves the given reference paths across
    /// the first page's resources.
    ///
    /// `reference_paths` entries have the form `"ResourceType.fieldName"`;
    /// each matching reference is resolved serially (contained, bundle,
    /// cache, then one GET) into the outcome's lookup map. The first
    /// page's bundle is kept and consulted, so `_include`d targets never
    /// hit the network.
    pub async fn fetch_all_with_references(
        &self,
        resource_type: &str,
        query: Value,
        reference_paths: &[&str],
    ) -> ClientResult<SearchOutcome> {
        let mut first_bundle: Option<Value> = None;
        let mut resources: Vec<Value> = Vec::new();
        self.walk_pages(resource_type, query, |bundle| {
            if first_bundle.is_none() {
                first_bundle = Some(bundle.clone());
            }
            resources.extend(bundle_entries(bundle));
        })
        .await?;

        let first_bundle = first_bundle.unwrap_or(Value::Null);
        let first_page = bundle_entries(&first_bundle);

        // Explicit work queue keeps resolution strictly sequential.
        let mut queue: VecDeque<(Value, Value)> = VecDeque::new();
        for path in reference_paths {
            let Some((path_type, field)) = path.split_once('.') else {
                warn!(path, "skipping malformed reference path");
                continue;
            };
            for resource in &first_page {
                if resource.get("resourceType").and_then(Value::as_str) != Some(path_type) {
                    continue;
                }
                match resource.get(field) {
                    Some(Value::Array(references)) => {
                        for reference in references {
                            queue.push_back((resource.clone(), reference.clone()));
                        }
                    }
                    Some(reference) => queue.push_back((resource.clone(), reference.clone())),
                    None => {}
                }
            }
        }

        let mut resolved_references = HashMap::new();
        while let Some((owner, reference)) = queue.pop_front() {
            let Some(key) = reference_key(&owner, &reference) else {
                continue;
            };
            if resolved_references.contains_key(&key) {
                continue;
            }
            let params = ResolveParams::new(reference)
                .with_resource(owner)
                .with_bundle(first_bundle.clone());
            if let Some(resource) = self.resolve(params).await? {
                resolved_references.insert(key, resource);
            }
        }

        Ok(SearchOutcome {
            resources,
            resolved_references,
        })
    }
}
