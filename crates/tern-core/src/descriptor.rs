//! In-flight HTTP request descriptor.
//!
//! A [`RequestDescriptor`] is the mutable mapping a request pipeline builds
//! up before it reaches the transport: method, URL, headers, body, plus any
//! domain payload (resource, bundle, query) the pipeline steps consult.
//!
//! Fields are addressed by dotted path (`"headers.Accept"`,
//! `"resource.id"`), with intermediate objects created on write. Every
//! field is optional while the descriptor is under construction; `method`
//! and `url` must be resolved before the descriptor is handed to the
//! transport.
//!
//! A descriptor is created fresh per call and owned by exactly one
//! in-flight request. It is never shared across concurrent calls.

use serde_json::{Map, Value};

/// A mutable HTTP request under construction.
///
/// Backed by an insertion-ordered JSON object so middleware can address
/// nested fields by dotted path without a fixed schema.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    inner: Map<String, Value>,
}

impl RequestDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Map::new() }
    }

    /// Creates a descriptor from an existing JSON object.
    #[must_use]
    pub fn from_map(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    /// Looks up a value by dotted path.
    ///
    /// Returns `None` if any intermediate segment is missing or is not an
    /// object.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self.inner.get(path.split('.').next()?)?;
        for segment in path.split('.').skip(1) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Writes a value at a dotted path, creating intermediate objects as
    /// needed.
    ///
    /// An existing non-object intermediate is replaced by an object so the
    /// write always succeeds.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let mut segments = path.split('.').collect::<Vec<_>>();
        let leaf = segments.pop().expect("path must be non-empty");

        let mut current = &mut self.inner;
        for segment in segments {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot.as_object_mut().expect("slot was just made an object");
        }
        current.insert(leaf.to_string(), value);
    }

    /// Removes and returns the value at a top-level key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    /// The HTTP method, if already resolved.
    pub fn method(&self) -> Option<&str> {
        self.get_path("method").and_then(Value::as_str)
    }

    /// The request URL, if already resolved.
    pub fn url(&self) -> Option<&str> {
        self.get_path("url").and_then(Value::as_str)
    }

    /// The request body payload, if any.
    pub fn data(&self) -> Option<&Value> {
        self.get_path("data")
    }

    /// Header entries as string pairs, in insertion order.
    pub fn headers(&self) -> Vec<(String, String)> {
        match self.get_path("headers").and_then(Value::as_object) {
            Some(map) => map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether the descriptor asked for debug logging.
    pub fn debug(&self) -> bool {
        self.get_path("debug").and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Map<String, Value>> for RequestDescriptor {
    fn from(inner: Map<String, Value>) -> Self {
        Self::from_map(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_path_creates_intermediates() {
        let mut d = RequestDescriptor::new();
        d.set_path("headers.Accept", json!("application/json"));
        assert_eq!(
            d.get_path("headers.Accept"),
            Some(&json!("application/json"))
        );
    }

    #[test]
    fn test_set_path_deep() {
        let mut d = RequestDescriptor::new();
        d.set_path("a.b.c", json!(1));
        assert_eq!(d.get_path("a.b.c"), Some(&json!(1)));
        assert!(d.get_path("a.b").unwrap().is_object());
    }

    #[test]
    fn test_set_path_replaces_scalar_intermediate() {
        let mut d = RequestDescriptor::new();
        d.set_path("a", json!("scalar"));
        d.set_path("a.b", json!(2));
        assert_eq!(d.get_path("a.b"), Some(&json!(2)));
    }

    #[test]
    fn test_get_path_missing() {
        let d = RequestDescriptor::new();
        assert_eq!(d.get_path("nope"), None);
        assert_eq!(d.get_path("no.pe"), None);
    }

    #[test]
    fn test_typed_accessors() {
        let mut d = RequestDescriptor::new();
        d.set_path("method", json!("GET"));
        d.set_path("url", json!("http://x/Patient/5"));
        d.set_path("headers.Accept", json!("application/json"));
        assert_eq!(d.method(), Some("GET"));
        assert_eq!(d.url(), Some("http://x/Patient/5"));
        assert_eq!(
            d.headers(),
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert!(!d.debug());
    }
}
