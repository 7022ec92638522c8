//! Chainable URL path templates.
//!
//! A [`PathTemplate`] composes a URL segment by segment. Each segment
//! expression is resolved against the request descriptor:
//!
//! - `":a || :b"` — required lookup chain: evaluate dotted path `a`, then
//!   `b`, first non-null wins; failure to resolve any alternative is a
//!   [`ClientError::MissingParameter`].
//! - a bare expression — descriptor lookup falling back to the expression
//!   itself as a literal (`"baseUrl"` resolves the configured base URL,
//!   `"metadata"` stays literal).
//!
//! A resolved template is itself a middleware that sets `url` on the
//! descriptor, so it chains with the rest of the pipeline.

use serde_json::Value;
use tern_core::RequestDescriptor;

use crate::error::{ClientError, ClientResult};
use crate::middleware::{Middleware, map_request};

#[derive(Debug, Clone)]
enum Segment {
    /// Required lookup alternatives, in priority order.
    Required {
        expression: String,
        alternatives: Vec<String>,
    },
    /// Lookup with the expression itself as the literal fallback.
    LiteralOrLookup(String),
}

/// A chainable URL path template.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Starts a template from a first segment expression.
    #[must_use]
    pub fn root(expression: &str) -> Self {
        Self {
            segments: vec![parse_segment(expression)],
        }
    }

    /// Appends a `/`-separated segment.
    #[must_use]
    pub fn slash(mut self, expression: &str) -> Self {
        self.segments.push(parse_segment(expression));
        self
    }

    /// Resolves the full URL against a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingParameter`] when a required segment
    /// resolves to nothing; the error names the unresolved expression and
    /// carries the descriptor for diagnostics.
    pub fn resolve(&self, descriptor: &RequestDescriptor) -> ClientResult<String> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            parts.push(resolve_segment(segment, descriptor)?);
        }
        Ok(parts.join("/"))
    }

    /// Converts the template into a middleware that sets `url`.
    #[must_use]
    pub fn into_middleware(self) -> Middleware {
        map_request(move |descriptor| {
            let url = self.resolve(descriptor)?;
            descriptor.set_path("url", Value::String(url));
            Ok(())
        })
    }
}

fn parse_segment(expression: &str) -> Segment {
    if expression.contains(':') {
        let alternatives = expression
            .split("||")
            .map(|alt| alt.trim().trim_start_matches(':').to_string())
            .collect();
        Segment::Required {
            expression: expression.to_string(),
            alternatives,
        }
    } else {
        Segment::LiteralOrLookup(expression.to_string())
    }
}

fn lookup(descriptor: &RequestDescriptor, path: &str) -> Option<String> {
    match descriptor.get_path(path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resolve_segment(segment: &Segment, descriptor: &RequestDescriptor) -> ClientResult<String> {
    match segment {
        Segment::Required {
            expression,
            alternatives,
        } => alternatives
            .iter()
            .find_map(|alt| lookup(descriptor, alt))
            .ok_or_else(|| {
                ClientError::missing_parameter(
                    expression.clone(),
                    format!("{:?}", descriptor.as_map()),
                )
            }),
        Segment::LiteralOrLookup(expression) => {
            Ok(lookup(descriptor, expression).unwrap_or_else(|| expression.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(fields: Value) -> RequestDescriptor {
        RequestDescriptor::from_map(fields.as_object().unwrap().clone())
    }

    #[test]
    fn test_resolves_lookups_and_literals() {
        let template = PathTemplate::root("baseUrl").slash(":type").slash(":id");
        let d = descriptor(json!({"baseUrl": "http://x", "type": "Patient", "id": "5"}));
        assert_eq!(template.resolve(&d).unwrap(), "http://x/Patient/5");
    }

    #[test]
    fn test_literal_segment() {
        let template = PathTemplate::root("baseUrl").slash("metadata");
        let d = descriptor(json!({"baseUrl": "http://x"}));
        assert_eq!(template.resolve(&d).unwrap(), "http://x/metadata");
    }

    #[test]
    fn test_missing_required_segment_fails() {
        let template = PathTemplate::root("baseUrl").slash(":type").slash(":id");
        let d = descriptor(json!({"baseUrl": "http://x", "type": "Patient"}));
        let err = template.resolve(&d).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MissingParameter { ref expression, .. } if expression == ":id"
        ));
    }

    #[test]
    fn test_alternatives_first_non_null_wins() {
        let template = PathTemplate::root(":resource.id || :id");
        let d = descriptor(json!({"id": "fallback"}));
        assert_eq!(template.resolve(&d).unwrap(), "fallback");

        let d = descriptor(json!({"resource": {"id": "primary"}, "id": "fallback"}));
        assert_eq!(template.resolve(&d).unwrap(), "primary");
    }

    #[test]
    fn test_numeric_lookup() {
        let template = PathTemplate::root("baseUrl").slash(":versionId");
        let d = descriptor(json!({"baseUrl": "http://x", "versionId": 3}));
        assert_eq!(template.resolve(&d).unwrap(), "http://x/3");
    }

    #[tokio::test]
    async fn test_into_middleware_sets_url() {
        use crate::middleware::Handler;
        use std::sync::{Arc, Mutex};
        use tern_core::HttpResponse;

        let template = PathTemplate::root("baseUrl").slash(":type");
        let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&seen);
        let terminal: Handler = Arc::new(move |d| {
            *captured.lock().unwrap() = d.url().map(str::to_string);
            Box::pin(std::future::ready(Ok(HttpResponse::ok(Value::Null))))
        });

        let handler = template.into_middleware().apply(terminal);
        handler(descriptor(json!({"baseUrl": "http://x", "type": "Patient"})))
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().take().unwrap(), "http://x/Patient");
    }
}
