//! FHIR reference string utilities.
//!
//! FHIR references appear in several forms:
//! - Contained: `#med1` (resolved inside the owning resource)
//! - Relative: `Patient/123` (resolved against the server base URL)
//! - Absolute: `http://example.org/fhir/Patient/123`
//!
//! The client resolves all three; classification decides where to look.

/// A classified FHIR reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReference {
    /// A contained reference (`#id`), resolvable only inside the owning
    /// resource's `contained` array.
    Contained(String),
    /// An absolute URL reference.
    Absolute(String),
    /// A relative `Type/id` reference.
    Relative(String),
}

/// Classifies a reference string.
#[must_use]
pub fn parse_reference(reference: &str) -> ParsedReference {
    if let Some(id) = reference.strip_prefix('#') {
        ParsedReference::Contained(id.to_string())
    } else if reference.contains("://") {
        ParsedReference::Absolute(reference.to_string())
    } else {
        ParsedReference::Relative(reference.to_string())
    }
}

/// Absolutizes a reference against a base URL.
///
/// Absolute references are returned unchanged; relative references are
/// joined to the base with a single `/`. Contained references have no
/// absolute form and are returned as-is.
#[must_use]
pub fn absolute_reference_url(reference: &str, base_url: &str) -> String {
    match parse_reference(reference) {
        ParsedReference::Absolute(url) => url,
        ParsedReference::Relative(rel) => {
            format!("{}/{}", base_url.trim_end_matches('/'), rel)
        }
        ParsedReference::Contained(_) => reference.to_string(),
    }
}
