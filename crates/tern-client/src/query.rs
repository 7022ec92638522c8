//! Structured search query linearization.
//!
//! Translates a structured query object into the flat list of URL
//! parameters FHIR search expects. Supported shapes:
//!
//! - scalar / array leaf values: `{name: "Smith"}`, `{code: ["a", "b"]}`
//! - comparison operators: `{age: {$gt: 30}}` → `age=gt30`
//! - `$or` value lists, `$and` flattening, `$type` modifier siblings
//! - nested sub-fields: `{subject: {name: "x"}}` → `subject.name=x`
//! - `$sort` directives (bare field or `[field, direction]` pair)
//! - `$include` directives keyed by resource type
//!
//! Term order follows the insertion order of the source object's keys.

use serde_json::Value;
use tracing::warn;
use url::form_urlencoded;

use crate::error::{ClientError, ClientResult};

/// One linearized query clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerm {
    /// Parameter name, including any dotted sub-field path.
    pub param: String,
    /// Modifier suffix appended to the name (includes the leading `:`).
    pub modifier: Option<String>,
    /// Value prefix operator (`gt`, `lt`, `gte`, `lte`).
    pub operator: Option<String>,
    /// Parameter values; multiple values render comma-joined (OR).
    pub value: Vec<String>,
}

impl QueryTerm {
    fn simple(param: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            param: param.into(),
            modifier: None,
            operator: None,
            value,
        }
    }
}

/// Linearizes a structured query object into an ordered term list.
///
/// # Errors
///
/// Returns [`ClientError::Linearization`] when a leaf value has an
/// unsupported runtime type (boolean, null).
pub fn linearize(query: &Value) -> ClientResult<Vec<QueryTerm>> {
    let mut terms = Vec::new();
    let Some(object) = query.as_object() else {
        return Err(ClientError::linearization(type_name(query), "<root>"));
    };

    for (key, value) in object {
        match key.as_str() {
            "$sort" => linearize_sort(value, &mut terms),
            "$include" => linearize_include(value, &mut terms),
            _ => linearize_field(key, value, &mut terms)?,
        }
    }
    Ok(terms)
}

/// Renders a term list as a query string.
///
/// Each term renders as `param + modifier + "=" + operator + value`, with
/// multi-values comma-joined before percent-encoding.
#[must_use]
pub fn render(terms: &[QueryTerm]) -> String {
    terms
        .iter()
        .map(|term| {
            format!(
                "{}{}={}{}",
                term.param,
                term.modifier.as_deref().unwrap_or(""),
                term.operator.as_deref().unwrap_or(""),
                url_encode(&term.value.join(","))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn url_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn scalar_string(value: &Value, param: &str) -> ClientResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ClientError::linearization(type_name(other), param)),
    }
}

fn linearize_field(param: &str, value: &Value, terms: &mut Vec<QueryTerm>) -> ClientResult<()> {
    match value {
        Value::String(_) | Value::Number(_) => {
            terms.push(QueryTerm::simple(param, vec![scalar_string(value, param)?]));
            Ok(())
        }
        // An array leaf is a pipe-joined composite, one term.
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|v| scalar_string(v, param))
                .collect::<ClientResult<Vec<_>>>()?
                .join("|");
            terms.push(QueryTerm::simple(param, vec![joined]));
            Ok(())
        }
        Value::Object(object) => {
            let type_sibling = object.get("$type").and_then(Value::as_str);
            for (key, nested) in object {
                match key.as_str() {
                    "$type" => {}
                    "$and" => match nested {
                        Value::Array(clauses) => {
                            for clause in clauses {
                                linearize_field(param, clause, terms)?;
                            }
                        }
                        other => linearize_field(param, other, terms)?,
                    },
                    "$or" => {
                        let values = match nested {
                            Value::Array(items) => items
                                .iter()
                                .map(|v| scalar_string(v, param))
                                .collect::<ClientResult<Vec<_>>>()?,
                            other => vec![scalar_string(other, param)?],
                        };
                        terms.push(QueryTerm::simple(param, values));
                    }
                    op @ ("$gt" | "$lt" | "$gte" | "$lte") => {
                        terms.push(QueryTerm {
                            param: param.to_string(),
                            modifier: None,
                            operator: Some(op[1..].to_string()),
                            value: vec![scalar_string(nested, param)?],
                        });
                    }
                    other if other.starts_with('$') => {
                        terms.push(QueryTerm {
                            param: param.to_string(),
                            modifier: Some(format!(":{}", &other[1..])),
                            operator: None,
                            value: vec![scalar_string(nested, param)?],
                        });
                    }
                    sub_field => {
                        let nested_param = match type_sibling {
                            Some(type_name) => format!("{param}:{type_name}.{sub_field}"),
                            None => format!("{param}.{sub_field}"),
                        };
                        linearize_field(&nested_param, nested, terms)?;
                    }
                }
            }
            Ok(())
        }
        other => Err(ClientError::linearization(type_name(other), param)),
    }
}

fn linearize_sort(value: &Value, terms: &mut Vec<QueryTerm>) {
    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        single @ Value::String(_) => std::slice::from_ref(single),
        other => {
            warn!(entry = %other, "dropping malformed $sort directive");
            return;
        }
    };
    for entry in entries {
        match entry {
            Value::String(field) => terms.push(QueryTerm::simple("_sort", vec![field.clone()])),
            Value::Array(pair) if pair.len() == 2 => {
                match (pair[0].as_str(), pair[1].as_str()) {
                    (Some(field), Some(direction)) => terms.push(QueryTerm {
                        param: "_sort".to_string(),
                        modifier: Some(format!(":{direction}")),
                        operator: None,
                        value: vec![field.to_string()],
                    }),
                    _ => warn!(entry = %entry, "dropping malformed $sort entry"),
                }
            }
            other => warn!(entry = %other, "dropping malformed $sort entry"),
        }
    }
}

fn linearize_include(value: &Value, terms: &mut Vec<QueryTerm>) {
    let Some(object) = value.as_object() else {
        warn!(entry = %value, "dropping malformed $include directive");
        return;
    };
    for (resource_type, paths) in object {
        match paths {
            Value::String(path) => terms.push(QueryTerm::simple(
                "_include",
                vec![format!("{resource_type}.{path}")],
            )),
            Value::Array(paths) => {
                for path in paths {
                    match path.as_str() {
                        Some(path) => terms.push(QueryTerm::simple(
                            "_include",
                            vec![format!("{resource_type}.{path}")],
                        )),
                        None => warn!(entry = %path, "dropping malformed $include path"),
                    }
                }
            }
            other => warn!(entry = %other, "dropping malformed $include entry"),
        }
    }
}
