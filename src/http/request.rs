//! Outgoing GraphQL request envelope.

use serde::Serialize;
use serde_json::{Map, Value};

/// Variables sent alongside a GraphQL document.
///
/// The schema belongs to the remote service, so the mapping stays untyped at
/// this boundary.
pub type Variables = Map<String, Value>;

/// The standard GraphQL POST body: `{ "query": ..., "variables": ... }`.
///
/// `variables` is omitted from the serialized body when absent.
///
/// # Examples
///
/// ```
/// use anigate::http::{GraphQlRequest, Variables};
///
/// let mut vars = Variables::new();
/// vars.insert("id".into(), 1.into());
/// let body = serde_json::to_string(&GraphQlRequest::new("query { x }", Some(&vars))).unwrap();
/// assert_eq!(body, r#"{"query":"query { x }","variables":{"id":1}}"#);
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Variables>,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(query: &'a str, variables: Option<&'a Variables>) -> Self {
        Self { query, variables }
    }

    /// Returns the GraphQL document text.
    pub fn query(&self) -> &'a str {
        self.query
    }

    /// Returns the variable mapping, if any.
    pub fn variables(&self) -> Option<&'a Variables> {
        self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_absent_variables() {
        let body = serde_json::to_value(GraphQlRequest::new("{ GenreCollection }", None)).unwrap();
        assert_eq!(body, json!({ "query": "{ GenreCollection }" }));
    }

    #[test]
    fn keeps_empty_variables() {
        let vars = Variables::new();
        let body = serde_json::to_value(GraphQlRequest::new("{ x }", Some(&vars))).unwrap();
        assert_eq!(body, json!({ "query": "{ x }", "variables": {} }));
    }
}
