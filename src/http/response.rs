//! Incoming GraphQL response envelope.
//!
//! A reply is only usable when it carries a non-null `data` member and no
//! `errors`. Partial results (data alongside errors) are rejected as a whole.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Reasons a well-formed HTTP reply still cannot be used.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response body is not a GraphQL envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("GraphQL errors: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("response carries no data")]
    MissingData,
}

/// One entry of the GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// The GraphQL reply body: `{ "data": ..., "errors": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
    /// Parses a raw reply body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::Malformed`] if the body is not JSON shaped
    /// like a GraphQL envelope.
    pub fn parse(body: &[u8]) -> Result<Self, ResponseError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Extracts the `data` payload.
    ///
    /// # Errors
    ///
    /// - [`ResponseError::GraphQl`] — the `errors` array is non-empty.
    /// - [`ResponseError::MissingData`] — `data` is absent or `null`.
    pub fn into_data(self) -> Result<Value, ResponseError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(ResponseError::GraphQl {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }
        match self.data {
            Some(Value::Null) | None => Err(ResponseError::MissingData),
            Some(data) => Ok(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_data() {
        let body = br#"{"data":{"GenreCollection":["Action","Drama"]}}"#;
        let data = GraphQlResponse::parse(body).unwrap().into_data().unwrap();
        assert_eq!(data, json!({ "GenreCollection": ["Action", "Drama"] }));
    }

    #[test]
    fn errors_win_over_data() {
        let body = br#"{"data":{"Media":null},"errors":[{"message":"Not Found.","status":404}]}"#;
        let response = GraphQlResponse::parse(body).unwrap();
        match response.into_data() {
            Err(ResponseError::GraphQl { messages }) => assert_eq!(messages, vec!["Not Found."]),
            other => panic!("expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn empty_errors_array_is_ignored() {
        let body = br#"{"data":{"x":1},"errors":[]}"#;
        let data = GraphQlResponse::parse(body).unwrap().into_data().unwrap();
        assert_eq!(data, json!({ "x": 1 }));
    }

    #[test]
    fn null_data_is_missing() {
        let response = GraphQlResponse::parse(br#"{"data":null}"#).unwrap();
        assert!(matches!(response.into_data(), Err(ResponseError::MissingData)));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            GraphQlResponse::parse(b"<html>bad gateway</html>"),
            Err(ResponseError::Malformed(_))
        ));
    }
}
