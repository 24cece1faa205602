//! Typed request bodies for the cypher and transaction endpoints.
//!
//! The wire bodies are dynamic JSON maps, but construction is tagged:
//! a request is either raw query text (wrapped by the library) or a
//! prebuilt object (validated, never rewrapped). Shape violations are
//! [`Error::Usage`] and are raised before any network call.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Body for [`Client::cypher`](crate::Client::cypher): raw query text
/// plus parameters, or a prebuilt request object.
#[derive(Debug, Clone)]
pub struct CypherRequest {
    kind: CypherKind,
    params: Map<String, Value>,
}

#[derive(Debug, Clone)]
enum CypherKind {
    Query(String),
    Prebuilt(Map<String, Value>),
}

impl CypherRequest {
    /// A raw cypher query, sent as `{"query": ...}`.
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            kind: CypherKind::Query(text.into()),
            params: Map::new(),
        }
    }

    /// A request object sent as-is. Attaching parameters to a prebuilt
    /// request is a usage error.
    pub fn prebuilt(request: Map<String, Value>) -> Self {
        Self {
            kind: CypherKind::Prebuilt(request),
            params: Map::new(),
        }
    }

    /// Add one query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replace the full parameter map.
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Build the wire body. `"params"` is omitted entirely when no
    /// parameters were supplied.
    pub fn into_body(self) -> Result<Value> {
        match self.kind {
            CypherKind::Query(text) => {
                let mut body = Map::new();
                body.insert("query".to_string(), Value::String(text));
                if !self.params.is_empty() {
                    body.insert("params".to_string(), Value::Object(self.params));
                }
                Ok(Value::Object(body))
            }
            CypherKind::Prebuilt(request) => {
                if !self.params.is_empty() {
                    return Err(Error::Usage(
                        "parameters cannot be combined with a prebuilt cypher request".to_string(),
                    ));
                }
                Ok(Value::Object(request))
            }
        }
    }
}

impl From<&str> for CypherRequest {
    fn from(text: &str) -> Self {
        CypherRequest::query(text)
    }
}

impl From<String> for CypherRequest {
    fn from(text: String) -> Self {
        CypherRequest::query(text)
    }
}

/// One statement in a transaction commit: raw text (wrapped as
/// `{"statement": ...}`) or an object that must already carry a
/// `"statement"` key.
#[derive(Debug, Clone)]
pub enum Statement {
    Text(String),
    Object(Map<String, Value>),
}

impl Statement {
    /// Statement object from query text, collapsing newlines and runs
    /// of whitespace to single spaces.
    pub fn query(text: &str) -> Self {
        let mut map = Map::new();
        map.insert(
            "statement".to_string(),
            Value::String(text.split_whitespace().collect::<Vec<_>>().join(" ")),
        );
        Statement::Object(map)
    }

    pub fn object(map: Map<String, Value>) -> Self {
        Statement::Object(map)
    }

    /// Attach a `"parameters"` entry, converting a text statement to
    /// its object form first.
    pub fn with_parameters(self, parameters: impl Into<Value>) -> Self {
        self.with_entry("parameters", parameters)
    }

    /// Attach an arbitrary entry (e.g. `"resultDataContents"`).
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = match self {
            Statement::Object(map) => map,
            Statement::Text(text) => {
                let mut map = Map::new();
                map.insert("statement".to_string(), Value::String(text));
                map
            }
        };
        map.insert(key.into(), value.into());
        Statement::Object(map)
    }

    fn into_value(self) -> Result<Value> {
        match self {
            Statement::Text(text) => {
                let mut map = Map::new();
                map.insert("statement".to_string(), Value::String(text));
                Ok(Value::Object(map))
            }
            Statement::Object(map) => {
                if !map.contains_key("statement") {
                    return Err(Error::Usage(
                        "transaction statement object must contain a \"statement\" key"
                            .to_string(),
                    ));
                }
                Ok(Value::Object(map))
            }
        }
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Statement::Text(text.to_string())
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Statement::Text(text)
    }
}

/// Body for [`Client::transaction_commit`](crate::Client::transaction_commit):
/// a list of statements, or a prebuilt object that must already carry
/// a `"statements"` key.
#[derive(Debug, Clone)]
pub enum TransactionRequest {
    Statements(Vec<Statement>),
    Prebuilt(Map<String, Value>),
}

impl TransactionRequest {
    pub fn into_body(self) -> Result<Value> {
        match self {
            TransactionRequest::Statements(statements) => {
                let statements = statements
                    .into_iter()
                    .map(Statement::into_value)
                    .collect::<Result<Vec<_>>>()?;
                let mut body = Map::new();
                body.insert("statements".to_string(), Value::Array(statements));
                Ok(Value::Object(body))
            }
            TransactionRequest::Prebuilt(request) => {
                if !request.contains_key("statements") {
                    return Err(Error::Usage(
                        "prebuilt transaction request must contain a \"statements\" key"
                            .to_string(),
                    ));
                }
                Ok(Value::Object(request))
            }
        }
    }
}

impl From<Vec<Statement>> for TransactionRequest {
    fn from(statements: Vec<Statement>) -> Self {
        TransactionRequest::Statements(statements)
    }
}

impl<const N: usize> From<[Statement; N]> for TransactionRequest {
    fn from(statements: [Statement; N]) -> Self {
        TransactionRequest::Statements(statements.into())
    }
}

impl From<Statement> for TransactionRequest {
    fn from(statement: Statement) -> Self {
        TransactionRequest::Statements(vec![statement])
    }
}

impl From<&str> for TransactionRequest {
    fn from(text: &str) -> Self {
        TransactionRequest::Statements(vec![Statement::from(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_cypher_query_with_params() {
        let body = CypherRequest::query("RETURN 1").param("x", 2).into_body().unwrap();
        assert_eq!(body, json!({"query": "RETURN 1", "params": {"x": 2}}));
    }

    #[test]
    fn test_cypher_query_omits_empty_params() {
        let body = CypherRequest::query("RETURN 1").into_body().unwrap();
        assert_eq!(body, json!({"query": "RETURN 1"}));
    }

    #[test]
    fn test_cypher_prebuilt_passes_through() {
        let request = object(json!({"query": "RETURN $x", "params": {"x": 1}}));
        let body = CypherRequest::prebuilt(request.clone()).into_body().unwrap();
        assert_eq!(body, Value::Object(request));
    }

    #[test]
    fn test_cypher_prebuilt_rejects_params() {
        let result = CypherRequest::prebuilt(object(json!({"query": "RETURN 1"})))
            .param("x", 2)
            .into_body();
        assert!(matches!(result, Err(Error::Usage(_))));
    }

    #[test]
    fn test_transaction_wraps_mixed_statements() {
        let request = TransactionRequest::from(vec![
            Statement::from("RETURN 1"),
            Statement::object(object(json!({"statement": "RETURN 2"}))),
        ]);
        assert_eq!(
            request.into_body().unwrap(),
            json!({"statements": [{"statement": "RETURN 1"}, {"statement": "RETURN 2"}]})
        );
    }

    #[test]
    fn test_statement_object_requires_statement_key() {
        let request =
            TransactionRequest::from(vec![Statement::object(object(json!({"query": "X"})))]);
        assert!(matches!(request.into_body(), Err(Error::Usage(_))));
    }

    #[test]
    fn test_prebuilt_transaction_passes_through_unchanged() {
        let request = object(json!({
            "statements": [{"statement": "RETURN 1", "parameters": {"x": 1}}],
            "resultDataContents": ["graph"]
        }));
        let body = TransactionRequest::Prebuilt(request.clone())
            .into_body()
            .unwrap();
        assert_eq!(body, Value::Object(request));
    }

    #[test]
    fn test_prebuilt_transaction_requires_statements_key() {
        let request = TransactionRequest::Prebuilt(object(json!({"statement": "X"})));
        assert!(matches!(request.into_body(), Err(Error::Usage(_))));
    }

    #[test]
    fn test_statement_query_collapses_whitespace() {
        let statement = Statement::query("MATCH (n)\n  WHERE n.name = $name\n  RETURN n")
            .with_parameters(json!({"name": "neo"}));
        assert_eq!(
            statement.into_value().unwrap(),
            json!({
                "statement": "MATCH (n) WHERE n.name = $name RETURN n",
                "parameters": {"name": "neo"}
            })
        );
    }
}
