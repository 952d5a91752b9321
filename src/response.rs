//! Response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// Envelope for `GET /api/:collection?envelope=true`.
#[derive(Serialize)]
pub struct CollectionEnvelope {
    pub success: bool,
    pub endpoint: String,
    pub data: Value,
    pub count: usize,
}

/// Number of entries a collection value represents: its length for arrays, 1 otherwise.
pub fn value_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// JSON type name used by the status endpoint.
pub fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

pub fn enveloped(endpoint: &str, data: Value) -> (StatusCode, Json<CollectionEnvelope>) {
    let count = value_count(&data);
    (
        StatusCode::OK,
        Json(CollectionEnvelope {
            success: true,
            endpoint: endpoint.to_string(),
            data,
            count,
        }),
    )
}

/// Endpoint paths advertised for a list of sanitized names.
pub fn endpoint_paths(names: &[String]) -> Vec<String> {
    names.iter().map(|n| format!("/api/{}", n)).collect()
}

pub fn error_body(code: &str, message: String, details: Option<Value>) -> Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_count_and_type() {
        assert_eq!(value_count(&json!([1, 2, 3])), 3);
        assert_eq!(value_count(&json!({"a": 1})), 1);
        assert_eq!(value_type(&json!([])), "array");
        assert_eq!(value_type(&json!(null)), "null");
        assert_eq!(value_type(&json!(true)), "boolean");
        assert_eq!(value_type(&json!("x")), "string");
    }

    #[test]
    fn test_endpoint_paths() {
        let names = vec!["students".to_string(), "courses".to_string()];
        assert_eq!(endpoint_paths(&names), vec!["/api/students", "/api/courses"]);
    }
}
