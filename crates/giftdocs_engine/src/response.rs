use serde::Serialize;
use serde_json::{Map, Value};

use crate::table::PaginationBlock;

/// Builder for a mock API response body.
///
/// Fields come out in the order they were added, after `status` and `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    fields: Map<String, Value>,
}

impl MockResponse {
    pub fn success(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::Bool(true));
        fields.insert("message".to_string(), Value::String(message.into()));
        Self { fields }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn data(self, data: Value) -> Self {
        self.with("data", data)
    }

    pub fn pagination(self, block: &PaginationBlock) -> Self {
        self.with("pagination", to_value(block))
    }

    /// Explicit `"pagination": null`, as the single-record endpoints send it.
    pub fn no_pagination(self) -> Self {
        self.with("pagination", Value::Null)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// The one error shape every endpoint uses: `{status: false, message, data: null}`.
pub fn error_body(message: impl Into<String>) -> Value {
    let mut fields = Map::new();
    fields.insert("status".to_string(), Value::Bool(false));
    fields.insert("message".to_string(), Value::String(message.into()));
    fields.insert("data".to_string(), Value::Null);
    Value::Object(fields)
}

fn to_value<T: Serialize>(value: &T) -> Value {
    // plain structs of numbers and strings always serialize
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_order() {
        let body = MockResponse::success("Success")
            .with("duration", json!(0.5))
            .data(json!([]))
            .no_pagination()
            .into_value();
        assert_eq!(
            body.to_string(),
            r#"{"status":true,"message":"Success","duration":0.5,"data":[],"pagination":null}"#
        );
    }

    #[test]
    fn test_error_body() {
        assert_eq!(
            error_body("Product not found").to_string(),
            r#"{"status":false,"message":"Product not found","data":null}"#
        );
    }
}
