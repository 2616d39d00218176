//! Decoding of cart service response bodies.
//!
//! `GET /cart` wraps items as `{"data": {"items": [...]}}`. Mutation
//! responses have been seen in several shapes; the first array found among
//! the accepted locations wins and anything else decodes as an empty cart.

use crate::error::CartError;
use crate::types::CartLineItem;
use serde_json::Value;

/// Items of a `GET /cart` response (`data.items`).
///
/// # Errors
///
/// Returns [`CartError::Decode`] if the array holds malformed items.
pub fn cart_items(body: &Value) -> Result<Vec<CartLineItem>, CartError> {
    decode_items(body.pointer("/data/items"))
}

/// Items of a remove or update response.
///
/// Accepted locations, in order: the root, `data`, `data.items`, `items`.
///
/// # Errors
///
/// Returns [`CartError::Decode`] if the array holds malformed items.
pub fn mutation_items(body: &Value) -> Result<Vec<CartLineItem>, CartError> {
    let located = [
        Some(body),
        body.get("data"),
        body.pointer("/data/items"),
        body.get("items"),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| candidate.is_array());

    decode_items(located)
}

/// Decode an item array; a missing or non-array value is an empty cart.
fn decode_items(value: Option<&Value>) -> Result<Vec<CartLineItem>, CartError> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| CartError::Decode(e.to_string()))
            })
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => {
            tracing::warn!(found = json_kind(other), "Expected an item array, treating cart as empty");
            Ok(Vec::new())
        },
    }
}

/// Human-readable message from an error response body.
///
/// Prefers a `message` or `error` string field, falling back to the raw body.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str) -> Value {
        json!({"id": id, "eventId": "E1", "ticketId": "T1", "price": 10, "quantity": 1})
    }

    #[test]
    fn test_cart_items_reads_data_items() {
        let body = json!({"data": {"items": [item("L1"), item("L2")]}});
        let items = cart_items(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id.as_str(), "L2");
    }

    #[test]
    fn test_cart_items_missing_is_empty() {
        assert!(cart_items(&json!({"data": {}})).unwrap().is_empty());
        assert!(cart_items(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_mutation_items_accepts_every_shape() {
        let shapes = [
            json!([item("L1")]),
            json!({"data": [item("L1")]}),
            json!({"data": {"items": [item("L1")]}}),
            json!({"items": [item("L1")]}),
        ];
        for body in shapes {
            let items = mutation_items(&body).unwrap();
            assert_eq!(items.len(), 1, "shape {body}");
        }
    }

    #[test]
    fn test_mutation_items_unknown_shape_is_empty() {
        assert!(mutation_items(&json!({"ok": true})).unwrap().is_empty());
        assert!(mutation_items(&json!({"data": {"items": "nope"}})).unwrap().is_empty());
        assert!(mutation_items(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_item_is_decode_error() {
        let body = json!({"data": {"items": [{"id": "L1"}]}});
        assert!(matches!(cart_items(&body), Err(CartError::Decode(_))));
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(error_message(r#"{"message":"sold out"}"#), "sold out");
        assert_eq!(error_message(r#"{"error":"bad id"}"#), "bad id");
        assert_eq!(error_message(" plain text \n"), "plain text");
    }
}
