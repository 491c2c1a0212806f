//! Raw field sets as returned by the stream provider
//!
//! One stream item is an ordered list of named fields. The provider may wrap
//! a field's value one level deep (`{"value": {"name": .., "value": 42}}`),
//! so readers go through [`RawField::unwrapped_value`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named, typed field of a stream item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// An ordered group of fields describing one logical event.
pub type RawFieldSet = Vec<RawField>;

impl RawField {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            value,
        }
    }

    /// The field value with at most one wrapper level removed.
    ///
    /// A wrapper whose inner `value` is null or absent yields the wrapper itself.
    pub fn unwrapped_value(&self) -> &Value {
        match self.value.get("value") {
            Some(inner) if !inner.is_null() => inner,
            _ => &self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_plain_value() {
        let field = RawField::new("score", json!(42));
        assert_eq!(field.unwrapped_value(), &json!(42));
    }

    #[test]
    fn test_unwrap_one_level_only() {
        let field = RawField::new(
            "score",
            json!({"name": "score", "value": {"value": 42}}),
        );
        assert_eq!(field.unwrapped_value(), &json!({"value": 42}));
    }

    #[test]
    fn test_null_inner_falls_back_to_outer() {
        let field = RawField::new("player", json!({"value": null}));
        assert_eq!(field.unwrapped_value(), &json!({"value": null}));
    }

    #[test]
    fn test_deserialize_provider_shape() {
        let raw = r#"{"name":"player","type":"address","value":{"name":"player","type":"address","value":"0xabc"}}"#;
        let field: RawField = serde_json::from_str(raw).unwrap();
        assert_eq!(field.field_type.as_deref(), Some("address"));
        assert_eq!(field.unwrapped_value(), &json!("0xabc"));
    }

    #[test]
    fn test_missing_value_defaults_to_null() {
        let field: RawField = serde_json::from_str(r#"{"name":"score"}"#).unwrap();
        assert!(field.value.is_null());
    }
}
