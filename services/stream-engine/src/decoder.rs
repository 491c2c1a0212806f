//! Field record decoder
//!
//! Turns one provider field set into a [`Record`]. Decoding never fails:
//! a missing or unparseable field leaves the matching record field at its
//! default (empty identity, zero score/duration). Callers that need an
//! identity check [`Record::has_identity`].

use serde_json::Value;
use tracing::trace;
use types::field::RawField;
use types::record::Record;
use types::uint::Uint256;

/// Field name carrying the identity.
pub const IDENTITY_FIELD: &str = "player";
/// Field name carrying the score.
pub const SCORE_FIELD: &str = "score";
/// Field name carrying the duration.
pub const DURATION_FIELD: &str = "playTime";

/// Decode one field set. Unknown field names are ignored.
pub fn decode_record(fields: &[RawField]) -> Record {
    let mut record = Record::default();

    for field in fields {
        let value = field.unwrapped_value();
        match field.name.as_str() {
            IDENTITY_FIELD => record.identity = identity_of(value),
            SCORE_FIELD => record.score = integer_of(&field.name, value),
            DURATION_FIELD => record.duration = integer_of(&field.name, value),
            _ => {}
        }
    }

    record
}

/// Decode a batch, preserving provider order.
pub fn decode_all(items: &[Vec<RawField>]) -> Vec<Record> {
    items.iter().map(|fields| decode_record(fields)).collect()
}

fn identity_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

fn integer_of(name: &str, value: &Value) -> Uint256 {
    Uint256::from_json(value).unwrap_or_else(|err| {
        trace!(field = name, error = %err, "Field did not decode as integer, using zero");
        Uint256::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrapped(name: &str, value: Value) -> RawField {
        RawField::new(name, json!({ "name": name, "value": value }))
    }

    #[test]
    fn test_decode_known_record() {
        let fields = vec![
            RawField::new("player", json!("0xabc")),
            RawField::new("score", json!(42)),
            RawField::new("playTime", json!(7)),
        ];
        let record = decode_record(&fields);
        assert_eq!(
            record,
            Record::new("0xabc", Uint256::from(42u64), Uint256::from(7u64))
        );
    }

    #[test]
    fn test_decode_wrapped_values() {
        let fields = vec![
            wrapped("player", json!("0xabc")),
            wrapped("score", json!("42")),
            wrapped("playTime", json!("7")),
        ];
        let record = decode_record(&fields);
        assert_eq!(record.identity, "0xabc");
        assert_eq!(record.score, Uint256::from(42u64));
        assert_eq!(record.duration, Uint256::from(7u64));
    }

    #[test]
    fn test_decode_big_integer_strings() {
        let fields = vec![
            RawField::new("player", json!("0xabc")),
            RawField::new("score", json!("340282366920938463463374607431768211456")),
        ];
        let record = decode_record(&fields);
        assert_eq!(
            record.score.to_string(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let record = decode_record(&[RawField::new("score", json!(5))]);
        assert!(!record.has_identity());
        assert_eq!(record.score, Uint256::from(5u64));
        assert_eq!(record.duration, Uint256::ZERO);

        assert_eq!(decode_record(&[]), Record::default());
    }

    #[test]
    fn test_unparseable_values_default() {
        let fields = vec![
            RawField::new("player", json!(17)),
            RawField::new("score", json!("not a number")),
            RawField::new("playTime", json!(null)),
        ];
        assert_eq!(decode_record(&fields), Record::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let fields = vec![
            RawField::new("player", json!("0xabc")),
            RawField::new("level", json!(99)),
            RawField::new("score", json!(1)),
        ];
        let record = decode_record(&fields);
        assert_eq!(record.score, Uint256::from(1u64));
        assert_eq!(record.duration, Uint256::ZERO);
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let items = vec![
            vec![RawField::new("player", json!("0x1"))],
            vec![RawField::new("player", json!("0x2"))],
        ];
        let records = decode_all(&items);
        assert_eq!(records[0].identity, "0x1");
        assert_eq!(records[1].identity, "0x2");
    }
}
