//! Schema codec for stream payloads
//!
//! A schema is a comma separated list of `<type> <name>` pairs. Every field is
//! encoded as one 32-byte word in schema order:
//! - `address`: 20 bytes, left-padded with 12 zero bytes
//! - `uint256`: big-endian
//!
//! Decoding produces the same field-set shape the provider returns, one
//! wrapper level deep, so decoded payloads flow through the same record
//! decoder as provider data.

use serde_json::{json, Value};
use types::errors::CodecError;
use types::field::{RawField, RawFieldSet};
use types::uint::{Uint256, WORD_BYTES};

/// The player score schema.
pub const PLAYER_SCHEMA: &str = "address player, uint256 score, uint256 playTime";

/// Registration id of the player score schema.
pub const PLAYER_SCHEMA_NAME: &str = "player_score";

/// Byte width of an address.
pub const ADDRESS_BYTES: usize = 20;

/// Supported schema field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Address,
    Uint256,
}

impl FieldType {
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        match s {
            "address" => Ok(FieldType::Address),
            "uint256" => Ok(FieldType::Uint256),
            other => Err(CodecError::UnsupportedType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Address => "address",
            FieldType::Uint256 => "uint256",
        }
    }
}

/// One `<type> <name>` entry of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

/// A value ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Address([u8; ADDRESS_BYTES]),
    Uint(Uint256),
}

impl FieldValue {
    /// Parse an address from `0x`-prefixed hex.
    pub fn address(text: &str) -> Result<Self, CodecError> {
        parse_address(text).map(FieldValue::Address)
    }

    fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Address(_) => FieldType::Address,
            FieldValue::Uint(_) => FieldType::Uint256,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Address(bytes) => Value::String(format_address(bytes)),
            FieldValue::Uint(v) => Value::String(v.to_decimal_string()),
        }
    }
}

/// Encodes and decodes payloads for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEncoder {
    schema: String,
    fields: Vec<FieldDef>,
}

impl SchemaEncoder {
    /// Parse a schema text.
    pub fn new(schema: &str) -> Result<Self, CodecError> {
        let mut fields = Vec::new();
        for part in schema.split(',') {
            let tokens: Vec<&str> = part.split_whitespace().collect();
            match tokens.as_slice() {
                [ty, name] => fields.push(FieldDef {
                    name: name.to_string(),
                    field_type: FieldType::parse(ty)?,
                }),
                _ => return Err(CodecError::MalformedSchema(schema.to_string())),
            }
        }

        Ok(Self {
            schema: schema.to_string(),
            fields,
        })
    }

    /// Encoder for [`PLAYER_SCHEMA`].
    pub fn player() -> Self {
        let field = |name: &str, field_type| FieldDef {
            name: name.to_string(),
            field_type,
        };
        Self {
            schema: PLAYER_SCHEMA.to_string(),
            fields: vec![
                field("player", FieldType::Address),
                field("score", FieldType::Uint256),
                field("playTime", FieldType::Uint256),
            ],
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Size of an encoded payload in bytes.
    pub fn encoded_len(&self) -> usize {
        self.fields.len() * WORD_BYTES
    }

    /// Encode values given in schema order.
    pub fn encode(&self, values: &[FieldValue]) -> Result<Vec<u8>, CodecError> {
        if values.len() != self.fields.len() {
            return Err(CodecError::ArityMismatch {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }

        let mut out = Vec::with_capacity(self.encoded_len());
        for (def, value) in self.fields.iter().zip(values) {
            if value.field_type() != def.field_type {
                return Err(CodecError::TypeMismatch {
                    field: def.name.clone(),
                    expected: def.field_type.as_str().to_string(),
                });
            }
            let mut word = [0u8; WORD_BYTES];
            match value {
                FieldValue::Address(bytes) => {
                    word[WORD_BYTES - ADDRESS_BYTES..].copy_from_slice(bytes)
                }
                FieldValue::Uint(v) => word = v.to_be_bytes(),
            }
            out.extend_from_slice(&word);
        }
        Ok(out)
    }

    /// Encode to the `0x`-hex form carried on the wire.
    pub fn encode_hex(&self, values: &[FieldValue]) -> Result<String, CodecError> {
        self.encode(values)
            .map(|bytes| format!("0x{}", hex::encode(bytes)))
    }

    /// Decode a payload into a provider-shaped field set.
    pub fn decode(&self, data: &[u8]) -> Result<RawFieldSet, CodecError> {
        if data.len() != self.encoded_len() {
            return Err(CodecError::LengthMismatch {
                expected: self.encoded_len(),
                actual: data.len(),
            });
        }

        let fields = self
            .fields
            .iter()
            .zip(data.chunks_exact(WORD_BYTES))
            .map(|(def, chunk)| {
                let mut word = [0u8; WORD_BYTES];
                word.copy_from_slice(chunk);
                let value = match def.field_type {
                    FieldType::Address => {
                        let mut bytes = [0u8; ADDRESS_BYTES];
                        bytes.copy_from_slice(&word[WORD_BYTES - ADDRESS_BYTES..]);
                        FieldValue::Address(bytes)
                    }
                    FieldType::Uint256 => FieldValue::Uint(Uint256::from_be_bytes(word)),
                };
                let ty = def.field_type.as_str();
                RawField {
                    name: def.name.clone(),
                    field_type: Some(ty.to_string()),
                    value: json!({
                        "name": def.name,
                        "type": ty,
                        "value": value.to_json(),
                    }),
                }
            })
            .collect();

        Ok(fields)
    }

    /// Decode the `0x`-hex wire form.
    pub fn decode_hex(&self, data: &str) -> Result<RawFieldSet, CodecError> {
        let digits = data.strip_prefix("0x").unwrap_or(data);
        let bytes = hex::decode(digits).map_err(|_| CodecError::LengthMismatch {
            expected: self.encoded_len(),
            actual: digits.len() / 2,
        })?;
        self.decode(&bytes)
    }
}

/// Parse `0x` + 40 hex digits.
pub fn parse_address(text: &str) -> Result<[u8; ADDRESS_BYTES], CodecError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| CodecError::InvalidAddress(text.to_string()))?;

    let mut bytes = [0u8; ADDRESS_BYTES];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| CodecError::InvalidAddress(text.to_string()))?;
    Ok(bytes)
}

/// Lowercase `0x` form of an address.
pub fn format_address(bytes: &[u8; ADDRESS_BYTES]) -> String {
    format!("0x{}", hex::encode(bytes))
}
