//! 256-bit unsigned integers for scores and durations
//!
//! Stream values are `uint256` on the wire, which is far beyond what `u64`
//! (or a JSON double) can carry. `Uint256` stores the 32 big-endian bytes
//! directly, so the derived `Ord` is numeric order and encoding to a schema
//! word is a copy.
//!
//! Values always serialize as canonical decimal strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::errors::CodecError;

/// Width of one encoded word in bytes.
pub const WORD_BYTES: usize = 32;

/// Unsigned 256-bit integer, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uint256([u8; WORD_BYTES]);

impl Uint256 {
    pub const ZERO: Uint256 = Uint256([0u8; WORD_BYTES]);
    pub const MAX: Uint256 = Uint256([0xff; WORD_BYTES]);

    /// Construct from raw big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }

    /// Raw big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; WORD_BYTES] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Parse a decimal string (`"42"`), a hex string (`"0x2a"`), or a
    /// BigInt-style string with a trailing `n` (`"42n"`).
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let trimmed = text.trim();
        let trimmed = trimmed.strip_suffix('n').unwrap_or(trimmed);

        if let Some(hex_digits) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            return Self::parse_hex(hex_digits, text);
        }
        Self::parse_decimal(trimmed, text)
    }

    fn parse_decimal(digits: &str, original: &str) -> Result<Self, CodecError> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodecError::InvalidInteger(original.to_string()));
        }

        let mut bytes = [0u8; WORD_BYTES];
        for digit in digits.bytes() {
            // bytes = bytes * 10 + digit, least significant byte last
            let mut carry = u32::from(digit - b'0');
            for byte in bytes.iter_mut().rev() {
                let acc = u32::from(*byte) * 10 + carry;
                *byte = (acc & 0xff) as u8;
                carry = acc >> 8;
            }
            if carry != 0 {
                return Err(CodecError::Overflow(original.to_string()));
            }
        }
        Ok(Self(bytes))
    }

    fn parse_hex(digits: &str, original: &str) -> Result<Self, CodecError> {
        if digits.is_empty() {
            return Err(CodecError::InvalidInteger(original.to_string()));
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > WORD_BYTES * 2 {
            return Err(CodecError::Overflow(original.to_string()));
        }

        let padded = format!("{:0>width$}", significant, width = WORD_BYTES * 2);
        let mut bytes = [0u8; WORD_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| CodecError::InvalidInteger(original.to_string()))?;
        Ok(Self(bytes))
    }

    /// Coerce a JSON value into an integer.
    ///
    /// Accepts non-negative integers, integral non-negative floats, and any
    /// string form understood by [`Uint256::parse`].
    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Number(number) => {
                if let Some(v) = number.as_u64() {
                    Ok(Self::from(v))
                } else if let Some(v) = number.as_f64() {
                    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                        Self::from_integral_f64(v)
                            .ok_or_else(|| CodecError::Overflow(number.to_string()))
                    } else {
                        Err(CodecError::InvalidInteger(number.to_string()))
                    }
                } else {
                    Err(CodecError::InvalidInteger(number.to_string()))
                }
            }
            Value::String(text) => Self::parse(text),
            other => Err(CodecError::InvalidInteger(other.to_string())),
        }
    }

    /// Exact value of a finite, non-negative, integral float; `None` past 256 bits.
    fn from_integral_f64(v: f64) -> Option<Self> {
        if v < 18_446_744_073_709_551_616.0 {
            return Some(Self::from(v as u64));
        }

        // v >= 2^64 is always normal: value = (2^52 | fraction) * 2^(exponent - 1075)
        let bits = v.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as u32;
        let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
        let shift = exponent - 1075;
        if shift + 53 > 256 {
            return None;
        }
        Some(Self::from(mantissa).shl(shift))
    }

    /// Shift left by `n` bits, dropping bits shifted past the top.
    fn shl(&self, n: u32) -> Self {
        let byte_shift = (n / 8) as usize;
        let bit_shift = n % 8;
        let mut out = [0u8; WORD_BYTES];
        for i in 0..WORD_BYTES.saturating_sub(byte_shift) {
            let hi = self.0[i + byte_shift] << bit_shift;
            let lo = match self.0.get(i + byte_shift + 1) {
                Some(next) if bit_shift > 0 => next >> (8 - bit_shift),
                _ => 0,
            };
            out[i] = hi | lo;
        }
        Self(out)
    }

    /// Canonical decimal rendering (no leading zeros).
    pub fn to_decimal_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut work = self.0;
        let mut digits = Vec::with_capacity(78);
        while work.iter().any(|b| *b != 0) {
            // work = work / 10, remainder is the next digit
            let mut rem = 0u32;
            for byte in work.iter_mut() {
                let acc = (rem << 8) | u32::from(*byte);
                *byte = (acc / 10) as u8;
                rem = acc % 10;
            }
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();
        String::from_utf8(digits).unwrap_or_default()
    }
}

impl From<u64> for Uint256 {
    fn from(v: u64) -> Self {
        Self::from(u128::from(v))
    }
}

impl From<u128> for Uint256 {
    fn from(v: u128) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - 16..].copy_from_slice(&v.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for Uint256 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Uint256::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const MAX_DECIMAL: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Uint256::parse("42").unwrap(), Uint256::from(42u64));
        assert_eq!(Uint256::parse("0").unwrap(), Uint256::ZERO);
        assert_eq!(Uint256::parse("0007").unwrap(), Uint256::from(7u64));
    }

    #[test]
    fn test_parse_hex_and_bigint_suffix() {
        assert_eq!(Uint256::parse("0x2a").unwrap(), Uint256::from(42u64));
        assert_eq!(Uint256::parse("0X2A").unwrap(), Uint256::from(42u64));
        assert_eq!(Uint256::parse("42n").unwrap(), Uint256::from(42u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Uint256::parse(""), Err(CodecError::InvalidInteger(_))));
        assert!(matches!(Uint256::parse("-1"), Err(CodecError::InvalidInteger(_))));
        assert!(matches!(Uint256::parse("1.5"), Err(CodecError::InvalidInteger(_))));
        assert!(matches!(Uint256::parse("0x"), Err(CodecError::InvalidInteger(_))));
        assert!(matches!(Uint256::parse("0xzz"), Err(CodecError::InvalidInteger(_))));
    }

    #[test]
    fn test_max_value_and_overflow() {
        assert_eq!(Uint256::parse(MAX_DECIMAL).unwrap(), Uint256::MAX);
        assert_eq!(Uint256::MAX.to_decimal_string(), MAX_DECIMAL);

        let too_big = format!("{}0", MAX_DECIMAL);
        assert!(matches!(Uint256::parse(&too_big), Err(CodecError::Overflow(_))));

        let too_wide = format!("0x1{}", "0".repeat(64));
        assert!(matches!(Uint256::parse(&too_wide), Err(CodecError::Overflow(_))));
    }

    #[test]
    fn test_beyond_u64_precision() {
        // 2^64 + 1 cannot round-trip through a double
        let v = Uint256::parse("18446744073709551617").unwrap();
        assert_eq!(v.to_string(), "18446744073709551617");
        assert!(v > Uint256::from(u64::MAX));
    }

    #[test]
    fn test_from_json_forms() {
        assert_eq!(Uint256::from_json(&json!(100)).unwrap(), Uint256::from(100u64));
        assert_eq!(Uint256::from_json(&json!(100.0)).unwrap(), Uint256::from(100u64));
        assert_eq!(Uint256::from_json(&json!("100")).unwrap(), Uint256::from(100u64));
        assert!(Uint256::from_json(&json!(-1)).is_err());
        assert!(Uint256::from_json(&json!(1.5)).is_err());
        assert!(Uint256::from_json(&json!(null)).is_err());
        assert!(Uint256::from_json(&json!(true)).is_err());
    }

    #[test]
    fn test_from_json_large_floats() {
        assert_eq!(
            Uint256::from_json(&json!(18_446_744_073_709_551_616.0)).unwrap(),
            Uint256::from(1u128 << 64)
        );
        assert_eq!(
            Uint256::from_json(&json!(3.0 * 2f64.powi(100))).unwrap(),
            Uint256::from(3u128 << 100)
        );

        // Beyond u128
        let mut bytes = [0u8; WORD_BYTES];
        bytes[6] = 1;
        assert_eq!(
            Uint256::from_json(&json!(2f64.powi(200))).unwrap(),
            Uint256::from_be_bytes(bytes)
        );
        let mut bytes = [0u8; WORD_BYTES];
        bytes[0] = 0x80;
        assert_eq!(
            Uint256::from_json(&json!(2f64.powi(255))).unwrap(),
            Uint256::from_be_bytes(bytes)
        );
        assert!(Uint256::from_json(&json!(1e40)).unwrap() > Uint256::from(u128::MAX));

        assert!(matches!(
            Uint256::from_json(&json!(2f64.powi(256))),
            Err(CodecError::Overflow(_))
        ));
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let v = Uint256::from(1234u64);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"1234\"");
        let back: Uint256 = serde_json::from_str("1234").unwrap();
        assert_eq!(back, v);
    }

    proptest! {
        #[test]
        fn prop_order_matches_u128(a in any::<u128>(), b in any::<u128>()) {
            prop_assert_eq!(Uint256::from(a).cmp(&Uint256::from(b)), a.cmp(&b));
        }

        #[test]
        fn prop_decimal_matches_u128(v in any::<u128>()) {
            prop_assert_eq!(Uint256::from(v).to_decimal_string(), v.to_string());
            prop_assert_eq!(Uint256::parse(&v.to_string()).unwrap(), Uint256::from(v));
        }
    }
}
