//! Canonical DAG-CBOR encoding and decoding.
//!
//! Encoding follows the DAG-CBOR deterministic rules:
//! - Map keys are text, sorted by encoded bytes (length first, then bytewise)
//! - Integers use the smallest valid encoding
//! - Definite lengths only
//! - Floats are always 64-bit and must be finite
//! - The only tag is 42 (links)
//!
//! The canonical encoding matters: content identifiers are computed over
//! these bytes, so the same model must always produce the same bytes.

use ciborium::value::{Integer, Value};

use crate::cid::{Cid, LINK_TAG};
use crate::error::{CoreError, Result};
use crate::types::{Command, Did};

/// An ordered string-keyed map, as found in arguments and metadata.
pub type Map = Vec<(String, Value)>;

/// Decode exactly one CBOR data item from `bytes`.
///
/// Trailing bytes after the item are rejected, so a buffer only decodes if
/// the whole of it is a single value.
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    let mut reader = bytes;
    let value: Value =
        ciborium::from_reader(&mut reader).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    if !reader.is_empty() {
        return Err(CoreError::DecodingError(format!(
            "{} trailing bytes after CBOR item",
            reader.len()
        )));
    }

    Ok(value)
}

/// Encode a value to canonical DAG-CBOR bytes.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(CoreError::EncodingError(format!(
                    "non-finite float {f} is not allowed"
                )));
            }
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::Tag(tag, inner) => {
            if *tag != LINK_TAG {
                return Err(CoreError::EncodingError(format!("unsupported tag {tag}")));
            }
            encode_uint(buf, 6, *tag);
            encode_value_to(buf, inner)?;
        }
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<()> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys must be text. They are sorted by their encoded bytes, which for text
/// keys means shorter keys first and bytewise order between equal lengths.
fn encode_map(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<()> {
    let mut sorted = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let Value::Text(key) = k else {
            return Err(CoreError::EncodingError("map keys must be text".into()));
        };
        let mut key_bytes = Vec::with_capacity(key.len() + 1);
        encode_text(&mut key_bytes, key);
        sorted.push((key_bytes, v));
    }

    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    if sorted.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CoreError::EncodingError("duplicate map key".into()));
    }

    encode_uint(buf, 5, sorted.len() as u64);
    for (key_bytes, value) in sorted {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

/// Build a map value from string keys.
pub fn map_value(entries: Map) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Value::Text(k), v))
            .collect(),
    )
}

/// Sort a map's top-level entries into the order canonical encoding emits.
///
/// Decoded maps already come back in this order, so a model built from a
/// sorted map compares equal to its decoded round-trip.
pub fn sort_canonical(map: &mut Map) {
    map.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}

/// Convert a CBOR map value into a string-keyed [`Map`].
pub fn value_to_map(value: &Value) -> Option<Map> {
    let Value::Map(entries) = value else {
        return None;
    };
    entries
        .iter()
        .map(|(k, v)| match k {
            Value::Text(s) => Some((s.clone(), v.clone())),
            _ => None,
        })
        .collect()
}

/// Typed access to the fields of a decoded payload map.
///
/// Every accessor reports failures as [`CoreError::MalformedEnvelope`]
/// tagged with the envelope kind being decoded.
pub(crate) struct Fields<'a> {
    kind: &'static str,
    entries: &'a [(Value, Value)],
}

impl<'a> Fields<'a> {
    pub(crate) fn new(kind: &'static str, value: &'a Value) -> Result<Self> {
        match value {
            Value::Map(entries) => Ok(Self { kind, entries }),
            _ => Err(CoreError::malformed(kind, "payload is not a map")),
        }
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> CoreError {
        CoreError::malformed(self.kind, reason)
    }

    /// Look up a key; an explicit null counts as absent.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
            .map(|(_, v)| v)
            .filter(|v| !v.is_null())
    }

    pub(crate) fn required(&self, key: &str) -> Result<&'a Value> {
        self.get(key)
            .ok_or_else(|| self.malformed(format!("missing field `{key}`")))
    }

    pub(crate) fn text(&self, key: &str) -> Result<&'a str> {
        match self.required(key)? {
            Value::Text(s) => Ok(s),
            _ => Err(self.malformed(format!("field `{key}` is not text"))),
        }
    }

    pub(crate) fn did(&self, key: &str) -> Result<Did> {
        Did::parse(self.text(key)?)
    }

    pub(crate) fn optional_did(&self, key: &str) -> Result<Option<Did>> {
        if self.get(key).is_none() {
            return Ok(None);
        }
        self.did(key).map(Some)
    }

    pub(crate) fn command(&self, key: &str) -> Result<Command> {
        Command::parse(self.text(key)?)
    }

    pub(crate) fn bytes(&self, key: &str) -> Result<Vec<u8>> {
        match self.required(key)? {
            Value::Bytes(b) => Ok(b.clone()),
            _ => Err(self.malformed(format!("field `{key}` is not bytes"))),
        }
    }

    pub(crate) fn map(&self, key: &str) -> Result<Map> {
        value_to_map(self.required(key)?)
            .ok_or_else(|| self.malformed(format!("field `{key}` is not a string-keyed map")))
    }

    pub(crate) fn optional_map(&self, key: &str) -> Result<Option<Map>> {
        if self.get(key).is_none() {
            return Ok(None);
        }
        self.map(key).map(Some)
    }

    pub(crate) fn list(&self, key: &str) -> Result<&'a [Value]> {
        match self.required(key)? {
            Value::Array(items) => Ok(items),
            _ => Err(self.malformed(format!("field `{key}` is not a list"))),
        }
    }

    pub(crate) fn link(&self, key: &str) -> Result<Cid> {
        Cid::from_link_value(self.required(key)?)
            .map_err(|e| self.malformed(format!("field `{key}`: {e}")))
    }

    pub(crate) fn optional_link(&self, key: &str) -> Result<Option<Cid>> {
        if self.get(key).is_none() {
            return Ok(None);
        }
        self.link(key).map(Some)
    }

    pub(crate) fn links(&self, key: &str) -> Result<Vec<Cid>> {
        self.list(key)?
            .iter()
            .map(|item| {
                Cid::from_link_value(item)
                    .map_err(|e| self.malformed(format!("field `{key}`: {e}")))
            })
            .collect()
    }

    /// An integer timestamp that may be absent or null.
    pub(crate) fn optional_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => i64::try_from(*i)
                .map(Some)
                .map_err(|_| self.malformed(format!("field `{key}` is out of range"))),
            Some(_) => Err(self.malformed(format!("field `{key}` is not an integer"))),
        }
    }
}

/// Encode an optional integer, using null when absent.
pub(crate) fn nullable_int(value: Option<i64>) -> Value {
    value.map_or(Value::Null, |n| Value::Integer(n.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        // 0-23: single byte
        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        // 24-255: two bytes
        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        // 256-65535: three bytes
        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 65535);
        assert_eq!(buf, vec![0x19, 0xff, 0xff]);

        buf.clear();
        encode_integer(&mut buf, Integer::from(-1i64));
        assert_eq!(buf, vec![0x20]);

        buf.clear();
        encode_integer(&mut buf, Integer::from(-500i64));
        assert_eq!(buf, vec![0x39, 0x01, 0xf3]);
    }

    #[test]
    fn test_map_key_ordering() {
        // "b" (1) < "aa" (2) < "ab" (2) < "aaa" (3)
        let value = map_value(vec![
            ("aaa".into(), Value::Integer(3.into())),
            ("ab".into(), Value::Integer(2.into())),
            ("b".into(), Value::Integer(0.into())),
            ("aa".into(), Value::Integer(1.into())),
        ]);
        let bytes = encode_value(&value).unwrap();

        assert_eq!(bytes[0], 0xa4);
        assert_eq!(&bytes[1..3], &[0x61, b'b']);
        assert_eq!(&bytes[4..7], &[0x62, b'a', b'a']);
        assert_eq!(&bytes[8..11], &[0x62, b'a', b'b']);
        assert_eq!(&bytes[12..16], &[0x63, b'a', b'a', b'a']);
    }

    #[test]
    fn test_rejects_non_text_keys() {
        let value = Value::Map(vec![(Value::Integer(1.into()), Value::Null)]);
        assert!(matches!(
            encode_value(&value),
            Err(CoreError::EncodingError(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let value = map_value(vec![
            ("a".into(), Value::Null),
            ("a".into(), Value::Bool(true)),
        ]);
        assert!(encode_value(&value).is_err());
    }

    #[test]
    fn test_rejects_non_finite_float() {
        assert!(encode_value(&Value::Float(f64::NAN)).is_err());
        assert!(encode_value(&Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_float_always_64_bit() {
        let bytes = encode_value(&Value::Float(1.5)).unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xfb);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_value(&Value::Text("hello".into())).unwrap();
        assert!(decode_value(&bytes).is_ok());

        bytes.push(0x00);
        assert!(matches!(
            decode_value(&bytes),
            Err(CoreError::DecodingError(_))
        ));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(decode_value(&[]).is_err());
    }

    #[test]
    fn test_roundtrip_nested() {
        let value = map_value(vec![
            ("list".into(), Value::Array(vec![Value::Bool(false), Value::Null])),
            ("bytes".into(), Value::Bytes(vec![1, 2, 3])),
            ("n".into(), Value::Integer((-42i64).into())),
        ]);
        let bytes = encode_value(&value).unwrap();
        let decoded = decode_value(&bytes).unwrap();

        // Re-encoding the decoded tree yields identical bytes.
        assert_eq!(encode_value(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_fields_null_is_absent() {
        let value = map_value(vec![
            ("exp".into(), Value::Null),
            ("iat".into(), Value::Integer(10.into())),
        ]);
        let fields = Fields::new("test", &value).unwrap();

        assert_eq!(fields.optional_int("exp").unwrap(), None);
        assert_eq!(fields.optional_int("iat").unwrap(), Some(10));
        assert_eq!(fields.optional_int("nbf").unwrap(), None);
        assert!(fields.required("exp").is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| Value::Integer(n.into())),
                any::<u64>().prop_map(|n| Value::Integer(n.into())),
                ".{0,12}".prop_map(Value::Text),
                prop::collection::vec(any::<u8>(), 0..24).prop_map(Value::Bytes),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    prop::collection::btree_map(".{0,6}", inner, 0..4)
                        .prop_map(|m| map_value(m.into_iter().collect())),
                ]
            })
        }

        proptest! {
            #[test]
            fn reencoding_is_stable(v in value()) {
                let bytes = encode_value(&v).unwrap();
                let decoded = decode_value(&bytes).unwrap();
                prop_assert_eq!(encode_value(&decoded).unwrap(), bytes);
            }
        }
    }
}
