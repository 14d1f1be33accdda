//! The signed envelope shared by invocations, delegations and receipts.
//!
//! ```text
//! [ <signature: bytes>, { "h": <varsig header: bytes>, "<type tag>": { payload } } ]
//! ```
//!
//! Signatures and varsig headers are carried as opaque bytes. Nothing here
//! checks that a signature is valid.
//!
//! An envelope only decodes if its whole value has a DAG-JSON form, so every
//! decoded artifact can also be displayed.

use ciborium::value::Value;

use crate::cbor::{decode_value, encode_value};
use crate::dag_json::value_to_dag_json;
use crate::error::{CoreError, Result};

/// Key of the varsig header in the signed payload map.
pub const HEADER_KEY: &str = "h";

/// A decoded envelope whose payload has not yet been interpreted.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub signature: Vec<u8>,
    pub header: Vec<u8>,
    pub payload: Value,
}

impl Envelope {
    /// Decode an envelope, requiring the payload to carry `tag`.
    pub(crate) fn decode(kind: &'static str, tag: &str, bytes: &[u8]) -> Result<Self> {
        let value = decode_value(bytes)?;
        value_to_dag_json(&value)
            .map_err(|e| CoreError::malformed(kind, format!("no DAG-JSON form: {e}")))?;

        let Value::Array(mut parts) = value else {
            return Err(CoreError::malformed(kind, "envelope is not a list"));
        };
        if parts.len() != 2 {
            return Err(CoreError::malformed(
                kind,
                format!("envelope has {} elements, expected 2", parts.len()),
            ));
        }
        let signed = parts.pop().unwrap_or(Value::Null);
        let signature = match parts.pop() {
            Some(Value::Bytes(b)) => b,
            _ => return Err(CoreError::malformed(kind, "signature is not bytes")),
        };

        let Value::Map(entries) = signed else {
            return Err(CoreError::malformed(kind, "signed payload is not a map"));
        };
        if entries.len() != 2 {
            return Err(CoreError::malformed(
                kind,
                format!("signed payload has {} keys, expected 2", entries.len()),
            ));
        }

        let mut header = None;
        let mut payload = None;
        for (k, v) in entries {
            match k {
                Value::Text(key) if key == HEADER_KEY => header = Some(v),
                Value::Text(key) if key == tag => payload = Some(v),
                Value::Text(key) => {
                    return Err(CoreError::malformed(kind, format!("unexpected key `{key}`")))
                }
                _ => return Err(CoreError::malformed(kind, "non-text key in signed payload")),
            }
        }

        let header = match header {
            Some(Value::Bytes(b)) => b,
            _ => return Err(CoreError::malformed(kind, "missing or invalid varsig header")),
        };
        let payload =
            payload.ok_or_else(|| CoreError::malformed(kind, format!("missing `{tag}` payload")))?;

        Ok(Self {
            signature,
            header,
            payload,
        })
    }
}

/// The signed payload map `{ "h": header, tag: payload }`.
fn signed_payload(tag: &str, header: &[u8], payload: Value) -> Value {
    Value::Map(vec![
        (Value::Text(HEADER_KEY.into()), Value::Bytes(header.to_vec())),
        (Value::Text(tag.into()), payload),
    ])
}

/// Canonical bytes an external signer signs over.
pub(crate) fn signing_bytes(tag: &str, header: &[u8], payload: Value) -> Result<Vec<u8>> {
    encode_value(&signed_payload(tag, header, payload))
}

/// Canonical bytes of a full envelope.
pub(crate) fn encode(tag: &str, header: &[u8], payload: Value, signature: &[u8]) -> Result<Vec<u8>> {
    encode_value(&Value::Array(vec![
        Value::Bytes(signature.to_vec()),
        signed_payload(tag, header, payload),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::map_value;

    const TAG: &str = "ucan/test@1";

    fn payload() -> Value {
        map_value(vec![("n".into(), Value::Integer(1.into()))])
    }

    #[test]
    fn test_envelope_roundtrip() {
        let bytes = encode(TAG, &[0x34, 0xed], payload(), &[7u8; 64]).unwrap();
        let env = Envelope::decode("test", TAG, &bytes).unwrap();

        assert_eq!(env.signature, vec![7u8; 64]);
        assert_eq!(env.header, vec![0x34, 0xed]);
        assert_eq!(env.payload, payload());
    }

    #[test]
    fn test_envelope_rejects_other_tag() {
        let bytes = encode(TAG, &[], payload(), &[]).unwrap();
        let err = Envelope::decode("test", "ucan/other@1", &bytes).unwrap_err();
        assert!(matches!(err, CoreError::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_envelope_rejects_extra_elements() {
        let bytes = encode_value(&Value::Array(vec![
            Value::Bytes(vec![]),
            signed_payload(TAG, &[], payload()),
            Value::Null,
        ]))
        .unwrap();
        assert!(Envelope::decode("test", TAG, &bytes).is_err());
    }

    #[test]
    fn test_envelope_rejects_payload_without_json_form() {
        let junk_link = Value::Tag(crate::cid::LINK_TAG, Box::new(Value::Text("junk".into())));
        let bytes = encode(TAG, &[], map_value(vec![("l".into(), junk_link)]), &[]).unwrap();
        let err = Envelope::decode("test", TAG, &bytes).unwrap_err();
        assert!(matches!(err, CoreError::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_signing_bytes_exclude_signature() {
        let a = encode(TAG, &[1], payload(), &[1u8; 64]).unwrap();
        let b = encode(TAG, &[1], payload(), &[2u8; 64]).unwrap();
        assert_ne!(a, b);

        let sa = signing_bytes(TAG, &[1], payload()).unwrap();
        assert!(a.ends_with(&sa));
        assert!(b.ends_with(&sa));
    }
}
