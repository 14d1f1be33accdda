//! Delegation: a signed grant of authority from an issuer to an audience.

use ciborium::value::Value;

use crate::cbor::{map_value, nullable_int, Fields, Map};
use crate::envelope::{self, Envelope};
use crate::error::Result;
use crate::types::{Command, Did};

/// Type tag of the delegation payload.
pub const DELEGATION_TAG: &str = "ucan/dlg@1.0.0-rc.1";

const KIND: &str = "delegation";

/// A decoded delegation.
#[derive(Debug, Clone, PartialEq)]
pub struct Delegation {
    pub issuer: Did,
    pub audience: Did,
    /// `None` delegates authority over any subject.
    pub subject: Option<Did>,
    pub command: Command,
    /// Policy statements, each a list such as `["==", ".from", "alice"]`.
    pub policy: Vec<Value>,
    pub nonce: Vec<u8>,
    pub metadata: Option<Map>,
    pub not_before: Option<i64>,
    pub expiration: Option<i64>,
    pub header: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Delegation {
    /// Decode a delegation envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let env = Envelope::decode(KIND, DELEGATION_TAG, bytes)?;
        let fields = Fields::new(KIND, &env.payload)?;

        let policy = fields.list("pol")?.to_vec();
        if let Some(i) = policy.iter().position(|s| !matches!(s, Value::Array(_))) {
            return Err(fields.malformed(format!("policy statement {i} is not a list")));
        }

        Ok(Self {
            issuer: fields.did("iss")?,
            audience: fields.did("aud")?,
            subject: fields.optional_did("sub")?,
            command: fields.command("cmd")?,
            policy,
            nonce: fields.bytes("nonce")?,
            metadata: fields.optional_map("meta")?,
            not_before: fields.optional_int("nbf")?,
            expiration: fields.optional_int("exp")?,
            header: env.header,
            signature: env.signature,
        })
    }

    fn payload_value(&self) -> Value {
        let mut entries: Map = vec![
            ("iss".into(), Value::Text(self.issuer.to_string())),
            ("aud".into(), Value::Text(self.audience.to_string())),
            (
                "sub".into(),
                self.subject
                    .as_ref()
                    .map_or(Value::Null, |s| Value::Text(s.to_string())),
            ),
            ("cmd".into(), Value::Text(self.command.to_string())),
            ("pol".into(), Value::Array(self.policy.clone())),
            ("nonce".into(), Value::Bytes(self.nonce.clone())),
            ("exp".into(), nullable_int(self.expiration)),
        ];
        if let Some(meta) = &self.metadata {
            entries.push(("meta".into(), map_value(meta.clone())));
        }
        if let Some(nbf) = self.not_before {
            entries.push(("nbf".into(), Value::Integer(nbf.into())));
        }
        map_value(entries)
    }

    /// Canonical bytes covered by the signature.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        envelope::signing_bytes(DELEGATION_TAG, &self.header, self.payload_value())
    }

    /// Encode to canonical envelope bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        envelope::encode(
            DELEGATION_TAG,
            &self.header,
            self.payload_value(),
            &self.signature,
        )
    }
}
