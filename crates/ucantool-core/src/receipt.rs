//! Receipt: a signed record of the outcome of an invoked task.

use ciborium::value::Value;

use crate::cbor::{map_value, nullable_int, Fields, Map};
use crate::cid::Cid;
use crate::envelope::{self, Envelope};
use crate::error::Result;
use crate::types::{Command, Did};

/// Type tag of the receipt payload.
pub const RECEIPT_TAG: &str = "ucan/rct@1.0.0-rc.1";

const KIND: &str = "receipt";

/// The result of running a task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok(Value),
    Error(Value),
}

impl Outcome {
    /// Flatten into a single-key map: `{"ok": v}` or `{"error": v}`.
    pub fn to_value(&self) -> Value {
        let (key, value) = match self {
            Outcome::Ok(v) => ("ok", v),
            Outcome::Error(v) => ("error", v),
        };
        map_value(vec![(key.into(), value.clone())])
    }

    fn from_fields(fields: &Fields<'_>) -> Result<Self> {
        let out = fields.map("out")?;
        match out.as_slice() {
            [(key, value)] if key == "ok" => Ok(Outcome::Ok(value.clone())),
            [(key, value)] if key == "error" => Ok(Outcome::Error(value.clone())),
            _ => Err(fields.malformed("`out` must have exactly one key, `ok` or `error`")),
        }
    }
}

/// A decoded receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub executor: Did,
    pub command: Command,
    /// Task identifier of the invocation this receipt reports on.
    pub ran: Cid,
    pub out: Outcome,
    pub proofs: Vec<Cid>,
    pub metadata: Option<Map>,
    pub expiration: Option<i64>,
    pub issued_at: Option<i64>,
    pub header: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Receipt {
    /// Decode a receipt envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let env = Envelope::decode(KIND, RECEIPT_TAG, bytes)?;
        let fields = Fields::new(KIND, &env.payload)?;

        Ok(Self {
            executor: fields.did("iss")?,
            command: fields.command("cmd")?,
            ran: fields.link("ran")?,
            out: Outcome::from_fields(&fields)?,
            proofs: fields.links("prf")?,
            metadata: fields.optional_map("meta")?,
            expiration: fields.optional_int("exp")?,
            issued_at: fields.optional_int("iat")?,
            header: env.header,
            signature: env.signature,
        })
    }

    fn payload_value(&self) -> Value {
        let mut entries: Map = vec![
            ("iss".into(), Value::Text(self.executor.to_string())),
            ("cmd".into(), Value::Text(self.command.to_string())),
            ("ran".into(), self.ran.to_link_value()),
            ("out".into(), self.out.to_value()),
            (
                "prf".into(),
                Value::Array(self.proofs.iter().map(Cid::to_link_value).collect()),
            ),
            ("exp".into(), nullable_int(self.expiration)),
        ];
        if let Some(meta) = &self.metadata {
            entries.push(("meta".into(), map_value(meta.clone())));
        }
        if let Some(iat) = self.issued_at {
            entries.push(("iat".into(), Value::Integer(iat.into())));
        }
        map_value(entries)
    }

    /// Canonical bytes covered by the signature.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        envelope::signing_bytes(RECEIPT_TAG, &self.header, self.payload_value())
    }

    /// Encode to canonical envelope bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        envelope::encode(
            RECEIPT_TAG,
            &self.header,
            self.payload_value(),
            &self.signature,
        )
    }
}
