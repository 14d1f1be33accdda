//! Invocation: a signed request to run a command under an authorization chain.

use ciborium::value::Value;

use crate::cbor::{encode_value, map_value, nullable_int, Fields, Map};
use crate::cid::{Cid, DAG_CBOR};
use crate::envelope::{self, Envelope};
use crate::error::Result;
use crate::types::{Command, Did};

/// Type tag of the invocation payload.
pub const INVOCATION_TAG: &str = "ucan/inv@1.0.0-rc.1";

const KIND: &str = "invocation";

/// A decoded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub issuer: Did,
    pub subject: Did,
    pub audience: Option<Did>,
    pub command: Command,
    pub arguments: Map,
    pub proofs: Vec<Cid>,
    pub metadata: Option<Map>,
    pub nonce: Vec<u8>,
    /// Expiry in Unix seconds; `None` means the invocation never expires.
    pub expiration: Option<i64>,
    pub issued_at: Option<i64>,
    pub cause: Option<Cid>,
    /// CID of the task `{sub, cmd, args, nonce}`, fixed at construction.
    pub task: Cid,
    /// Varsig header describing the signature algorithm.
    pub header: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Invocation {
    /// Compute the task identifier shared by an invocation and its receipts.
    pub fn compute_task(
        subject: &Did,
        command: &Command,
        arguments: &Map,
        nonce: &[u8],
    ) -> Result<Cid> {
        let task = map_value(vec![
            ("sub".into(), Value::Text(subject.to_string())),
            ("cmd".into(), Value::Text(command.to_string())),
            ("args".into(), map_value(arguments.clone())),
            ("nonce".into(), Value::Bytes(nonce.to_vec())),
        ]);
        Ok(Cid::sum(DAG_CBOR, &encode_value(&task)?))
    }

    /// Decode an invocation envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let env = Envelope::decode(KIND, INVOCATION_TAG, bytes)?;
        let fields = Fields::new(KIND, &env.payload)?;

        let subject = fields.did("sub")?;
        let command = fields.command("cmd")?;
        let arguments = fields.map("args")?;
        let nonce = fields.bytes("nonce")?;
        let task = Self::compute_task(&subject, &command, &arguments, &nonce)?;

        Ok(Self {
            issuer: fields.did("iss")?,
            subject,
            audience: fields.optional_did("aud")?,
            command,
            arguments,
            proofs: fields.links("prf")?,
            metadata: fields.optional_map("meta")?,
            nonce,
            expiration: fields.optional_int("exp")?,
            issued_at: fields.optional_int("iat")?,
            cause: fields.optional_link("cause")?,
            task,
            header: env.header,
            signature: env.signature,
        })
    }

    fn payload_value(&self) -> Value {
        let mut entries: Map = vec![
            ("iss".into(), Value::Text(self.issuer.to_string())),
            ("sub".into(), Value::Text(self.subject.to_string())),
            ("cmd".into(), Value::Text(self.command.to_string())),
            ("args".into(), map_value(self.arguments.clone())),
            (
                "prf".into(),
                Value::Array(self.proofs.iter().map(Cid::to_link_value).collect()),
            ),
            ("nonce".into(), Value::Bytes(self.nonce.clone())),
            ("exp".into(), nullable_int(self.expiration)),
        ];
        if let Some(aud) = &self.audience {
            entries.push(("aud".into(), Value::Text(aud.to_string())));
        }
        if let Some(meta) = &self.metadata {
            entries.push(("meta".into(), map_value(meta.clone())));
        }
        if let Some(iat) = self.issued_at {
            entries.push(("iat".into(), Value::Integer(iat.into())));
        }
        if let Some(cause) = &self.cause {
            entries.push(("cause".into(), cause.to_link_value()));
        }
        map_value(entries)
    }

    /// Canonical bytes covered by the signature.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        envelope::signing_bytes(INVOCATION_TAG, &self.header, self.payload_value())
    }

    /// Encode to canonical envelope bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        envelope::encode(
            INVOCATION_TAG,
            &self.header,
            self.payload_value(),
            &self.signature,
        )
    }
}
