//! Ed25519 principals that sign sample artifacts.

use std::fmt;

use base58::ToBase58;
use ed25519_dalek::{Signer as _, SigningKey};
use ucantool_core::cbor::sort_canonical;
use ucantool_core::{
    Cid, Command, Delegation, Did, Invocation, Map, Outcome, Receipt, Result, Value,
};

/// Varsig header for Ed25519 signatures over DAG-CBOR payloads.
pub const VARSIG_ED25519_DAG_CBOR: [u8; 4] = [0x34, 0xed, 0x01, 0x71];

/// Multicodec prefix of an Ed25519 public key inside a `did:key`.
const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Command under which receipts are issued.
pub const RECEIPT_COMMAND: &str = "/ucan/assert/receipt";

/// An Ed25519 keypair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The `did:key` of the public key.
    pub fn did(&self) -> Did {
        let mut bytes = ED25519_PUB_MULTICODEC.to_vec();
        bytes.extend_from_slice(self.signing_key.verifying_key().as_bytes());
        Did::parse(&format!("did:key:z{}", bytes.to_base58()))
            .expect("did:key strings are well-formed")
    }

    /// Sign a message. Ed25519 signatures are deterministic.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    /// The raw seed bytes.
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.seed())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.did())
    }
}

/// A keypair acting under a DID, which may differ from its own `did:key`
/// (a `did:web` service signing with an Ed25519 key, for instance).
#[derive(Clone, Debug)]
pub struct Principal {
    keypair: Keypair,
    did: Did,
}

impl Principal {
    /// A principal identified by its own `did:key`.
    pub fn new(keypair: Keypair) -> Self {
        let did = keypair.did();
        Self { keypair, did }
    }

    /// A principal acting under `did`.
    pub fn wrap(keypair: Keypair, did: Did) -> Self {
        Self { keypair, did }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(Keypair::from_seed(&seed))
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    /// Build and sign an invocation.
    pub fn invoke(&self, subject: &Did, command: &Command, options: InvokeOptions) -> Result<Invocation> {
        let mut arguments = options.arguments;
        sort_canonical(&mut arguments);
        let task = Invocation::compute_task(subject, command, &arguments, &options.nonce)?;

        let mut inv = Invocation {
            issuer: self.did.clone(),
            subject: subject.clone(),
            audience: options.audience,
            command: command.clone(),
            arguments,
            proofs: options.proofs,
            metadata: options.metadata.map(canonical),
            nonce: options.nonce,
            expiration: options.expiration,
            issued_at: options.issued_at,
            cause: options.cause,
            task,
            header: VARSIG_ED25519_DAG_CBOR.to_vec(),
            signature: Vec::new(),
        };
        inv.signature = self.keypair.sign(&inv.signing_payload()?);
        Ok(inv)
    }

    /// Build and sign a delegation to `audience`.
    pub fn delegate(&self, audience: &Did, command: &Command, options: DelegateOptions) -> Result<Delegation> {
        let mut dlg = Delegation {
            issuer: self.did.clone(),
            audience: audience.clone(),
            subject: options.subject,
            command: command.clone(),
            policy: options.policy,
            nonce: options.nonce,
            metadata: options.metadata.map(canonical),
            not_before: options.not_before,
            expiration: options.expiration,
            header: VARSIG_ED25519_DAG_CBOR.to_vec(),
            signature: Vec::new(),
        };
        dlg.signature = self.keypair.sign(&dlg.signing_payload()?);
        Ok(dlg)
    }

    /// Build and sign a receipt for the task `ran`.
    pub fn issue_receipt(&self, ran: Cid, out: Outcome, issued_at: Option<i64>) -> Result<Receipt> {
        let mut rcpt = Receipt {
            executor: self.did.clone(),
            command: Command::parse(RECEIPT_COMMAND)?,
            ran,
            out,
            proofs: Vec::new(),
            metadata: None,
            expiration: None,
            issued_at,
            header: VARSIG_ED25519_DAG_CBOR.to_vec(),
            signature: Vec::new(),
        };
        rcpt.signature = self.keypair.sign(&rcpt.signing_payload()?);
        Ok(rcpt)
    }
}

fn canonical(mut map: Map) -> Map {
    sort_canonical(&mut map);
    map
}

/// Optional invocation fields.
#[derive(Clone, Debug, Default)]
pub struct InvokeOptions {
    pub arguments: Map,
    pub audience: Option<Did>,
    pub proofs: Vec<Cid>,
    pub metadata: Option<Map>,
    pub nonce: Vec<u8>,
    pub expiration: Option<i64>,
    pub issued_at: Option<i64>,
    pub cause: Option<Cid>,
}

/// Optional delegation fields.
#[derive(Clone, Debug, Default)]
pub struct DelegateOptions {
    pub subject: Option<Did>,
    pub policy: Vec<Value>,
    pub nonce: Vec<u8>,
    pub metadata: Option<Map>,
    pub not_before: Option<i64>,
    pub expiration: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    #[test]
    fn test_did_key_shape() {
        let did = Keypair::from_seed(&[7; 32]).did();
        assert_eq!(did.method(), "key");
        assert!(did.as_str().starts_with("did:key:z6Mk"));
    }

    #[test]
    fn test_generated_keys_are_distinct_did_keys() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.did(), b.did());

        for keypair in [a, b] {
            let did = keypair.did();
            assert_eq!(Did::parse(did.as_str()).unwrap(), did);
            assert!(did.as_str().starts_with("did:key:z6Mk"));
            assert_eq!(Keypair::from_seed(&keypair.seed()).did(), did);
        }
    }

    #[test]
    fn test_signature_covers_signing_payload() {
        let keypair = Keypair::from_seed(&[1; 32]);
        let principal = Principal::new(keypair.clone());
        let inv = principal
            .invoke(
                principal.did(),
                &Command::parse("/test").unwrap(),
                InvokeOptions::default(),
            )
            .unwrap();

        let key = VerifyingKey::from_bytes(&keypair.signing_key.verifying_key().to_bytes()).unwrap();
        let sig = Signature::from_slice(&inv.signature).unwrap();
        key.verify(&inv.signing_payload().unwrap(), &sig).unwrap();
    }

    #[test]
    fn test_signing_is_deterministic() {
        let principal = Principal::from_seed([3; 32]);
        let cmd = Command::parse("/a/b").unwrap();
        let a = principal.invoke(principal.did(), &cmd, InvokeOptions::default()).unwrap();
        let b = principal.invoke(principal.did(), &cmd, InvokeOptions::default()).unwrap();
        assert_eq!(a.encode().unwrap(), b.encode().unwrap());
    }
}
