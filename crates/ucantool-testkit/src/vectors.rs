//! Golden vectors: sample artifacts with their bytes and identifiers.
//!
//! Every vector is built from seeded keys and fixed timestamps, so the bytes
//! and CIDs are stable across runs and platforms.

use serde::Serialize;
use ucantool_core::cid::DAG_CBOR;
use ucantool_core::{Cid, Codec};

use crate::fixtures::{sample_error_receipt, sample_invocation, FruitMarket};

/// A single golden vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,
    /// Artifact kind the bytes must be recognised as.
    pub kind: &'static str,
    /// The artifact exactly as fed to the inspector (hex).
    pub bytes: String,
    /// Expected identifier in the `/` row.
    pub cid: String,
}

impl GoldenVector {
    fn envelope(name: &str, description: &str, kind: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            cid: Cid::sum(DAG_CBOR, &bytes).to_string(),
            bytes: hex::encode(bytes),
        }
    }

    /// The artifact bytes.
    pub fn decoded_bytes(&self) -> Vec<u8> {
        hex::decode(&self.bytes).expect("golden vector bytes are hex")
    }
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    let market = FruitMarket::new();
    let container = market.container();
    let container_cid = Cid::sum(
        DAG_CBOR,
        &container.canonical_body().expect("sample container encodes"),
    )
    .to_string();

    let mut vectors = vec![
        GoldenVector::envelope(
            "fruit-market-delegation",
            "did:web market delegates /fruits/purchase to alice with a policy",
            "delegation",
            market.delegation.encode().expect("sample delegation encodes"),
        ),
        GoldenVector::envelope(
            "fruit-market-invocation",
            "alice invokes /fruits/purchase with proofs, metadata and expiry",
            "invocation",
            market.invocation.encode().expect("sample invocation encodes"),
        ),
        GoldenVector::envelope(
            "fruit-market-receipt",
            "market reports ok: 42 for alice's task",
            "receipt",
            market.receipt.encode().expect("sample receipt encodes"),
        ),
        GoldenVector::envelope(
            "sample-invocation",
            "invocation with audience and mixed argument types",
            "invocation",
            sample_invocation().encode().expect("sample invocation encodes"),
        ),
        GoldenVector::envelope(
            "error-receipt",
            "receipt with an error outcome and no issued-at",
            "receipt",
            sample_error_receipt().encode().expect("sample receipt encodes"),
        ),
    ];

    for codec in [Codec::Raw, Codec::Base64Gzip, Codec::Base64UrlGzip] {
        vectors.push(GoldenVector {
            name: format!("fruit-market-container-{}", codec.name()),
            description: format!("delegation, invocation and receipt over {}", codec.name()),
            kind: "container",
            bytes: hex::encode(market.container_bytes(codec)),
            cid: container_cid.clone(),
        });
    }
    vectors
}
