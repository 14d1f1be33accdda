//! Format sniffing: decide which kind of artifact a buffer holds.
//!
//! Decoders are tried in a fixed order and the first success wins. A
//! container is always tried first, so bytes that would also satisfy an
//! envelope decoder are still reported as a container.

use std::fmt;

use tracing::{debug, trace};
use ucantool_core::{Container, Delegation, Invocation, Receipt};

use crate::error::{InspectError, Result};

/// The kinds of artifact the sniffer recognises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Container,
    Invocation,
    Delegation,
    Receipt,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Container => "container",
            ArtifactKind::Invocation => "invocation",
            ArtifactKind::Delegation => "delegation",
            ArtifactKind::Receipt => "receipt",
        };
        f.write_str(name)
    }
}

/// A decoded artifact. Never modified after decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
    Container(Container),
    Invocation(Invocation),
    Delegation(Delegation),
    Receipt(Receipt),
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Container(_) => ArtifactKind::Container,
            Artifact::Invocation(_) => ArtifactKind::Invocation,
            Artifact::Delegation(_) => ArtifactKind::Delegation,
            Artifact::Receipt(_) => ArtifactKind::Receipt,
        }
    }
}

type Decoder = fn(&[u8]) -> ucantool_core::Result<Artifact>;

fn decode_container(bytes: &[u8]) -> ucantool_core::Result<Artifact> {
    Container::decode(bytes).map(Artifact::Container)
}

fn decode_invocation(bytes: &[u8]) -> ucantool_core::Result<Artifact> {
    Invocation::decode(bytes).map(Artifact::Invocation)
}

fn decode_delegation(bytes: &[u8]) -> ucantool_core::Result<Artifact> {
    Delegation::decode(bytes).map(Artifact::Delegation)
}

fn decode_receipt(bytes: &[u8]) -> ucantool_core::Result<Artifact> {
    Receipt::decode(bytes).map(Artifact::Receipt)
}

/// Decoders in priority order.
const DECODERS: [(ArtifactKind, Decoder); 4] = [
    (ArtifactKind::Container, decode_container),
    (ArtifactKind::Invocation, decode_invocation),
    (ArtifactKind::Delegation, decode_delegation),
    (ArtifactKind::Receipt, decode_receipt),
];

/// Decode `bytes` as the first artifact kind that accepts them.
pub fn sniff(bytes: &[u8]) -> Result<Artifact> {
    for (kind, decode) in DECODERS {
        match decode(bytes) {
            Ok(artifact) => {
                debug!(%kind, len = bytes.len(), "decoded artifact");
                return Ok(artifact);
            }
            Err(e) => trace!(%kind, error = %e, "decoder rejected input"),
        }
    }
    Err(InspectError::UnrecognizedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucantool_core::Codec;

    #[test]
    fn test_unrecognized() {
        assert!(matches!(
            sniff(b"definitely not a ucan"),
            Err(InspectError::UnrecognizedFormat)
        ));
        assert!(matches!(sniff(&[]), Err(InspectError::UnrecognizedFormat)));
    }

    #[test]
    fn test_container_detected() {
        let bytes = Container::new(vec![]).encode(Codec::Base64Url).unwrap();
        assert_eq!(sniff(&bytes).unwrap().kind(), ArtifactKind::Container);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ArtifactKind::Container.to_string(), "container");
        assert_eq!(ArtifactKind::Receipt.to_string(), "receipt");
    }
}
