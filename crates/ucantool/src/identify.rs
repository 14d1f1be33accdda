//! Canonical content identifiers for inspected artifacts.

use tracing::debug;
use ucantool_core::cid::DAG_CBOR;
use ucantool_core::{Cid, Container};

use crate::error::{InspectError, Result};

/// Identify an envelope by hashing the bytes exactly as received.
pub fn identify(bytes: &[u8]) -> Cid {
    let cid = Cid::sum(DAG_CBOR, bytes);
    debug!(%cid, "computed identifier");
    cid
}

/// Identify a container by its untransported body.
///
/// The container is re-encoded with the raw codec and the codec byte is
/// dropped, so every transport of the same container gets the same CID.
pub fn identify_container(container: &Container) -> Result<Cid> {
    let body = container
        .canonical_body()
        .map_err(InspectError::Encoding)?;
    let cid = Cid::sum(DAG_CBOR, &body);
    debug!(%cid, codec = container.codec.name(), "computed container identifier");
    Ok(cid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use ucantool_core::Codec;

    #[test]
    fn test_container_identifier_ignores_transport() {
        let ctn = Container::new(vec![Bytes::from_static(b"abc"), Bytes::from_static(b"xyz")]);
        let expected = identify_container(&ctn).unwrap();

        for codec in Codec::ALL {
            let decoded = Container::decode(&ctn.encode(codec).unwrap()).unwrap();
            assert_eq!(identify_container(&decoded).unwrap(), expected);
        }
    }

    #[test]
    fn test_container_identifier_is_over_body() {
        let ctn = Container::new(vec![Bytes::from_static(b"abc")]);
        let raw = ctn.encode(Codec::Raw).unwrap();
        assert_eq!(identify_container(&ctn).unwrap(), identify(&raw[1..]));
        assert_ne!(identify_container(&ctn).unwrap(), identify(&raw));
    }
}
