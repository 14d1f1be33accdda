//! Content identifiers (CIDs).
//!
//! A CID pairs a hash digest with the codec of the hashed bytes:
//! `version || codec || multihash(code || len || digest)`, each header field
//! an unsigned varint. CIDv1 strings are multibase base32-lower (`b` prefix);
//! CIDv0 strings are bare base58btc.

use base58::{FromBase58, ToBase58};
use ciborium::value::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// DAG-CBOR multicodec.
pub const DAG_CBOR: u64 = 0x71;

/// Raw bytes multicodec.
pub const RAW: u64 = 0x55;

/// SHA2-256 multihash code.
pub const SHA2_256: u64 = 0x12;

/// CBOR tag for IPLD links.
pub const LINK_TAG: u64 = 42;

/// A content identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cid {
    version: u64,
    codec: u64,
    hash_code: u64,
    digest: Vec<u8>,
}

impl Cid {
    /// Compute a CIDv1 with a SHA2-256 digest of `data`.
    pub fn sum(codec: u64, data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            version: 1,
            codec,
            hash_code: SHA2_256,
            digest: hasher.finalize().to_vec(),
        }
    }

    /// CID version (0 or 1).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Codec of the addressed content.
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Multihash function code.
    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }

    /// Raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Binary form of the multihash.
    fn multihash_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.digest.len() + 4);
        write_varint(&mut buf, self.hash_code);
        write_varint(&mut buf, self.digest.len() as u64);
        buf.extend_from_slice(&self.digest);
        buf
    }

    /// Binary form of the CID.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.version == 0 {
            return self.multihash_bytes();
        }
        let mut buf = Vec::with_capacity(self.digest.len() + 8);
        write_varint(&mut buf, self.version);
        write_varint(&mut buf, self.codec);
        buf.extend_from_slice(&self.multihash_bytes());
        buf
    }

    /// Parse the binary form of a CID.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // CIDv0 is a bare SHA2-256 multihash.
        if bytes.len() == 34 && bytes[0] == 0x12 && bytes[1] == 0x20 {
            return Ok(Self {
                version: 0,
                codec: 0x70,
                hash_code: SHA2_256,
                digest: bytes[2..].to_vec(),
            });
        }

        let mut rest = bytes;
        let version = read_varint(&mut rest)?;
        if version != 1 {
            return Err(CoreError::InvalidCid(format!("unsupported version {version}")));
        }
        let codec = read_varint(&mut rest)?;
        let hash_code = read_varint(&mut rest)?;
        let len = read_varint(&mut rest)? as usize;
        if rest.len() != len {
            return Err(CoreError::InvalidCid(format!(
                "digest length {} does not match declared {len}",
                rest.len()
            )));
        }

        Ok(Self {
            version,
            codec,
            hash_code,
            digest: rest.to_vec(),
        })
    }

    /// Encode as a DAG-CBOR link (tag 42 over `0x00 || cid`).
    pub fn to_link_value(&self) -> Value {
        let mut bytes = Vec::with_capacity(self.digest.len() + 9);
        bytes.push(0x00);
        bytes.extend_from_slice(&self.to_bytes());
        Value::Tag(LINK_TAG, Box::new(Value::Bytes(bytes)))
    }

    /// Decode a DAG-CBOR link.
    pub fn from_link_value(value: &Value) -> Result<Self> {
        match value {
            Value::Tag(LINK_TAG, inner) => match inner.as_ref() {
                Value::Bytes(b) if b.first() == Some(&0x00) => Self::from_bytes(&b[1..]),
                _ => Err(CoreError::InvalidCid(
                    "link must be bytes with a 0x00 prefix".into(),
                )),
            },
            _ => Err(CoreError::InvalidCid("not a link".into())),
        }
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version == 0 {
            write!(f, "{}", self.to_bytes().to_base58())
        } else {
            write!(f, "b{}", base32_encode(&self.to_bytes()))
        }
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({self})")
    }
}

impl FromStr for Cid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 46 && s.starts_with("Qm") {
            let bytes = s
                .from_base58()
                .map_err(|_| CoreError::InvalidCid(format!("invalid base58: {s}")))?;
            return Self::from_bytes(&bytes);
        }

        let mut chars = s.chars();
        let bytes = match chars.next() {
            Some('b') => base32_decode(chars.as_str())
                .ok_or_else(|| CoreError::InvalidCid(format!("invalid base32: {s}")))?,
            Some('z') => chars
                .as_str()
                .from_base58()
                .map_err(|_| CoreError::InvalidCid(format!("invalid base58: {s}")))?,
            _ => {
                return Err(CoreError::InvalidCid(format!(
                    "unsupported multibase prefix: {s}"
                )))
            }
        };
        Self::from_bytes(&bytes)
    }
}

fn write_varint(buf: &mut Vec<u8>, mut n: u64) {
    while n >= 0x80 {
        buf.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
}

fn read_varint(bytes: &mut &[u8]) -> Result<u64> {
    let data: &[u8] = bytes;
    let mut value: u64 = 0;
    for (i, &b) in data.iter().enumerate().take(9) {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            *bytes = &data[i + 1..];
            return Ok(value);
        }
    }
    Err(CoreError::InvalidCid("truncated or oversized varint".into()))
}

const BASE32_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";

// RFC 4648 Base32 encoding (lowercase, no padding)
fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | u64::from(byte);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

fn base32_decode(s: &str) -> Option<Vec<u8>> {
    let mut result = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in s.bytes() {
        let index = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c.to_ascii_lowercase())?;
        buffer = (buffer << 5) | index as u64;
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push((buffer >> bits_in_buffer) as u8);
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base32_encode() {
        // Test vectors from RFC 4648
        assert_eq!(base32_encode(b""), "");
        assert_eq!(base32_encode(b"f"), "my");
        assert_eq!(base32_encode(b"fo"), "mzxq");
        assert_eq!(base32_encode(b"foo"), "mzxw6");
        assert_eq!(base32_encode(b"foob"), "mzxw6yq");
        assert_eq!(base32_encode(b"fooba"), "mzxw6ytb");
        assert_eq!(base32_encode(b"foobar"), "mzxw6ytboi");
    }

    #[test]
    fn test_base32_decode() {
        assert_eq!(base32_decode("mzxw6ytboi").unwrap(), b"foobar");
        assert_eq!(base32_decode("my").unwrap(), b"f");
        assert!(base32_decode("m1").is_none());
    }

    #[test]
    fn test_sum_is_dag_cbor_sha256() {
        let cid = Cid::sum(DAG_CBOR, b"hello");
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.codec(), DAG_CBOR);
        assert_eq!(cid.hash_code(), SHA2_256);
        assert_eq!(
            hex::encode(cid.digest()),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );

        let bytes = cid.to_bytes();
        assert_eq!(&bytes[..4], &[0x01, 0x71, 0x12, 0x20]);

        let s = cid.to_string();
        assert!(s.starts_with("bafyrei"));
    }

    #[test]
    fn test_parse_known_raw_cid() {
        let s = "bafkreigh2akiscaildcqabsyg3dfr6chu3fgpregiymsck7e7aqa4s52zy";
        let cid: Cid = s.parse().unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.codec(), RAW);
        assert_eq!(cid.digest().len(), 32);
        assert_eq!(cid.to_string(), s);
    }

    #[test]
    fn test_cid_v0_roundtrip() {
        let s = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
        let cid: Cid = s.parse().unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.to_string(), s);
    }

    #[test]
    fn test_link_value_roundtrip() {
        let cid = Cid::sum(DAG_CBOR, b"linked");
        let value = cid.to_link_value();
        assert_eq!(Cid::from_link_value(&value).unwrap(), cid);
    }

    #[test]
    fn test_link_requires_identity_prefix() {
        let cid = Cid::sum(RAW, b"x");
        let value = Value::Tag(LINK_TAG, Box::new(Value::Bytes(cid.to_bytes())));
        assert!(Cid::from_link_value(&value).is_err());
    }

    #[test]
    fn test_varint_roundtrip() {
        for n in [0u64, 1, 127, 128, 300, 0xed, 16_384, u32::MAX as u64] {
            let mut buf = Vec::new();
            write_varint(&mut buf, n);
            let mut slice = buf.as_slice();
            assert_eq!(read_varint(&mut slice).unwrap(), n);
            assert!(slice.is_empty());
        }
    }
}
