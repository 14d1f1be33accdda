//! Containers: bundles of independent artifacts for joint delivery.
//!
//! The transported form is a single codec byte followed by the body:
//!
//! ```text
//! <codec byte> || transport( canonical DAG-CBOR { "ctn-v1": [ bytes, ... ] } )
//! ```
//!
//! The codec byte picks any combination of gzip and base64 around the CBOR
//! body. The same logical container therefore has six byte representations,
//! and [`Container::canonical_body`] recovers the one identifiers are
//! computed over.

use std::fmt;
use std::io::{Read, Write};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use bytes::Bytes;
use ciborium::value::Value;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::cbor::{decode_value, encode_value, map_value};
use crate::error::{CoreError, Result};

/// Key of the entry list in the container body.
pub const CONTAINER_TAG: &str = "ctn-v1";

/// Upper bound on a decompressed container body.
pub const MAX_DECOMPRESSED_SIZE: usize = 16 * 1024 * 1024;

const KIND: &str = "container";

/// Transport codec, carried as the first byte of a transported container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Codec {
    Raw,
    Base64,
    Base64Url,
    RawGzip,
    Base64Gzip,
    Base64UrlGzip,
}

impl Codec {
    /// All codecs, in byte order.
    pub const ALL: [Codec; 6] = [
        Codec::Raw,
        Codec::Base64,
        Codec::Base64Url,
        Codec::RawGzip,
        Codec::Base64Gzip,
        Codec::Base64UrlGzip,
    ];

    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x40 => Ok(Codec::Raw),
            0x41 => Ok(Codec::Base64),
            0x42 => Ok(Codec::Base64Url),
            0x4f => Ok(Codec::RawGzip),
            0x50 => Ok(Codec::Base64Gzip),
            0x51 => Ok(Codec::Base64UrlGzip),
            other => Err(CoreError::UnknownCodec(other)),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Codec::Raw => 0x40,
            Codec::Base64 => 0x41,
            Codec::Base64Url => 0x42,
            Codec::RawGzip => 0x4f,
            Codec::Base64Gzip => 0x50,
            Codec::Base64UrlGzip => 0x51,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::Raw => "raw",
            Codec::Base64 => "base64",
            Codec::Base64Url => "base64url",
            Codec::RawGzip => "raw+gzip",
            Codec::Base64Gzip => "base64+gzip",
            Codec::Base64UrlGzip => "base64url+gzip",
        }
    }

    fn is_gzip(self) -> bool {
        matches!(
            self,
            Codec::RawGzip | Codec::Base64Gzip | Codec::Base64UrlGzip
        )
    }

    fn base64_engine(self) -> Option<&'static base64::engine::GeneralPurpose> {
        match self {
            Codec::Base64 | Codec::Base64Gzip => Some(&STANDARD),
            Codec::Base64Url | Codec::Base64UrlGzip => Some(&URL_SAFE_NO_PAD),
            Codec::Raw | Codec::RawGzip => None,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x} ({})", self.to_byte(), self.name())
    }
}

/// A decoded container. Entries stay opaque bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    /// Transport the container arrived with.
    pub codec: Codec,
    pub entries: Vec<Bytes>,
}

impl Container {
    pub fn new(entries: Vec<Bytes>) -> Self {
        Self {
            codec: Codec::Raw,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a transported container.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (&first, rest) = bytes
            .split_first()
            .ok_or_else(|| CoreError::DecodingError("empty input".into()))?;
        let codec = Codec::from_byte(first)?;

        let mut body = match codec.base64_engine() {
            Some(engine) => engine
                .decode(trim_trailing_whitespace(rest))
                .map_err(|e| CoreError::malformed(KIND, format!("bad base64 body: {e}")))?,
            None => rest.to_vec(),
        };
        if codec.is_gzip() {
            body = gunzip(&body)?;
        }

        let entries = decode_body(&body)?;
        Ok(Self { codec, entries })
    }

    /// Encode in the transported form for `codec`.
    pub fn encode(&self, codec: Codec) -> Result<Vec<u8>> {
        let mut body = self.body_bytes()?;
        if codec.is_gzip() {
            body = gzip(&body)?;
        }

        let mut out = vec![codec.to_byte()];
        match codec.base64_engine() {
            Some(engine) => out.extend_from_slice(engine.encode(&body).as_bytes()),
            None => out.extend_from_slice(&body),
        }
        Ok(out)
    }

    /// The untransported CBOR body: the raw encoding without its codec byte.
    pub fn canonical_body(&self) -> Result<Vec<u8>> {
        let mut raw = self.encode(Codec::Raw)?;
        raw.remove(0);
        Ok(raw)
    }

    fn body_bytes(&self) -> Result<Vec<u8>> {
        let entries = self
            .entries
            .iter()
            .map(|e| Value::Bytes(e.to_vec()))
            .collect();
        encode_value(&map_value(vec![(
            CONTAINER_TAG.into(),
            Value::Array(entries),
        )]))
    }
}

fn decode_body(body: &[u8]) -> Result<Vec<Bytes>> {
    let Value::Map(fields) = decode_value(body)? else {
        return Err(CoreError::malformed(KIND, "body is not a map"));
    };
    let [(Value::Text(key), Value::Array(items))] = fields.as_slice() else {
        return Err(CoreError::malformed(
            KIND,
            format!("body must be a single `{CONTAINER_TAG}` list"),
        ));
    };
    if key != CONTAINER_TAG {
        return Err(CoreError::malformed(KIND, format!("unexpected key `{key}`")));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Bytes(b) => Ok(Bytes::copy_from_slice(b)),
            _ => Err(CoreError::malformed(KIND, format!("entry {i} is not bytes"))),
        })
        .collect()
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .take(MAX_DECOMPRESSED_SIZE as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| CoreError::malformed(KIND, format!("bad gzip body: {e}")))?;
    if out.len() > MAX_DECOMPRESSED_SIZE {
        return Err(CoreError::malformed(
            KIND,
            format!("decompressed body exceeds {MAX_DECOMPRESSED_SIZE} bytes"),
        ));
    }
    Ok(out)
}

fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CoreError::EncodingError(format!("gzip: {e}")))?;
    encoder
        .finish()
        .map_err(|e| CoreError::EncodingError(format!("gzip: {e}")))
}

fn trim_trailing_whitespace(mut data: &[u8]) -> &[u8] {
    while let [rest @ .., last] = data {
        if !last.is_ascii_whitespace() {
            break;
        }
        data = rest;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Container {
        Container::new(vec![
            Bytes::from_static(b"first entry"),
            Bytes::from_static(&[0x82, 0x40, 0xa0]),
        ])
    }

    #[test]
    fn test_codec_bytes() {
        for codec in Codec::ALL {
            assert_eq!(Codec::from_byte(codec.to_byte()).unwrap(), codec);
        }
        assert!(matches!(
            Codec::from_byte(0x82),
            Err(CoreError::UnknownCodec(0x82))
        ));
        assert_eq!(Codec::Base64Gzip.to_string(), "0x50 (base64+gzip)");
    }

    #[test]
    fn test_every_transport_roundtrips() {
        let ctn = sample();
        for codec in Codec::ALL {
            let bytes = ctn.encode(codec).unwrap();
            assert_eq!(bytes[0], codec.to_byte());

            let decoded = Container::decode(&bytes).unwrap();
            assert_eq!(decoded.codec, codec);
            assert_eq!(decoded.entries, ctn.entries);
        }
    }

    #[test]
    fn test_canonical_body_is_transport_independent() {
        let ctn = sample();
        let body = ctn.canonical_body().unwrap();
        for codec in Codec::ALL {
            let decoded = Container::decode(&ctn.encode(codec).unwrap()).unwrap();
            assert_eq!(decoded.canonical_body().unwrap(), body);
        }
    }

    #[test]
    fn test_text_transport_tolerates_trailing_newline() {
        let mut bytes = sample().encode(Codec::Base64Gzip).unwrap();
        bytes.extend_from_slice(b"\n");
        assert!(Container::decode(&bytes).is_ok());
    }

    #[test]
    fn test_empty_container() {
        let ctn = Container::new(vec![]);
        let decoded = Container::decode(&ctn.encode(Codec::Raw).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_rejects_wrong_key() {
        let body = encode_value(&map_value(vec![(
            "ctn-v2".into(),
            Value::Array(vec![]),
        )]))
        .unwrap();
        let mut bytes = vec![Codec::Raw.to_byte()];
        bytes.extend_from_slice(&body);
        assert!(matches!(
            Container::decode(&bytes),
            Err(CoreError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_rejects_non_bytes_entry() {
        let body = encode_value(&map_value(vec![(
            CONTAINER_TAG.into(),
            Value::Array(vec![Value::Text("nope".into())]),
        )]))
        .unwrap();
        let mut bytes = vec![Codec::Raw.to_byte()];
        bytes.extend_from_slice(&body);
        assert!(Container::decode(&bytes).is_err());
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(Container::decode(&[]).is_err());
        assert!(Container::decode(b"Pnot base64!").is_err());
        assert!(Container::decode(b"Onot gzip").is_err());
    }
}
