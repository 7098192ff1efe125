//! Artifact codec: raw downloaded bytes <-> self-contained `data:` URIs.
//!
//! A generated video is stored inside its gallery record as a base64
//! `data:<media type>;base64,<payload>` URI so it can be embedded and
//! replayed without another network round trip. [`decode`] is the exact
//! inverse of [`encode`].

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// Media type assumed for generated artifacts when the service reports none.
pub const DEFAULT_MEDIA_TYPE: &str = "video/mp4";

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors produced while materializing or unpacking an artifact.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The byte stream ended early or failed mid-read.
    #[error("Incomplete artifact read: got {read} bytes{}: {reason}", expected_suffix(.expected))]
    IncompleteRead {
        read: u64,
        expected: Option<u64>,
        reason: String,
    },

    /// The string is not a `data:<type>;base64,<payload>` URI.
    #[error("Malformed data URI: {0}")]
    MalformedUri(String),

    /// The payload section is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

fn expected_suffix(expected: &Option<u64>) -> String {
    expected
        .map(|n| format!(" of {n} expected"))
        .unwrap_or_default()
}

/// An embeddable, self-contained artifact: a media type plus the data URI
/// carrying the full payload.
///
/// Only constructed through [`encode`], [`encode_reader`] or
/// [`ArtifactRef::parse`], so the media type always matches the URI header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRef {
    media_type: String,
    data_uri: String,
}

impl ArtifactRef {
    /// Validate and split an existing data URI.
    pub fn parse(data_uri: &str) -> Result<Self, CodecError> {
        let rest = data_uri
            .strip_prefix(DATA_SCHEME)
            .ok_or_else(|| CodecError::MalformedUri("missing 'data:' scheme".to_string()))?;
        let (media_type, _payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            CodecError::MalformedUri("missing ';base64,' marker".to_string())
        })?;
        if media_type.is_empty() {
            return Err(CodecError::MalformedUri("empty media type".to_string()));
        }
        Ok(Self {
            media_type: media_type.to_string(),
            data_uri: data_uri.to_string(),
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// The base64 section of the URI.
    fn payload(&self) -> &str {
        // Offset is fixed by construction: "data:" + media type + marker.
        &self.data_uri[DATA_SCHEME.len() + self.media_type.len() + BASE64_MARKER.len()..]
    }
}

/// Encode a byte payload into an [`ArtifactRef`]. Total for any input.
pub fn encode(bytes: &[u8], media_type: &str) -> ArtifactRef {
    let media_type = if media_type.trim().is_empty() {
        DEFAULT_MEDIA_TYPE
    } else {
        media_type.trim()
    };
    let payload = STANDARD.encode(bytes);
    ArtifactRef {
        media_type: media_type.to_string(),
        data_uri: format!("{DATA_SCHEME}{media_type}{BASE64_MARKER}{payload}"),
    }
}

/// Read `reader` to the end and encode the result.
///
/// When `expected_len` is known (e.g. from a `Content-Length` header) a
/// shorter stream is rejected with [`CodecError::IncompleteRead`].
pub fn encode_reader<R: Read>(
    mut reader: R,
    media_type: &str,
    expected_len: Option<u64>,
) -> Result<ArtifactRef, CodecError> {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf) {
        return Err(CodecError::IncompleteRead {
            read: buf.len() as u64,
            expected: expected_len,
            reason: e.to_string(),
        });
    }

    if let Some(expected) = expected_len {
        if (buf.len() as u64) < expected {
            return Err(CodecError::IncompleteRead {
                read: buf.len() as u64,
                expected: Some(expected),
                reason: "stream ended early".to_string(),
            });
        }
    }

    Ok(encode(&buf, media_type))
}

/// Recover the original bytes from an [`ArtifactRef`].
pub fn decode(artifact: &ArtifactRef) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(artifact.payload())?)
}

#[cfg(test)]
mod tests {
    use std::io;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn round_trip_preserves_every_byte_value() {
        let bytes: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        let artifact = encode(&bytes, "video/mp4");
        assert_eq!(decode(&artifact).unwrap(), bytes);
    }

    #[test]
    fn round_trip_empty_payload() {
        let artifact = encode(&[], "video/webm");
        assert_eq!(artifact.data_uri(), "data:video/webm;base64,");
        assert!(decode(&artifact).unwrap().is_empty());
    }

    #[test]
    fn encode_builds_data_uri() {
        let artifact = encode(b"hi", "video/mp4");
        assert_eq!(artifact.media_type(), "video/mp4");
        assert_eq!(artifact.data_uri(), "data:video/mp4;base64,aGk=");
    }

    #[test]
    fn blank_media_type_falls_back_to_default() {
        let artifact = encode(b"x", "  ");
        assert_eq!(artifact.media_type(), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn parse_accepts_encoded_uri() {
        let original = encode(b"payload", "video/quicktime");
        let parsed = ArtifactRef::parse(original.data_uri()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(decode(&parsed).unwrap(), b"payload");
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert_matches!(
            ArtifactRef::parse("video/mp4;base64,AAAA"),
            Err(CodecError::MalformedUri(_))
        );
    }

    #[test]
    fn parse_rejects_missing_marker() {
        assert_matches!(
            ArtifactRef::parse("data:video/mp4,AAAA"),
            Err(CodecError::MalformedUri(_))
        );
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let artifact = ArtifactRef::parse("data:video/mp4;base64,@@@").unwrap();
        assert_matches!(decode(&artifact), Err(CodecError::InvalidPayload(_)));
    }

    #[test]
    fn encode_reader_reads_full_stream() {
        let data = vec![7u8; 4096];
        let artifact = encode_reader(data.as_slice(), "video/mp4", Some(4096)).unwrap();
        assert_eq!(decode(&artifact).unwrap(), data);
    }

    #[test]
    fn encode_reader_rejects_short_stream() {
        let data = vec![1u8; 10];
        let err = encode_reader(data.as_slice(), "video/mp4", Some(20)).unwrap_err();
        assert_matches!(
            err,
            CodecError::IncompleteRead {
                read: 10,
                expected: Some(20),
                ..
            }
        );
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            self.served = true;
            buf[..3].copy_from_slice(b"abc");
            Ok(3)
        }
    }

    #[test]
    fn encode_reader_surfaces_read_errors() {
        let err = encode_reader(FailingReader { served: false }, "video/mp4", None).unwrap_err();
        assert_matches!(err, CodecError::IncompleteRead { read: 3, expected: None, .. });
    }
}
