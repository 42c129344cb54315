//! Key-string and byte-blob codecs.
//!
//! Keys travel between humans as Base32 strings carrying a type tag and a
//! CRC-16, so a transcription typo is caught before any cryptography runs.
//! The tag byte doubles as a visual prefix: verify keys start with `P`,
//! signing keys with `K`. Opaque blobs (wrapped keys, signatures, embedded
//! data) use strict Base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use crc::Crc;
use data_encoding::BASE32;

use crate::error::Result;
use crate::error::SongeError;

/// Tag byte for verify keys; puts a `P` at the front of the Base32 string.
pub const TAG_VERIFY: u8 = 0x78;
/// Tag byte for signing keys; puts a `K` at the front of the Base32 string.
pub const TAG_SIGNING: u8 = 0x50;

/// Length of an encoded key string: Base32 of `tag || raw32 || crc16`.
/// 35 bytes is a multiple of 5, so no padding appears.
pub const ENCODED_KEY_LEN: usize = 56;

/// CRC-16/ARC, the typo-detection checksum appended to encoded keys.
/// A transcription aid, not a cryptographic check.
const CRC16: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_ARC);

/// Encode an opaque byte blob as standard padded Base64.
pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode a strict Base64 string: standard alphabet, padding required.
pub fn decode_bytes(s: &str) -> Result<Vec<u8>> {
    BASE64.decode(s).map_err(|e| SongeError::BadEncoding(e.to_string()))
}

/// Encode 32 raw verify-key bytes as a `P…` key string.
pub fn encode_verify_key(raw: &[u8; 32]) -> String {
    encode_tagged(TAG_VERIFY, raw)
}

/// Encode a 32-byte signing seed as a `K…` key string.
pub fn encode_signing_key(raw: &[u8; 32]) -> String {
    encode_tagged(TAG_SIGNING, raw)
}

fn encode_tagged(tag: u8, raw: &[u8; 32]) -> String {
    let mut body = Vec::with_capacity(35);
    body.push(tag);
    body.extend_from_slice(raw);
    let crc = CRC16.checksum(&body);
    body.extend_from_slice(&crc.to_le_bytes());
    BASE32.encode(&body)
}

/// Decode a key string into its tag byte and 32 raw key bytes.
///
/// The CRC is checked here; the tag is handed back so callers can reject
/// key strings of the wrong kind.
pub fn decode_key(s: &str) -> Result<(u8, [u8; 32])> {
    let bytes = BASE32
        .decode(s.as_bytes())
        .map_err(|e| SongeError::BadEncoding(e.to_string()))?;
    if bytes.len() != 35 {
        return Err(SongeError::BadEncoding(format!(
            "key string decodes to {} bytes, expected 35",
            bytes.len()
        )));
    }
    let (body, crc_bytes) = bytes.split_at(33);
    let stored = u16::from_le_bytes([crc_bytes[0], crc_bytes[1]]);
    if CRC16.checksum(body) != stored {
        return Err(SongeError::BadChecksum);
    }
    let mut raw = [0u8; 32];
    raw.copy_from_slice(&body[1..]);
    Ok((body[0], raw))
}

/// Decode a `P…` verify-key string, rejecting any other tag.
pub fn decode_verify_key(s: &str) -> Result<[u8; 32]> {
    expect_tag(s, TAG_VERIFY)
}

/// Decode a `K…` signing-key string, rejecting any other tag.
pub fn decode_signing_key(s: &str) -> Result<[u8; 32]> {
    expect_tag(s, TAG_SIGNING)
}

fn expect_tag(s: &str, tag: u8) -> Result<[u8; 32]> {
    let (got, raw) = decode_key(s)?;
    if got != tag {
        return Err(SongeError::BadEncoding(format!("unexpected key tag 0x{got:02x}")));
    }
    Ok(raw)
}
