//! The signature record and the canonical hash input.
//!
//! A `.sgsig` file is a YAML record preceded by a short `#` banner (YAML
//! treats the banner as comments, so parsing needs no special casing). The
//! signature itself covers a SHA-512 digest built from tagged chunks; the
//! chunk order is part of the format and is identical for signing and
//! verification.

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha512;

use crate::error::Result;
use crate::error::SongeError;

/// Separator fed before each canonical-input chunk after the first.
///
/// These are the five ASCII bytes `\0x00` (backslash, `0`, `x`, `0`, `0`),
/// not a NUL. Every existing signature was produced with this literal, so
/// it can never change.
const CHUNK_SEP: &[u8] = b"\\0x00";

/// A parsed `.sgsig` record. Field order is the on-disk order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SignatureRecord {
    /// Free-form signed comment. Absent when the signer supplied none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Unix timestamp captured when signing began.
    pub datetime: u64,
    /// Signer's verify key in the `P…` encoding.
    pub verifykey: String,
    /// Base64 of the signed file's bytes; present in embedded mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Base64 of the 64-byte Ed25519 signature over the canonical digest.
    pub signature: String,
}

impl SignatureRecord {
    /// Parse a `.sgsig` file body (leading `#` lines are YAML comments and
    /// are tolerated).
    pub fn from_sgsig(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(SongeError::from)
    }

    /// Render the record with a human-readable banner naming the file.
    pub fn to_sgsig(&self, file_name: &str) -> Result<String> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!(
            "# songe signature of {file_name}\n# check it with `songe verify {file_name}` or `songev {file_name}`\n{body}"
        ))
    }
}

/// Incremental builder for the canonical SHA-512 input.
///
/// Chunks must be fed in the fixed order: detached file content (streamed),
/// the comment if any, the decimal datetime, then the embedded file bytes in
/// embedded mode. [`SignatureRecord`]'s signature covers the resulting
/// 64-byte digest, which Ed25519 then signs as its message.
pub struct CanonicalInput {
    hasher: Sha512,
}

impl CanonicalInput {
    pub fn new() -> Self {
        Self { hasher: Sha512::new() }
    }

    /// Stream a chunk of detached file content. May be called repeatedly;
    /// no separator is inserted.
    pub fn file_chunk(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Append the signed comment.
    pub fn comment(&mut self, comment: &str) {
        self.hasher.update(CHUNK_SEP);
        self.hasher.update(comment.as_bytes());
    }

    /// Append the signing timestamp as decimal ASCII.
    pub fn datetime(&mut self, datetime: u64) {
        self.hasher.update(CHUNK_SEP);
        self.hasher.update(datetime.to_string().as_bytes());
    }

    /// Append the embedded file bytes.
    pub fn embedded(&mut self, data: &[u8]) {
        self.hasher.update(CHUNK_SEP);
        self.hasher.update(data);
    }

    /// The 64-byte digest that gets signed.
    pub fn finalize(self) -> [u8; 64] {
        self.hasher.finalize().into()
    }
}

impl Default for CanonicalInput {
    fn default() -> Self {
        Self::new()
    }
}
