//! Error types for signing operations.

/// Errors surfaced by the signing library.
///
/// The library never logs or prompts; callers render these and decide on
/// exit codes.
#[derive(Debug, thiserror::Error)]
pub enum SongeError {
    /// A Base32 or Base64 string could not be decoded.
    #[error("malformed encoding: {0}")]
    BadEncoding(String),

    /// The CRC-16 appended to an encoded key does not match its body.
    #[error("key checksum mismatch (mistyped key?)")]
    BadChecksum,

    /// The key file is missing, malformed, or inconsistent with itself.
    #[error("bad key file: {0}")]
    BadKeyfile(String),

    /// The secretbox would not open with the derived key. Corruption and a
    /// wrong passphrase are deliberately indistinguishable.
    #[error("wrong passphrase or corrupted key file")]
    BadPassphrase,

    /// The Ed25519 signature did not verify.
    #[error("signature verification failed")]
    BadSignature,

    /// Verification was requested but the file is gone and the record
    /// embeds no data.
    #[error("nothing to verify: file is missing and the signature embeds no data")]
    NoData,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SongeError>;
