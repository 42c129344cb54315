//! The local list of trusted verify keys.
//!
//! `.songe.trust` is a plain text file, one `P…` key per line, LF-terminated,
//! sorted and deduplicated. Its sibling `.songe.trust.sgsig` carries an
//! Ed25519 signature over the exact file bytes so out-of-band edits are
//! detectable. Every mutation rewrites both files.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use ed25519_dalek::Signature;
use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier as _;
use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde::Serialize;

use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::error::SongeError;
use crate::fsutil;

/// Sibling record for the trust list: the signature and nothing else.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TrustSignature {
    signature: String,
}

/// A loaded trust list.
#[derive(Debug, Clone)]
pub struct TrustList {
    /// Trusted keys, sorted ascending, deduplicated.
    pub keys: Vec<String>,
    /// True when the list could not be checked against a signature, either
    /// because the sibling is missing or because no verify key was
    /// available. Callers surface this as a warning, not an error.
    pub unsigned: bool,
}

impl TrustList {
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Manages `.songe.trust` and its signature sibling for one directory.
pub struct TrustStore {
    list_path: PathBuf,
    sig_path: PathBuf,
}

impl TrustStore {
    pub fn new(dir: &Path, config: &Config) -> Self {
        Self {
            list_path: config.trust_path(dir),
            sig_path: config.trust_sig_path(dir),
        }
    }

    /// Load the trust list.
    ///
    /// With a `verifier` the sibling signature is checked and a mismatch is
    /// [`SongeError::BadSignature`]; strict callers pass the key freshly
    /// derived from the unwrapped signing key, which guards against a
    /// swapped key file. Without one the list is returned unverified and
    /// flagged `unsigned`. A missing list file is an empty, signed list.
    pub fn load(&self, verifier: Option<&VerifyingKey>) -> Result<TrustList> {
        let bytes = match fs::read(&self.list_path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(TrustList { keys: Vec::new(), unsigned: false });
            }
            Err(e) => return Err(e.into()),
        };

        let unsigned = match verifier {
            Some(v) if self.sig_path.exists() => {
                self.check_signature(&bytes, v)?;
                false
            }
            _ => true,
        };

        let text = String::from_utf8(bytes)
            .map_err(|_| SongeError::BadEncoding("trust list is not UTF-8".into()))?;
        let keys: BTreeSet<String> =
            text.lines().filter(|l| !l.is_empty()).map(str::to_owned).collect();
        Ok(TrustList { keys: keys.into_iter().collect(), unsigned })
    }

    /// Normalize, sign, and write the list. The list file lands before its
    /// signature so a crash in between leaves at worst an unsigned list,
    /// never a signature over missing bytes.
    pub fn save(&self, keys: &[String], signing: &SigningKey) -> Result<()> {
        let set: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        let mut text = set.into_iter().collect::<Vec<_>>().join("\n");
        text.push('\n');

        let sig = signing.sign(text.as_bytes());
        fsutil::write_atomic(&self.list_path, text.as_bytes(), false)?;

        let record = TrustSignature { signature: codec::encode_bytes(&sig.to_bytes()) };
        fsutil::write_atomic(&self.sig_path, serde_yaml::to_string(&record)?.as_bytes(), false)?;
        Ok(())
    }

    /// Add a verify key. Duplicates collapse; the list is re-signed either way.
    pub fn add(&self, key: &str, signing: &SigningKey) -> Result<()> {
        codec::decode_verify_key(key)?;
        let mut list = self.load(Some(&signing.verifying_key()))?;
        list.keys.push(key.to_owned());
        self.save(&list.keys, signing)
    }

    /// Remove a key by value or by 1-based index.
    ///
    /// A selector of one to four decimal digits is an index into the current
    /// list; anything else is a literal key. Removing something that is not
    /// there is a no-op, but the list is still re-signed.
    pub fn remove(&self, selector: &str, signing: &SigningKey) -> Result<()> {
        let mut list = self.load(Some(&signing.verifying_key()))?;

        if let Some(index) = parse_index(selector) {
            if index <= list.keys.len() {
                list.keys.remove(index - 1);
            }
        } else {
            list.keys.retain(|k| k != selector);
        }
        self.save(&list.keys, signing)
    }

    /// All entries containing `substring`, with their 1-based positions.
    pub fn find(&self, substring: &str, verifier: Option<&VerifyingKey>) -> Result<Vec<(usize, String)>> {
        let list = self.load(verifier)?;
        Ok(list
            .keys
            .iter()
            .enumerate()
            .filter(|(_, k)| k.contains(substring))
            .map(|(i, k)| (i + 1, k.clone()))
            .collect())
    }

    fn check_signature(&self, bytes: &[u8], verifier: &VerifyingKey) -> Result<()> {
        let text = fs::read_to_string(&self.sig_path)?;
        let record: TrustSignature = serde_yaml::from_str(&text)?;
        let sig_bytes = codec::decode_bytes(&record.signature)?;
        let sig: [u8; 64] = sig_bytes
            .as_slice()
            .try_into()
            .map_err(|_| SongeError::BadEncoding("trust signature must be 64 bytes".into()))?;
        verifier
            .verify(bytes, &Signature::from_bytes(&sig))
            .map_err(|_| SongeError::BadSignature)
    }
}

/// 1-based index selector: one to four decimal digits, nonzero.
fn parse_index(selector: &str) -> Option<usize> {
    if selector.is_empty() || selector.len() > 4 || !selector.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match selector.parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}
