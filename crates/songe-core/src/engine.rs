//! Signing and verification of files.

use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use ed25519_dalek::Signature;
use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier as _;
use ed25519_dalek::VerifyingKey;

use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::error::SongeError;
use crate::fsutil;
use crate::keystore::KeyStore;
use crate::keywrap;
use crate::record::CanonicalInput;
use crate::record::SignatureRecord;
use crate::truststore::TrustStore;

/// Outcome of a successful verification. A bad signature never gets here;
/// it is [`SongeError::BadSignature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The signature is valid and the signer's key is in the trust list.
    GoodTrusted,
    /// The signature is valid but the signer's key is not trusted here.
    GoodUntrusted,
}

/// Everything a caller needs to report a verification.
#[derive(Debug)]
pub struct Verification {
    pub verdict: Verdict,
    /// The parsed record (signer key, comment, datetime).
    pub record: SignatureRecord,
    /// The embedded bytes, recovered because the file itself was absent.
    /// Callers stream these to standard output.
    pub recovered: Option<Vec<u8>>,
    /// The file exists on disk, so embedded data in the record was ignored.
    pub ignored_embedded_data: bool,
    /// The trust list was consulted without signature verification.
    pub trust_unsigned: bool,
}

/// Signing options.
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    /// Comment bound into the signature. Empty is treated as absent.
    pub comment: Option<String>,
    /// Embed the file bytes into the record so verification can run
    /// without the original file.
    pub embedded: bool,
}

/// Sign `file` and write `<file>.sgsig`. Returns the record path.
pub fn sign_file(
    dir: &Path,
    config: &Config,
    file: &Path,
    opts: &SignOptions,
    passphrase: &str,
) -> Result<PathBuf> {
    let (signing, verify) = unlock(dir, config, passphrase)?;

    let datetime = unix_now();
    let comment = opts.comment.as_deref().filter(|c| !c.is_empty());

    let (digest, data) = if opts.embedded {
        let bytes = fs::read(file)?;
        let mut input = CanonicalInput::new();
        if let Some(c) = comment {
            input.comment(c);
        }
        input.datetime(datetime);
        input.embedded(&bytes);
        (input.finalize(), Some(bytes))
    } else {
        let mut input = CanonicalInput::new();
        stream_file(file, &mut input)?;
        if let Some(c) = comment {
            input.comment(c);
        }
        input.datetime(datetime);
        (input.finalize(), None)
    };

    let signature = signing.sign(&digest);
    let record = SignatureRecord {
        comment: comment.map(str::to_owned),
        datetime,
        verifykey: codec::encode_verify_key(verify.as_bytes()),
        data: data.map(|b| codec::encode_bytes(&b)),
        signature: codec::encode_bytes(&signature.to_bytes()),
    };

    let sig_path = config.sig_path(file);
    let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| file.display().to_string());
    fsutil::write_atomic(&sig_path, record.to_sgsig(&name)?.as_bytes(), false)?;
    Ok(sig_path)
}

/// Verify `<file>.sgsig`.
///
/// When `trust_anchor` is given (strict mode), the trust list is checked
/// against it instead of the declared local verify key.
///
/// The flow: parse the record; hash the file from disk when it exists
/// (warning when the record also embeds data), or the embedded bytes when it
/// does not; fail [`SongeError::NoData`] when neither is available; check
/// the Ed25519 signature over the digest; then look the signer up in the
/// trust list.
pub fn verify_file(
    dir: &Path,
    config: &Config,
    file: &Path,
    trust_anchor: Option<&VerifyingKey>,
) -> Result<Verification> {
    let sig_path = config.sig_path(file);
    let text = fs::read_to_string(&sig_path)?;
    let record = SignatureRecord::from_sgsig(&text)?;

    let signer_raw = codec::decode_verify_key(&record.verifykey)?;
    let signer = VerifyingKey::from_bytes(&signer_raw)
        .map_err(|_| SongeError::BadEncoding("signer key is not a valid Ed25519 point".into()))?;
    let sig_bytes = codec::decode_bytes(&record.signature)?;
    let sig: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| SongeError::BadEncoding("signature must be 64 bytes".into()))?;
    let signature = Signature::from_bytes(&sig);

    let comment = record.comment.as_deref().filter(|c| !c.is_empty());
    let mut recovered = None;
    let mut ignored_embedded_data = false;

    let digest = if file.exists() {
        ignored_embedded_data = record.data.is_some();
        let mut input = CanonicalInput::new();
        stream_file(file, &mut input)?;
        if let Some(c) = comment {
            input.comment(c);
        }
        input.datetime(record.datetime);
        input.finalize()
    } else if let Some(data_b64) = &record.data {
        let data = codec::decode_bytes(data_b64)?;
        let mut input = CanonicalInput::new();
        if let Some(c) = comment {
            input.comment(c);
        }
        input.datetime(record.datetime);
        input.embedded(&data);
        recovered = Some(data);
        input.finalize()
    } else {
        return Err(SongeError::NoData);
    };

    signer.verify(&digest, &signature).map_err(|_| SongeError::BadSignature)?;

    let (list, trust_unsigned) = lookup_trust(dir, config, trust_anchor)?;
    let verdict = if list.contains(&record.verifykey) {
        Verdict::GoodTrusted
    } else {
        Verdict::GoodUntrusted
    };

    Ok(Verification {
        verdict,
        record,
        recovered,
        ignored_embedded_data,
        trust_unsigned,
    })
}

/// Load the key file, unwrap the seed, and cross-check the declared verify
/// key against the one the seed derives to.
pub(crate) fn unlock(dir: &Path, config: &Config, passphrase: &str) -> Result<(SigningKey, VerifyingKey)> {
    let store = KeyStore::new(dir, config);
    let (wrapped, declared) = store.load()?;
    let seed = keywrap::unwrap(&wrapped, passphrase)?;
    let signing = SigningKey::from_bytes(&seed);
    if signing.verifying_key() != declared {
        return Err(SongeError::BadKeyfile(
            "declared verify key does not match the unwrapped signing key".into(),
        ));
    }
    Ok((signing, declared))
}

/// Trust lookup for verification. Never forces a passphrase: without an
/// explicit anchor it uses the declared local verify key, and in a
/// verify-only environment with no key file at all, the list is consulted
/// unverified.
fn lookup_trust(
    dir: &Path,
    config: &Config,
    trust_anchor: Option<&VerifyingKey>,
) -> Result<(crate::truststore::TrustList, bool)> {
    let trust = TrustStore::new(dir, config);
    let anchor = match trust_anchor {
        Some(v) => Some(*v),
        None => KeyStore::new(dir, config).load().ok().map(|(_, declared)| declared),
    };
    let list = trust.load(anchor.as_ref())?;
    let unsigned = list.unsigned;
    Ok((list, unsigned))
}

fn stream_file(path: &Path, input: &mut CanonicalInput) -> Result<()> {
    let mut file = io::BufReader::new(File::open(path)?);
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        input.file_chunk(&buf[..n]);
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
