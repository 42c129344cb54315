//! One façade over the signing components.
//!
//! A [`Project`] is a directory plus a [`Config`]; every CLI command maps to
//! exactly one method here. Passphrases arrive as arguments; prompting is
//! the caller's business.

use std::path::Path;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::codec;
use crate::config::Config;
use crate::engine;
use crate::engine::SignOptions;
use crate::engine::Verification;
use crate::error::Result;
use crate::error::SongeError;
use crate::keystore::KeyStore;
use crate::keywrap;
use crate::truststore::TrustList;
use crate::truststore::TrustStore;

pub struct Project {
    dir: PathBuf,
    config: Config,
}

impl Project {
    /// Open a project directory with the default file-name conventions.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(dir, Config::default())
    }

    pub fn with_config(dir: impl Into<PathBuf>, config: Config) -> Self {
        Self { dir: dir.into(), config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the key file is (or would be created).
    pub fn key_path(&self) -> PathBuf {
        self.config.resolve_key_path(&self.dir)
    }

    /// Create a fresh key pair, wrap the seed under `passphrase`, and store
    /// the key file. Returns the `P…` verify key to share.
    ///
    /// Refuses to overwrite an existing key file.
    pub fn generate(&self, passphrase: &str) -> Result<String> {
        self.check_no_key_file()?;
        let signing = SigningKey::generate(&mut OsRng);
        self.store_key(&signing, passphrase)
    }

    /// Import a pasted `K…` signing key, derive its verify key, and store
    /// the pair like [`Project::generate`].
    pub fn import(&self, encoded_seed: &str, passphrase: &str) -> Result<String> {
        self.check_no_key_file()?;
        let seed = Zeroizing::new(codec::decode_signing_key(encoded_seed)?);
        let signing = SigningKey::from_bytes(&seed);
        self.store_key(&signing, passphrase)
    }

    /// Unwrap with the old passphrase, rewrap with the new one. The key pair
    /// is unchanged; the trust-list signature is invalidated by the store.
    pub fn change_passphrase(&self, old: &str, new: &str) -> Result<()> {
        let (signing, declared) = engine::unlock(&self.dir, &self.config, old)?;
        let seed = Zeroizing::new(signing.to_bytes());
        let wrapped = keywrap::wrap(&seed, new)?;
        KeyStore::new(&self.dir, &self.config).store(&wrapped, &declared)
    }

    /// The public `P…` key. No passphrase needed.
    pub fn show_verify_key(&self) -> Result<String> {
        let (_, declared) = KeyStore::new(&self.dir, &self.config).load()?;
        Ok(codec::encode_verify_key(declared.as_bytes()))
    }

    /// The secret `K…` key, for backing up or moving to another machine.
    pub fn show_signing_key(&self, passphrase: &str) -> Result<String> {
        let (signing, _) = engine::unlock(&self.dir, &self.config, passphrase)?;
        Ok(codec::encode_signing_key(&signing.to_bytes()))
    }

    /// Sign `file` into `<file>.sgsig`. Returns the record path.
    pub fn sign(&self, file: &Path, opts: &SignOptions, passphrase: &str) -> Result<PathBuf> {
        engine::sign_file(&self.dir, &self.config, file, opts, passphrase)
    }

    /// Verify `<file>.sgsig` against the file (or its embedded copy).
    pub fn verify(&self, file: &Path) -> Result<Verification> {
        engine::verify_file(&self.dir, &self.config, file, None)
    }

    /// Like [`Project::verify`], but the trust list is checked against the
    /// verify key derived from the freshly unwrapped signing key, guarding
    /// against a swapped key file.
    pub fn verify_strict(&self, file: &Path, passphrase: &str) -> Result<Verification> {
        let (_, declared) = engine::unlock(&self.dir, &self.config, passphrase)?;
        engine::verify_file(&self.dir, &self.config, file, Some(&declared))
    }

    /// The trust list, checked against the declared local verify key when a
    /// key file is present.
    pub fn trust_list(&self) -> Result<TrustList> {
        let anchor = KeyStore::new(&self.dir, &self.config).load().ok().map(|(_, k)| k);
        self.trust_store().load(anchor.as_ref())
    }

    /// The trust list, checked against the derived verify key.
    pub fn trust_list_strict(&self, passphrase: &str) -> Result<TrustList> {
        let (_, declared) = engine::unlock(&self.dir, &self.config, passphrase)?;
        self.trust_store().load(Some(&declared))
    }

    /// Entries containing `substring`, with 1-based positions.
    pub fn trust_find(&self, substring: &str) -> Result<Vec<(usize, String)>> {
        let anchor = KeyStore::new(&self.dir, &self.config).load().ok().map(|(_, k)| k);
        self.trust_store().find(substring, anchor.as_ref())
    }

    /// Add a `P…` key to the trust list and re-sign it.
    pub fn trust_add(&self, key: &str, passphrase: &str) -> Result<()> {
        let (signing, _) = engine::unlock(&self.dir, &self.config, passphrase)?;
        self.trust_store().add(key, &signing)
    }

    /// Remove a key (by value, or by 1-based index for short numeric
    /// selectors) and re-sign the list.
    pub fn trust_remove(&self, selector: &str, passphrase: &str) -> Result<()> {
        let (signing, _) = engine::unlock(&self.dir, &self.config, passphrase)?;
        self.trust_store().remove(selector, &signing)
    }

    fn trust_store(&self) -> TrustStore {
        TrustStore::new(&self.dir, &self.config)
    }

    fn check_no_key_file(&self) -> Result<()> {
        let store = KeyStore::new(&self.dir, &self.config);
        if store.exists() {
            return Err(SongeError::BadKeyfile(format!(
                "a key file already exists at {}",
                store.path().display()
            )));
        }
        Ok(())
    }

    fn store_key(&self, signing: &SigningKey, passphrase: &str) -> Result<String> {
        let seed = Zeroizing::new(signing.to_bytes());
        let wrapped = keywrap::wrap(&seed, passphrase)?;
        let verify = signing.verifying_key();
        KeyStore::new(&self.dir, &self.config).store(&wrapped, &verify)?;
        Ok(codec::encode_verify_key(verify.as_bytes()))
    }
}
