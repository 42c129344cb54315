//! Passphrase wrap for the signing seed.
//!
//! The 32-byte Ed25519 seed is sealed with XSalsa20-Poly1305 under a key
//! derived from the passphrase with Argon2id. The KDF parameters are fixed
//! forever: opslimit 5 and a byte-denominated memlimit of 7,256,678, which
//! converts to 7086 whole KiB blocks on a single lane. Any deviation would
//! make existing key files undecryptable.

use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use crypto_secretbox::aead::Aead;
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::Nonce;
use crypto_secretbox::XSalsa20Poly1305;
use rand_core::OsRng;
use rand_core::RngCore;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::error::SongeError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 24;
/// 32-byte seed plus the 16-byte Poly1305 tag.
pub const CT_LEN: usize = 48;
/// Total length of a wrapped-key blob: `salt || nonce || ciphertext`.
pub const WRAPPED_LEN: usize = SALT_LEN + NONCE_LEN + CT_LEN;

const ARGON2_T_COST: u32 = 5;
const ARGON2_M_COST_KIB: u32 = 7_256_678 / 1024;
const ARGON2_LANES: u32 = 1;

/// Derive the 32-byte secretbox key from a passphrase and salt.
fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    let params = Params::new(ARGON2_M_COST_KIB, ARGON2_T_COST, ARGON2_LANES, Some(32))
        .map_err(|e| SongeError::BadKeyfile(format!("key derivation parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|e| SongeError::BadKeyfile(format!("key derivation failed: {e}")))?;
    Ok(key)
}

/// Encrypt a 32-byte signing seed under `passphrase`.
///
/// Returns the 88-byte blob `salt(16) || nonce(24) || ciphertext(48)`.
pub fn wrap(seed: &[u8; 32], passphrase: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt)?;
    let cipher = XSalsa20Poly1305::new_from_slice(&key[..])
        .map_err(|e| SongeError::BadKeyfile(format!("secretbox key: {e}")))?;
    let ct = cipher
        .encrypt(Nonce::from_slice(&nonce), seed.as_slice())
        .map_err(|_| SongeError::BadKeyfile("secretbox seal failed".into()))?;

    let mut out = Vec::with_capacity(WRAPPED_LEN);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ct);
    Ok(out)
}

/// Decrypt a wrapped-key blob with `passphrase`.
///
/// Authentication failure and ciphertext corruption are deliberately
/// indistinguishable; both surface as [`SongeError::BadPassphrase`].
pub fn unwrap(wrapped: &[u8], passphrase: &str) -> Result<Zeroizing<[u8; 32]>> {
    if wrapped.len() != WRAPPED_LEN {
        return Err(SongeError::BadKeyfile(format!(
            "wrapped key is {} bytes, expected {WRAPPED_LEN}",
            wrapped.len()
        )));
    }
    let (salt, rest) = wrapped.split_at(SALT_LEN);
    let (nonce, ct) = rest.split_at(NONCE_LEN);

    let key = derive_key(passphrase, salt)?;
    let cipher = XSalsa20Poly1305::new_from_slice(&key[..])
        .map_err(|e| SongeError::BadKeyfile(format!("secretbox key: {e}")))?;
    let plain = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce), ct)
            .map_err(|_| SongeError::BadPassphrase)?,
    );

    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&plain);
    Ok(seed)
}
