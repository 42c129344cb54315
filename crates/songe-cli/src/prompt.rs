//! Passphrase and key prompting.

use dialoguer::Password;

/// Prompt for an existing passphrase.
pub fn passphrase(prompt: &str) -> anyhow::Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Prompt for a new passphrase, with confirmation.
pub fn new_passphrase(prompt: &str) -> anyhow::Result<String> {
    let first = Password::new().with_prompt(prompt).interact()?;
    let confirm = Password::new().with_prompt("Confirm passphrase").interact()?;
    if first != confirm {
        anyhow::bail!("passphrases do not match");
    }
    Ok(first)
}

/// Prompt for a pasted secret key; hidden like a passphrase.
pub fn secret_key() -> anyhow::Result<String> {
    Ok(Password::new().with_prompt("Signing key (K…)").interact()?)
}
