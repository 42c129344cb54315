//! `songe sign` — sign a file.

use std::path::Path;

use songe_core::Project;
use songe_core::SignOptions;

use crate::prompt;

pub fn run(file: &Path, comment: Option<String>, embed: bool) -> anyhow::Result<()> {
    let project = Project::open(".");
    let passphrase = prompt::passphrase("Key passphrase")?;

    let options = SignOptions { comment, embedded: embed };
    let sig_path = project.sign(file, &options, &passphrase)?;

    println!("✓ Signed {}", file.display());
    println!("  Signature: {}", sig_path.display());
    if embed {
        println!("  The file bytes are embedded; the signature verifies even without the file.");
    }
    Ok(())
}
