//! `songe generate` and `songe import` — set up the project key pair.

use songe_core::Project;

use crate::prompt;

pub fn run() -> anyhow::Result<()> {
    let project = Project::open(".");
    let passphrase = prompt::new_passphrase("New key passphrase")?;
    let verify_key = project.generate(&passphrase)?;
    report(&project, &verify_key);
    Ok(())
}

pub fn run_import() -> anyhow::Result<()> {
    let project = Project::open(".");
    let encoded = prompt::secret_key()?;
    let passphrase = prompt::new_passphrase("New key passphrase")?;
    let verify_key = project.import(encoded.trim(), &passphrase)?;
    report(&project, &verify_key);
    Ok(())
}

fn report(project: &Project, verify_key: &str) {
    println!("✓ Signing key pair ready");
    println!("  Key file:   {}", project.key_path().display());
    println!("  Verify key: {verify_key}");
    println!();
    println!("  Share the verify key; never share the key file or passphrase.");
}
