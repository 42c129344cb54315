//! `songe passwd` — change the key passphrase.

use songe_core::Project;

use crate::prompt;

pub fn run() -> anyhow::Result<()> {
    let project = Project::open(".");
    let old = prompt::passphrase("Current passphrase")?;
    let new = prompt::new_passphrase("New passphrase")?;
    project.change_passphrase(&old, &new)?;
    println!("✓ Passphrase changed");
    println!("  The trust list must be re-signed: run any trust command to do so.");
    Ok(())
}
