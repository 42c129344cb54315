//! `songe show` — print the project keys.

use songe_core::Project;

use crate::prompt;

pub fn run(signing: bool) -> anyhow::Result<()> {
    let project = Project::open(".");
    if signing {
        let passphrase = prompt::passphrase("Key passphrase")?;
        println!("{}", project.show_signing_key(&passphrase)?);
    } else {
        println!("{}", project.show_verify_key()?);
    }
    Ok(())
}
