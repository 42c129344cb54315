//! `songe trust` — manage the trusted verify keys.

use clap::Subcommand;
use songe_core::Project;
use songe_core::TrustList;

use crate::prompt;

#[derive(Subcommand)]
pub enum TrustCommand {
    /// List trusted keys, optionally filtered by substring.
    List {
        substring: Option<String>,
        /// Verify the list against the unwrapped signing key.
        #[arg(long)]
        strict: bool,
    },

    /// Add a verify key (`P…`) to the trust list.
    Add { key: String },

    /// Remove a key, by full value or by its 1-based list index.
    Remove { selector: String },
}

pub fn run(command: TrustCommand) -> anyhow::Result<()> {
    let project = Project::open(".");
    match command {
        TrustCommand::List { substring, strict } => {
            let list = if strict {
                let passphrase = prompt::passphrase("Key passphrase")?;
                project.trust_list_strict(&passphrase)?
            } else {
                project.trust_list()?
            };
            warn_unsigned(&list);

            let needle = substring.as_deref().unwrap_or("");
            for (index, key) in list.keys.iter().enumerate() {
                if key.contains(needle) {
                    println!("{:>4}  {key}", index + 1);
                }
            }
        }
        TrustCommand::Add { key } => {
            let passphrase = prompt::passphrase("Key passphrase")?;
            project.trust_add(&key, &passphrase)?;
            println!("✓ Trusted {key}");
        }
        TrustCommand::Remove { selector } => {
            let passphrase = prompt::passphrase("Key passphrase")?;
            project.trust_remove(&selector, &passphrase)?;
            println!("✓ Trust list updated");
        }
    }
    Ok(())
}

fn warn_unsigned(list: &TrustList) {
    if list.unsigned {
        eprintln!("warning: the trust list could not be checked against a signature");
    }
}
