//! `songe verify` — verify a file's signature and report trust.
//!
//! Recovered embedded data goes to standard output; everything else goes to
//! standard error so the data stream stays clean.

use std::io::Write as _;
use std::path::Path;

use songe_core::Project;
use songe_core::Verdict;
use songe_core::Verification;

use crate::prompt;

pub fn run(file: &Path, strict: bool) -> anyhow::Result<()> {
    let project = Project::open(".");
    let outcome = if strict {
        let passphrase = prompt::passphrase("Key passphrase")?;
        project.verify_strict(file, &passphrase)?
    } else {
        project.verify(file)?
    };
    render(file, &outcome)
}

fn render(file: &Path, outcome: &Verification) -> anyhow::Result<()> {
    if outcome.ignored_embedded_data {
        eprintln!(
            "warning: {} exists on disk; ignoring the data embedded in the signature",
            file.display()
        );
    }
    if outcome.trust_unsigned {
        eprintln!("warning: the trust list could not be checked against a signature");
    }

    if let Some(data) = &outcome.recovered {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    }

    match outcome.verdict {
        Verdict::GoodTrusted => {
            eprintln!("✓ Good signature from trusted key {}", outcome.record.verifykey);
        }
        Verdict::GoodUntrusted => {
            eprintln!("✓ Good signature — but the key is not in your trust list:");
            eprintln!("  {}", outcome.record.verifykey);
            eprintln!("  Trust it with: songe trust add {}", outcome.record.verifykey);
        }
    }
    if let Some(comment) = &outcome.record.comment {
        eprintln!("  Comment: {comment}");
    }
    eprintln!("  Signed at: {} (unix)", outcome.record.datetime);
    Ok(())
}
