//! `songev` — verify-only companion to `songe`.
//!
//! Links only the verify path: no key generation, no passphrase prompting,
//! no trust-store mutation. Recovered embedded data goes to standard
//! output; diagnostics go to standard error.

use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use songe_core::Project;
use songe_core::Verdict;

/// Verify a file against its `.sgsig` signature record.
#[derive(Parser)]
#[command(name = "songev", version, about)]
struct Cli {
    /// File whose signature record to verify.
    file: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project = Project::open(".");
    let outcome = project.verify(&cli.file)?;

    if outcome.ignored_embedded_data {
        eprintln!(
            "warning: {} exists on disk; ignoring the data embedded in the signature",
            cli.file.display()
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
            eprintln!("✓ Good signature — but the key is not in the local trust list:");
            eprintln!("  {}", outcome.record.verifykey);
        }
    }
    if let Some(comment) = &outcome.record.comment {
        eprintln!("  Comment: {comment}");
    }
    eprintln!("  Signed at: {} (unix)", outcome.record.datetime);
    Ok(())
}
