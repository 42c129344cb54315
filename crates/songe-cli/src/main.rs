//! `songe` — per-project file signing.

mod keygen;
mod passwd;
mod prompt;
mod show;
mod sign;
mod trust;
mod verify;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

/// Sign and verify files with a per-project Ed25519 key.
#[derive(Parser)]
#[command(name = "songe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new key pair for this project.
    Generate,

    /// Import an existing signing key (pasted `K…` string).
    Import,

    /// Change the key passphrase.
    Passwd,

    /// Print the verify key, or the secret signing key with --signing.
    Show {
        /// Print the `K…` signing key (prompts for the passphrase).
        #[arg(long)]
        signing: bool,
    },

    /// Sign a file into `<file>.sgsig`.
    Sign {
        file: PathBuf,
        /// Comment signed along with the file.
        #[arg(short, long)]
        comment: Option<String>,
        /// Embed the file bytes so verification works without the file.
        #[arg(short, long)]
        embed: bool,
    },

    /// Verify `<file>.sgsig` and report trust.
    Verify {
        file: PathBuf,
        /// Re-check the trust list against the unwrapped signing key.
        #[arg(long)]
        strict: bool,
    },

    /// Manage the list of trusted verify keys.
    Trust {
        #[command(subcommand)]
        command: trust::TrustCommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate => keygen::run(),
        Command::Import => keygen::run_import(),
        Command::Passwd => passwd::run(),
        Command::Show { signing } => show::run(signing),
        Command::Sign { file, comment, embed } => sign::run(&file, comment, embed),
        Command::Verify { file, strict } => verify::run(&file, strict),
        Command::Trust { command } => trust::run(command),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
