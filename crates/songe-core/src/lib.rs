//! Per-project Ed25519 file signing.
//!
//! A project directory gets a signing key pair (`.songe.key`) with the
//! secret half sealed under a passphrase (Argon2id → XSalsa20-Poly1305).
//! Files are signed into `<file>.sgsig` records, detached by default or
//! with the file bytes embedded, and a signed list of trusted verify keys
//! (`.songe.trust`) decides whether a good signature is also a trusted one.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use songe_core::Project;
//! use songe_core::SignOptions;
//!
//! # fn main() -> songe_core::Result<()> {
//! let project = Project::open(".");
//! let verify_key = project.generate("correct horse battery staple")?;
//! println!("share this: {verify_key}");
//!
//! project.sign(Path::new("hello.txt"), &SignOptions::default(), "correct horse battery staple")?;
//! let outcome = project.verify(Path::new("hello.txt"))?;
//! println!("{:?}", outcome.verdict);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
mod fsutil;
pub mod keystore;
pub mod keywrap;
pub mod project;
pub mod record;
pub mod truststore;

pub use config::Config;
pub use engine::SignOptions;
pub use engine::Verdict;
pub use engine::Verification;
pub use error::Result;
pub use error::SongeError;
pub use project::Project;
pub use record::SignatureRecord;
pub use truststore::TrustList;
