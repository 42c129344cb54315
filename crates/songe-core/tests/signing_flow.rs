//! End-to-end signing flows in a temporary project directory.

use std::fs;
use std::path::Path;

use songe_core::codec;
use songe_core::Project;
use songe_core::SignOptions;
use songe_core::SongeError;
use songe_core::Verdict;

const PASSPHRASE: &str = "correct horse battery staple";

fn opts(comment: &str, embedded: bool) -> SignOptions {
    SignOptions {
        comment: if comment.is_empty() { None } else { Some(comment.to_owned()) },
        embedded,
    }
}

#[test]
fn generate_produces_a_shareable_verify_key() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());

    let verify_key = project.generate(PASSPHRASE).unwrap();
    assert_eq!(verify_key.len(), 56);
    assert!(verify_key.starts_with('P'));
    codec::decode_verify_key(&verify_key).unwrap();

    assert_eq!(project.show_verify_key().unwrap(), verify_key);

    // A second generate must not clobber the key file.
    assert!(matches!(project.generate(PASSPHRASE), Err(SongeError::BadKeyfile(_))));
}

#[test]
fn detached_sign_verify_and_trust() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    let verify_key = project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();

    let sig_path = project.sign(&file, &opts("release v1", false), PASSPHRASE).unwrap();
    assert_eq!(sig_path, file.with_file_name("hello.txt.sgsig"));

    // Not yet trusted.
    let outcome = project.verify(&file).unwrap();
    assert_eq!(outcome.verdict, Verdict::GoodUntrusted);
    assert_eq!(outcome.record.comment.as_deref(), Some("release v1"));
    assert!(outcome.recovered.is_none());

    // Trusted after adding our own key.
    project.trust_add(&verify_key, PASSPHRASE).unwrap();
    let outcome = project.verify(&file).unwrap();
    assert_eq!(outcome.verdict, Verdict::GoodTrusted);
    assert!(!outcome.trust_unsigned);
}

#[test]
fn flipped_file_byte_breaks_the_signature() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    project.sign(&file, &opts("release v1", false), PASSPHRASE).unwrap();

    // H -> I
    fs::write(&file, "Iello, world!\n").unwrap();
    assert!(matches!(project.verify(&file), Err(SongeError::BadSignature)));
}

#[test]
fn tampered_record_fields_break_the_signature() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("data.bin");
    fs::write(&file, b"payload").unwrap();
    let sig_path = project.sign(&file, &opts("v1", false), PASSPHRASE).unwrap();

    // Bump the signed datetime by one second.
    let text = fs::read_to_string(&sig_path).unwrap();
    let tampered: String = text
        .lines()
        .map(|l| {
            if let Some(ts) = l.strip_prefix("datetime: ") {
                format!("datetime: {}\n", ts.trim().parse::<u64>().unwrap() + 1)
            } else {
                format!("{l}\n")
            }
        })
        .collect();
    fs::write(&sig_path, &tampered).unwrap();
    assert!(matches!(project.verify(&file), Err(SongeError::BadSignature)));

    // Change the signed comment.
    let tampered = text.replace("comment: v1", "comment: v2");
    fs::write(&sig_path, tampered).unwrap();
    assert!(matches!(project.verify(&file), Err(SongeError::BadSignature)));
}

#[test]
fn embedded_signature_survives_file_deletion() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    project.sign(&file, &opts("", true), PASSPHRASE).unwrap();

    // While the file exists, its bytes win and the embedded copy is ignored.
    let outcome = project.verify(&file).unwrap();
    assert!(outcome.ignored_embedded_data);
    assert!(outcome.recovered.is_none());

    fs::remove_file(&file).unwrap();
    let outcome = project.verify(&file).unwrap();
    assert_eq!(outcome.recovered.as_deref(), Some("Hello, world!\n".as_bytes()));
}

#[test]
fn embedded_record_detects_data_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    let sig_path = project.sign(&file, &opts("", true), PASSPHRASE).unwrap();
    fs::remove_file(&file).unwrap();

    let text = fs::read_to_string(&sig_path).unwrap();
    let original_b64 = codec::encode_bytes(b"Hello, world!\n");
    let tampered_b64 = codec::encode_bytes(b"Hello, World!\n");
    let tampered = text.replace(&original_b64, &tampered_b64);
    assert_ne!(text, tampered);
    fs::write(&sig_path, tampered).unwrap();

    assert!(matches!(project.verify(&file), Err(SongeError::BadSignature)));
}

#[test]
fn missing_file_without_embedded_data_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    project.sign(&file, &opts("", false), PASSPHRASE).unwrap();
    fs::remove_file(&file).unwrap();

    assert!(matches!(project.verify(&file), Err(SongeError::NoData)));
}

#[test]
fn trust_file_stays_sorted_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let a = codec::encode_verify_key(&[0x0Au8; 32]);
    let b = codec::encode_verify_key(&[0x0Bu8; 32]);
    let c = codec::encode_verify_key(&[0x0Cu8; 32]);
    for key in [&a, &c, &b] {
        project.trust_add(key, PASSPHRASE).unwrap();
    }

    let text = fs::read_to_string(dir.path().join(".songe.trust")).unwrap();
    let mut expected = vec![a, b, c];
    expected.sort();
    assert_eq!(text, format!("{}\n", expected.join("\n")));

    // Strict load re-verifies against the unwrapped signing key.
    let list = project.trust_list_strict(PASSPHRASE).unwrap();
    assert_eq!(list.keys, expected);
    assert!(!list.unsigned);
}

#[test]
fn out_of_band_trust_edit_fails_strict_load() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();
    project.trust_add(&codec::encode_verify_key(&[1u8; 32]), PASSPHRASE).unwrap();

    let path = dir.path().join(".songe.trust");
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str(&codec::encode_verify_key(&[2u8; 32]));
    text.push('\n');
    fs::write(&path, text).unwrap();

    assert!(matches!(project.trust_list_strict(PASSPHRASE), Err(SongeError::BadSignature)));
}

#[test]
fn change_passphrase_keeps_the_identity_and_invalidates_the_trust_signature() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());

    let verify_key = project.generate("p1").unwrap();
    project.trust_add(&verify_key, "p1").unwrap();
    let trust_sig = dir.path().join(".songe.trust.sgsig");
    assert!(trust_sig.exists());

    project.change_passphrase("p1", "p2").unwrap();
    assert!(!trust_sig.exists(), "stale trust signature must be deleted");

    assert!(matches!(project.show_signing_key("p1"), Err(SongeError::BadPassphrase)));
    assert_eq!(project.show_verify_key().unwrap(), verify_key);

    // The unwrapped key still derives the same identity.
    let signing_key = project.show_signing_key("p2").unwrap();
    assert!(signing_key.starts_with('K'));
    let seed = codec::decode_signing_key(&signing_key).unwrap();
    let derived = ed25519_dalek::SigningKey::from_bytes(&seed).verifying_key();
    assert_eq!(codec::encode_verify_key(derived.as_bytes()), verify_key);
}

#[test]
fn import_reproduces_the_same_key_pair() {
    let dir_a = tempfile::tempdir().unwrap();
    let project_a = Project::open(dir_a.path());
    let verify_a = project_a.generate(PASSPHRASE).unwrap();
    let exported = project_a.show_signing_key(PASSPHRASE).unwrap();

    let dir_b = tempfile::tempdir().unwrap();
    let project_b = Project::open(dir_b.path());
    let verify_b = project_b.import(&exported, "other passphrase").unwrap();
    assert_eq!(verify_a, verify_b);
}

#[test]
fn verify_works_without_a_local_key_file() {
    // Signer project.
    let signer_dir = tempfile::tempdir().unwrap();
    let signer = Project::open(signer_dir.path());
    signer.generate(PASSPHRASE).unwrap();

    let file = signer_dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    signer.sign(&file, &opts("", false), PASSPHRASE).unwrap();

    // Verify-only environment: same files, no .songe.key.
    let verifier_dir = tempfile::tempdir().unwrap();
    let target = verifier_dir.path().join("hello.txt");
    fs::copy(&file, &target).unwrap();
    fs::copy(
        signer_dir.path().join("hello.txt.sgsig"),
        verifier_dir.path().join("hello.txt.sgsig"),
    )
    .unwrap();

    let verifier = Project::open(verifier_dir.path());
    let outcome = verifier.verify(Path::new(&target)).unwrap();
    assert_eq!(outcome.verdict, Verdict::GoodUntrusted);
}

#[test]
fn sgsig_file_starts_with_a_comment_banner() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::open(dir.path());
    project.generate(PASSPHRASE).unwrap();

    let file = dir.path().join("hello.txt");
    fs::write(&file, "Hello, world!\n").unwrap();
    let sig_path = project.sign(&file, &opts("", false), PASSPHRASE).unwrap();

    let text = fs::read_to_string(sig_path).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with('#'));
    assert!(lines.next().unwrap().starts_with('#'));
    assert!(text.contains("verifykey: P"));
}
