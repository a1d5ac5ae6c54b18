#![cfg(feature = "cli")]
use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str, data: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cgs-cli-{}-{}.cgs", std::process::id(), name));
    std::fs::write(&path, data).unwrap();
    path
}

fn newtown() -> Vec<u8> {
    let mut data = b"CGS1\x01\x00".to_vec();
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&10u32.to_le_bytes());
    data.extend_from_slice(b"population");
    data.extend_from_slice(&42000i32.to_le_bytes());
    data.extend_from_slice(&[0; 8]);
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(b"cityName");
    data.extend_from_slice(&7u32.to_le_bytes());
    data.extend_from_slice(b"Newtown");
    data
}

fn cgsinfo(path: &PathBuf) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cgsinfo"))
        .arg(path)
        .output()
        .unwrap()
}

#[test]
fn test_summary_output() {
    let data = newtown();
    let path = fixture("summary", &data);
    let output = cgsinfo(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Header: CGS1\n"));
    assert!(stdout.contains("  [Int 0] population = 42000\n"));
    assert!(stdout.contains("  [String 0] cityName = Newtown\n"));
    assert!(stdout.ends_with(&format!(
        "Parsed up to position: {0} / {0} bytes\n",
        data.len()
    )));
}

#[test]
fn test_anomalies_still_succeed() {
    let data = newtown();
    let path = fixture("truncated", &data[..data.len() - 3]);
    let output = cgsinfo(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[String 0] invalid value length: 7"));
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("cgs-cli-does-not-exist.cgs");
    let output = cgsinfo(&path);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_file_too_small() {
    let path = fixture("small", b"CGS1");
    let output = cgsinfo(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}
