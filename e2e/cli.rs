// e2e/cli.rs — CLI integration tests, black-box via std::process::Command.

use std::path::PathBuf;
use std::process::{Command, Stdio};

fn bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_calldata-compress") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("calldata-compress");
    p
}

#[test]
fn cd_compress_decompress_roundtrip_via_args() {
    let hex = format!("0x{}", "00".repeat(40));

    let compress = Command::new(bin())
        .args(["cd", "compress", "--in", &hex])
        .output()
        .expect("failed to run cd compress");
    assert!(compress.status.success());
    let compressed = String::from_utf8_lossy(&compress.stdout).trim().to_string();

    let decompress = Command::new(bin())
        .args(["cd", "decompress", "--in", &compressed])
        .output()
        .expect("failed to run cd decompress");
    assert!(decompress.status.success());
    let decompressed = String::from_utf8_lossy(&decompress.stdout).trim().to_string();
    assert_eq!(decompressed, hex);
}

#[test]
fn flz_compress_reads_from_stdin_when_no_in_flag() {
    let hex = format!("0x{}", "ab".repeat(30));

    let mut child = Command::new(bin())
        .args(["flz", "compress"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn flz compress");
    {
        use std::io::Write;
        child
            .stdin
            .as_mut()
            .unwrap()
            .write_all(hex.as_bytes())
            .unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().starts_with("0x"));
}

#[test]
fn jit_build_prints_hex_ending_in_the_fixed_epilogue() {
    let hex = format!("0x{}", "11".repeat(64));
    let output = Command::new(bin())
        .args(["jit", "build", &hex])
        .output()
        .expect("failed to run jit build");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().ends_with("345f355af13d5f5f3e3d5ff3"));
}

#[test]
fn forwarder_rle_splices_the_given_address() {
    let output = Command::new(bin())
        .args([
            "forwarder",
            "rle",
            "0x1111111111111111111111111111111111111111",
        ])
        .output()
        .expect("failed to run forwarder rle");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1111111111111111111111111111111111111111"));
}

#[test]
fn select_prints_json_with_to_data_override_and_meta() {
    let hex = format!("0x{}", "00".repeat(1000));
    let output = Command::new(bin())
        .args([
            "select",
            "--target",
            "0x000000000000000000000000000000000000dEaD",
            &hex,
        ])
        .output()
        .expect("failed to run select");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert!(parsed.get("to").is_some());
    assert!(parsed.get("data").is_some());
    assert!(parsed.get("override").is_some());
    assert!(parsed.get("meta").is_some());
}

#[test]
fn invalid_address_exits_non_zero() {
    let output = Command::new(bin())
        .args(["forwarder", "rle", "not-an-address"])
        .output()
        .expect("failed to run forwarder rle with a bad address");
    assert!(!output.status.success());
}
