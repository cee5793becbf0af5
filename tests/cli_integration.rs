mod common;

use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_retrolz").to_string()
}

#[test]
fn cli_decode_lzs_roundtrip() {
    let dir = tempdir().unwrap();
    let data = common::gen_data(3000, 7, 6);
    let input = dir.path().join("scene.lzs");
    let output = dir.path().join("scene.bin");
    std::fs::write(&input, common::lzs_encode(&data)).unwrap();

    let st = Command::new(bin())
        .args(["decode", "--codec", "lzs", "--size", "3000"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), data);
}

#[test]
fn cli_decode_cine_uses_footer_size() {
    let dir = tempdir().unwrap();
    let data = common::gen_data(900, 3, 3);
    let input = dir.path().join("part.cine");
    std::fs::write(&input, common::cine_encode(&data)).unwrap();

    let st = Command::new(bin())
        .args(["decode", "-c", "cine"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
    let default_out = dir.path().join("part.cine.out");
    assert_eq!(std::fs::read(default_out).unwrap(), data);
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.pbm");
    let output = dir.path().join("out.bin");
    std::fs::write(&input, [0xFD, b'x']).unwrap();
    std::fs::write(&output, b"keep").unwrap();

    let st = Command::new(bin())
        .args(["decode", "-c", "packbits"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"keep");

    let st = Command::new(bin())
        .args(["--force", "decode", "-c", "packbits"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"xxxx");
}

#[test]
fn cli_size_is_required_where_needed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.prince");
    std::fs::write(&input, [0u8; 4]).unwrap();

    let out = Command::new(bin())
        .args(["decode", "-c", "prince", "--check-only"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--size"));
}

#[test]
fn cli_keep_partial_writes_damaged_output() {
    let dir = tempdir().unwrap();
    let data = common::gen_data(500, 11, 4);
    let packed = common::lzs_encode(&data);
    let input = dir.path().join("cut.lzs");
    let output = dir.path().join("cut.bin");
    std::fs::write(&input, &packed[..packed.len() / 2]).unwrap();

    let st = Command::new(bin())
        .args(["decode", "-c", "lzs", "-s", "500"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    assert!(!output.exists());

    let st = Command::new(bin())
        .args(["decode", "-c", "lzs", "-s", "500", "--keep-partial"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    let partial = std::fs::read(&output).unwrap();
    assert_eq!(partial.len(), 500);
    assert_eq!(partial[..20], data[..20]);
}

#[test]
fn cli_json_stats_on_stderr() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.rle");
    std::fs::write(&input, [3, 1, 3, 2]).unwrap();

    let out = Command::new(bin())
        .args(["--json", "decode", "-c", "rle", "--size", "8", "--check-only"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("\"output_size\": 8"), "stderr: {stderr}");
    assert!(stderr.contains("\"truncated\": false"), "stderr: {stderr}");
}

#[test]
fn cli_codecs_lists_every_codec() {
    let out = Command::new(bin()).arg("codecs").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    for name in ["lzs", "cine", "hlz", "prince", "rle-reverse", "lobit", "slwm", "packbits", "pattern"] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn cli_inspect_prints_footer() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("part.cine");
    std::fs::write(&input, common::cine_encode(b"hello hello hello")).unwrap();

    let out = Command::new(bin()).arg("inspect").arg(&input).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("unpacked size: 17"), "stdout: {stdout}");

    let short = dir.path().join("short.cine");
    std::fs::write(&short, [0u8; 5]).unwrap();
    let out = Command::new(bin()).arg("inspect").arg(&short).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_rejects_unknown_codec() {
    let out = Command::new(bin())
        .args(["decode", "-c", "zip", "whatever"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}
