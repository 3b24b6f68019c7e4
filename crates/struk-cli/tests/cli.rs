use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SLIP: &str = "\
BCA
TOKO MAKMUR JAYA
JL. SUDIRMAN NO 1
TERM# 12345678   MERC# 000885000123
DATE/TIME 01Jan,23 14:30
TOTAL   Rp 15.000,50
SIGNATURE NOT REQUIRED
";

fn struk(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("struk").unwrap();
    cmd.arg("--config").arg(config_dir.join("config.json"));
    cmd.env_remove("STRUK_OCRSPACE_API_KEY");
    cmd
}

fn config_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn parse_file_to_json() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);
    let input = dir.path().join("slip.txt");
    fs::write(&input, SLIP).unwrap();

    let output = struk(dir.path()).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["merchant_name"], "TOKO MAKMUR JAYA");
    assert_eq!(json["merchant_id"], "885000123");
    assert_eq!(json["transaction_date"], "2023-01-01");
    assert_eq!(json["transaction_time"], "14:30");
    assert_eq!(json["total_amount"], 15000.5);
    assert_eq!(json["currency"], "IDR");
    assert_eq!(json["transaction_status"], "COMPLETED");
    assert_eq!(json["notes"], "SIGNATURE NOT REQUIRED");
    assert_eq!(json["raw_text"], SLIP);
}

#[test]
fn parse_stdin_as_csv() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .args(["parse", "-", "--format", "csv"])
        .write_stdin(SLIP)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("merchant_name,merchant_address,"))
        .stdout(predicate::str::contains("TOKO MAKMUR JAYA"));
}

#[test]
fn parse_garbage_reports_warnings() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .args(["parse", "-", "--warnings"])
        .write_stdin("~~ %% ~~")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"raw_text\""))
        .stdout(predicate::str::contains("merchant_name").not())
        .stderr(predicate::str::contains("Could not extract merchant name"));
}

#[test]
fn parse_with_first_line_strategy() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .args(["parse", "-", "--strategy", "first-line"])
        .write_stdin("GRUPECA EDC\nWARUNG SEDERHANA\nTOTAL Rp 1.000")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"merchant_name\": \"WARUNG SEDERHANA\""));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    struk(dir.path())
        .args(["parse", "-"])
        .write_stdin(SLIP)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();

    struk(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    struk(dir.path())
        .args(["config", "get", "extraction.anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"BCA\""));

    struk(dir.path())
        .args(["config", "set", "extraction.anchor", "MANDIRI"])
        .assert()
        .success();

    struk(dir.path())
        .args(["config", "get", "extraction.anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MANDIRI\""));

    struk(dir.path())
        .args(["config", "set", "extraction.anchr", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    struk(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn configured_anchor_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"extraction": {"anchor": "MANDIRI"}}"#,
    )
    .unwrap();

    struk(dir.path())
        .args(["parse", "-"])
        .write_stdin("MANDIRI\nSATE KHAS SENAYAN\nTOTAL Rp 50.000")
        .assert()
        .success()
        .stdout(predicate::str::contains("SATE KHAS SENAYAN"));
}

#[test]
fn batch_text_files_with_summary() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);
    let inputs = dir.path().join("inputs");
    let out = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), SLIP).unwrap();
    fs::write(inputs.join("b.txt"), "VOID\nTOTAL Rp 100,00").unwrap();

    struk(dir.path())
        .arg("batch")
        .arg(inputs.join("*.txt").to_string_lossy().as_ref())
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success();

    let a: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("a.json")).unwrap()).unwrap();
    assert_eq!(a["merchant_name"], "TOKO MAKMUR JAYA");

    let b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("b.json")).unwrap()).unwrap();
    assert_eq!(b["total_amount"], -100.0);
    assert_eq!(b["transaction_status"], "VOID");

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,merchant_name"));
    assert!(summary.contains("a.txt,success,TOKO MAKMUR JAYA,2023-01-01,15000.50,IDR,COMPLETED"));
    assert!(summary.contains("b.txt,success,,,-100.00,IDR,VOID"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .arg("batch")
        .arg(dir.path().join("*.txt").to_string_lossy().as_ref())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn process_url_with_tesseract_is_rejected() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);

    struk(dir.path())
        .args([
            "process",
            "--url",
            "https://example.com/slip.jpg",
            "--engine",
            "tesseract",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read images from a URL"));
}

#[test]
fn process_ocr_space_without_key_fails() {
    let dir = TempDir::new().unwrap();
    config_file(&dir);
    let image = dir.path().join("slip.jpg");
    fs::write(&image, [0xFF, 0xD8, 0xFF]).unwrap();

    struk(dir.path())
        .arg("process")
        .arg(&image)
        .args(["--engine", "ocr-space"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing OCR.space API key"));
}
