use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn pail_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pail"))
}

/// Bucket root with one tracked manifest (empty hash), one untracked
/// manifest, and a README carrying the package-list markers.
fn write_fixture(root: &Path) {
    let bucket = root.join("bucket");
    fs::create_dir_all(&bucket).expect("create bucket");
    fs::write(
        bucket.join("ripgrep.json"),
        r#"{"version": "14.1.0", "url": "https://example.invalid/rg.zip", "hash": ""}"#,
    )
    .expect("write tracked manifest");
    fs::write(
        bucket.join("extra.json"),
        r#"{"version": "1.0.0", "url": "https://example.invalid/extra.zip", "hash": "abc"}"#,
    )
    .expect("write untracked manifest");
    fs::write(
        root.join("apps_config.json"),
        r#"[{"manifest_file": "ripgrep.json", "repo": "BurntSushi/ripgrep", "asset_keywords": ["x86_64", "windows"]}]"#,
    )
    .expect("write config");
    fs::write(
        root.join("README.md"),
        "# my bucket\n\n{APP_LIST_START_PLACEHOLDER}\n- `stale-entry`\n{APP_LIST_END_PLACEHOLDER}\n",
    )
    .expect("write readme");
}

#[test]
fn status_json_schema_and_values() {
    let root = TempDir::new().expect("root");
    write_fixture(root.path());

    let assert = pail_cmd()
        .args(["status", "--json", "--root"])
        .arg(root.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse status json");

    let top_keys: BTreeSet<String> = payload
        .as_object()
        .expect("status root object")
        .keys()
        .cloned()
        .collect();
    let expected_top: BTreeSet<String> = ["summary", "packages"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(top_keys, expected_top, "status root schema changed");

    assert_eq!(payload["summary"]["manifests"], 2);
    assert_eq!(payload["summary"]["tracked"], 1);
    assert_eq!(payload["summary"]["empty_hashes"], 1);
    assert_eq!(payload["summary"]["missing_manifests"], 0);

    let rows = payload["packages"].as_array().expect("packages array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["app"], "extra");
    assert_eq!(rows[0]["repo"], serde_json::Value::Null);
    assert_eq!(rows[0]["hash"], "ok");
    assert_eq!(rows[1]["app"], "ripgrep");
    assert_eq!(rows[1]["repo"], "BurntSushi/ripgrep");
    assert_eq!(rows[1]["version"], "14.1.0");
    assert_eq!(rows[1]["layout"], "root");
    assert_eq!(rows[1]["hash"], "empty");
}

#[test]
fn status_reports_missing_manifest_for_tracked_entry() {
    let root = TempDir::new().expect("root");
    write_fixture(root.path());
    fs::remove_file(root.path().join("bucket/ripgrep.json")).expect("remove manifest");

    let assert = pail_cmd()
        .args(["status", "--json", "--root"])
        .arg(root.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse status json");

    assert_eq!(payload["summary"]["missing_manifests"], 1);
    let rows = payload["packages"].as_array().expect("packages array");
    let ripgrep = rows
        .iter()
        .find(|r| r["app"] == "ripgrep")
        .expect("tracked row present");
    assert_eq!(ripgrep["hash"], "missing");
    assert_eq!(ripgrep["version"], serde_json::Value::Null);
}

#[test]
fn readme_command_rewrites_package_list() {
    let root = TempDir::new().expect("root");
    write_fixture(root.path());

    pail_cmd()
        .args(["readme", "--root"])
        .arg(root.path())
        .assert()
        .success();

    let readme = fs::read_to_string(root.path().join("README.md")).expect("read readme");
    assert!(readme.contains("- `extra`"));
    assert!(readme.contains("- `ripgrep`"));
    assert!(!readme.contains("stale-entry"));

    // Re-running against an already current README writes nothing new.
    pail_cmd()
        .args(["readme", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("already up to date"));
    let rerun = fs::read_to_string(root.path().join("README.md")).expect("read readme");
    assert_eq!(readme, rerun);
}

#[test]
fn readme_dry_run_leaves_file_alone() {
    let root = TempDir::new().expect("root");
    write_fixture(root.path());
    let before = fs::read_to_string(root.path().join("README.md")).expect("read readme");

    pail_cmd()
        .args(["readme", "--dry-run", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("would update"));

    let after = fs::read_to_string(root.path().join("README.md")).expect("read readme");
    assert_eq!(before, after);
}

#[test]
fn sync_without_config_fails_with_context() {
    let root = TempDir::new().expect("root");
    fs::create_dir_all(root.path().join("bucket")).expect("create bucket");

    pail_cmd()
        .args(["sync", "--root"])
        .arg(root.path())
        .assert()
        .failure()
        .stderr(contains("sync failed"))
        .stderr(contains("apps_config.json"));
}

#[test]
fn sync_survives_per_package_failure_and_reports_it() {
    // Stub answers every request with a 500; the package fails but the
    // process still exits cleanly with a summary.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    std::thread::spawn(move || {
        while let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom",
            );
        }
    });

    let root = TempDir::new().expect("root");
    write_fixture(root.path());

    pail_cmd()
        .args(["sync", "--dry-run", "--api-base", &base, "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("ripgrep failed"))
        .stdout(contains("1 failed"));
}

#[test]
fn sync_json_summary_is_machine_readable() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    std::thread::spawn(move || {
        while let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let body = br#"[{"tag_name": "v15.0.0", "prerelease": false, "assets": [{"name": "rg-x86_64-windows.zip", "browser_download_url": "https://example.invalid/rg.zip"}]}]"#;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    });

    let root = TempDir::new().expect("root");
    write_fixture(root.path());

    let assert = pail_cmd()
        .args(["sync", "--dry-run", "--json", "--api-base", &base, "--root"])
        .arg(root.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse summary json");

    let reports = payload["reports"].as_array().expect("reports array");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["name"], "ripgrep");
    assert_eq!(reports[0]["outcome"], "would_update");
    assert_eq!(reports[0]["version"], "15.0.0");
    assert_eq!(payload["readme"]["status"], "would_update");
}
