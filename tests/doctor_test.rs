// SPDX-License-Identifier: MIT
//! Integration tests for geoverify::doctor::run_doctor.

use geoverify::config::VerifyConfig;
use geoverify::doctor::run_doctor;
use std::net::TcpListener;
use tempfile::TempDir;

/// Build a config whose three targets all point at `url`, with screenshot
/// output under a temp dir.
fn test_config(url: &str, dir: &TempDir) -> VerifyConfig {
    VerifyConfig {
        refactor_url: url.to_string(),
        pwa_url: url.to_string(),
        frontend_url: url.to_string(),
        refactor_screenshot: dir.path().join("shots/refactor.png"),
        pwa_screenshot: dir.path().join("mobile.png"),
        frontend_screenshot: dir.path().join("mobile_fixed.png"),
        ..VerifyConfig::default()
    }
}

#[test]
fn target_check_passes_against_bound_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&format!("http://127.0.0.1:{port}/"), &dir);

    let results = run_doctor(&cfg);
    let target = results
        .iter()
        .find(|r| r.name.starts_with("refactor target"))
        .expect("refactor target check missing");
    assert!(target.passed, "expected pass, got: {}", target.detail);
}

#[test]
fn target_check_fails_against_closed_port() {
    // Bind then drop to get a port that is very likely closed.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&format!("http://127.0.0.1:{port}/"), &dir);

    let results = run_doctor(&cfg);
    let target = results
        .iter()
        .find(|r| r.name.starts_with("pwa target"))
        .expect("pwa target check missing");
    assert!(!target.passed, "expected fail, got: {}", target.detail);
}

#[test]
fn output_dir_check_creates_and_probes() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&format!("http://127.0.0.1:{port}/"), &dir);

    let results = run_doctor(&cfg);
    let writable = results
        .iter()
        .find(|r| r.name == "Output directory writable")
        .expect("output dir check missing");
    assert!(writable.passed, "got: {}", writable.detail);
    // The parent dir of the refactor screenshot was created by the probe.
    assert!(dir.path().join("shots").is_dir());
    // The probe file was cleaned up.
    assert!(!dir.path().join("shots/.doctor_write_test").exists());
}
