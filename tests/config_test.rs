// SPDX-License-Identifier: MIT
//! Integration tests for config file loading.

use geoverify::config::VerifyConfig;
use tempfile::TempDir;

#[test]
fn explicit_config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("geoverify.toml");
    std::fs::write(
        &path,
        r#"
refactor_url = "http://localhost:9000/"
refactor_screenshot = "out/refactor.png"
nav_timeout_secs = 5
"#,
    )
    .unwrap();

    let cfg = VerifyConfig::load(Some(&path));
    assert_eq!(cfg.refactor_url, "http://localhost:9000/");
    assert_eq!(
        cfg.refactor_screenshot,
        std::path::PathBuf::from("out/refactor.png")
    );
    assert_eq!(cfg.nav_timeout_secs, 5);
    // Fields the file doesn't name keep their defaults.
    assert_eq!(cfg.pwa_url, "http://localhost:4173/");
    assert_eq!(cfg.wait_timeout_secs, 10);
}

#[test]
fn absent_config_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = VerifyConfig::load(Some(&dir.path().join("nope.toml")));
    assert_eq!(cfg.frontend_url, "http://localhost:4174/");
    assert_eq!(
        cfg.frontend_screenshot,
        std::path::PathBuf::from("verification_mobile_fixed.png")
    );
}
