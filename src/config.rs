// SPDX-License-Identifier: MIT
//! Harness configuration.
//!
//! Defaults match the original verification constants (dev-server ports and
//! screenshot paths). An optional `geoverify.toml` next to the working
//! directory overrides them, and `GEOVERIFY_*` environment variables override
//! the file. Precedence: defaults → TOML → env → CLI.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const CONFIG_FILE: &str = "geoverify.toml";

const DEFAULT_REFACTOR_URL: &str = "http://localhost:3000/";
const DEFAULT_PWA_URL: &str = "http://localhost:4173/";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:4174/";

const DEFAULT_REFACTOR_SCREENSHOT: &str = "verification/refactor_verification.png";
const DEFAULT_PWA_SCREENSHOT: &str = "verification_mobile.png";
const DEFAULT_FRONTEND_SCREENSHOT: &str = "verification_mobile_fixed.png";

const DEFAULT_NAV_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the verification scenarios.
///
/// Every field has a default matching the original hard-coded value, so an
/// absent or partial `geoverify.toml` is always valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Target for the desktop refactor check.
    pub refactor_url: String,
    /// Target for the PWA metadata inspection.
    pub pwa_url: String,
    /// Target for the mobile safe-area verification.
    pub frontend_url: String,

    /// Screenshot output path for the refactor check.
    pub refactor_screenshot: PathBuf,
    /// Screenshot output path for the PWA check.
    pub pwa_screenshot: PathBuf,
    /// Screenshot output path for the safe-area check.
    pub frontend_screenshot: PathBuf,

    /// Navigation timeout in seconds. Defaults to 30.
    pub nav_timeout_secs: u64,
    /// Element/text wait timeout in seconds. Defaults to 10.
    pub wait_timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            refactor_url: DEFAULT_REFACTOR_URL.to_string(),
            pwa_url: DEFAULT_PWA_URL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            refactor_screenshot: PathBuf::from(DEFAULT_REFACTOR_SCREENSHOT),
            pwa_screenshot: PathBuf::from(DEFAULT_PWA_SCREENSHOT),
            frontend_screenshot: PathBuf::from(DEFAULT_FRONTEND_SCREENSHOT),
            nav_timeout_secs: DEFAULT_NAV_TIMEOUT_SECS,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
        }
    }
}

impl VerifyConfig {
    /// Load configuration: file (if present) layered over defaults, then env.
    pub fn load(path: Option<&Path>) -> Self {
        let mut cfg = Self::from_file(path);
        cfg.apply_env();
        cfg
    }

    /// Parse `geoverify.toml` (or an explicit path). Missing file means
    /// defaults; a malformed file is reported and ignored rather than fatal.
    fn from_file(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(cfg) => {
                    info!(path = %path.display(), "loaded config file");
                    cfg
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file — using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Apply `GEOVERIFY_*` environment overrides on top of the file layer.
    fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Env layer over an explicit lookup; split out for testability.
    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("GEOVERIFY_REFACTOR_URL") {
            self.refactor_url = v;
        }
        if let Some(v) = get("GEOVERIFY_PWA_URL") {
            self.pwa_url = v;
        }
        if let Some(v) = get("GEOVERIFY_FRONTEND_URL") {
            self.frontend_url = v;
        }
        if let Some(v) = get("GEOVERIFY_REFACTOR_SCREENSHOT") {
            self.refactor_screenshot = PathBuf::from(v);
        }
        if let Some(v) = get("GEOVERIFY_PWA_SCREENSHOT") {
            self.pwa_screenshot = PathBuf::from(v);
        }
        if let Some(v) = get("GEOVERIFY_FRONTEND_SCREENSHOT") {
            self.frontend_screenshot = PathBuf::from(v);
        }
        if let Some(v) = get("GEOVERIFY_NAV_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.nav_timeout_secs = n,
                Err(_) => {
                    warn!(value = %v, "invalid GEOVERIFY_NAV_TIMEOUT_SECS — keeping previous value")
                }
            }
        }
        if let Some(v) = get("GEOVERIFY_WAIT_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.wait_timeout_secs = n,
                Err(_) => {
                    warn!(value = %v, "invalid GEOVERIFY_WAIT_TIMEOUT_SECS — keeping previous value")
                }
            }
        }
    }

    pub fn nav_timeout(&self) -> Duration {
        Duration::from_secs(self.nav_timeout_secs)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let cfg = VerifyConfig::default();
        assert_eq!(cfg.refactor_url, "http://localhost:3000/");
        assert_eq!(cfg.pwa_url, "http://localhost:4173/");
        assert_eq!(cfg.frontend_url, "http://localhost:4174/");
        assert_eq!(
            cfg.refactor_screenshot,
            PathBuf::from("verification/refactor_verification.png")
        );
        assert_eq!(cfg.pwa_screenshot, PathBuf::from("verification_mobile.png"));
        assert_eq!(
            cfg.frontend_screenshot,
            PathBuf::from("verification_mobile_fixed.png")
        );
        assert_eq!(cfg.nav_timeout_secs, 30);
        assert_eq!(cfg.wait_timeout_secs, 10);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: VerifyConfig = toml::from_str(
            r#"
            frontend_url = "http://localhost:5173/"
            wait_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.frontend_url, "http://localhost:5173/");
        assert_eq!(cfg.wait_timeout_secs, 3);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.refactor_url, "http://localhost:3000/");
        assert_eq!(cfg.nav_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("geoverify.toml");
        std::fs::write(&path, "this is not toml [[[").unwrap();
        let cfg = VerifyConfig::from_file(Some(&path));
        assert_eq!(cfg.refactor_url, "http://localhost:3000/");
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = VerifyConfig::from_file(Some(&dir.path().join("absent.toml")));
        assert_eq!(cfg.pwa_url, "http://localhost:4173/");
    }

    #[test]
    fn env_overrides_win_over_file_layer() {
        // File layer first, then the env layer on top.
        let mut cfg: VerifyConfig = toml::from_str(
            r#"
            pwa_url = "http://localhost:8000/"
            pwa_screenshot = "from_file.png"
            "#,
        )
        .unwrap();
        let env = std::collections::HashMap::from([
            ("GEOVERIFY_PWA_URL", "http://localhost:9999/"),
            ("GEOVERIFY_PWA_SCREENSHOT", "from_env.png"),
            ("GEOVERIFY_WAIT_TIMEOUT_SECS", "7"),
        ]);
        cfg.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.pwa_url, "http://localhost:9999/");
        assert_eq!(cfg.pwa_screenshot, PathBuf::from("from_env.png"));
        assert_eq!(cfg.wait_timeout_secs, 7);
        // Fields with no env var keep the file/default layer.
        assert_eq!(cfg.refactor_url, "http://localhost:3000/");
    }

    #[test]
    fn malformed_timeout_env_keeps_previous_value() {
        let mut cfg = VerifyConfig::default();
        let env = std::collections::HashMap::from([("GEOVERIFY_NAV_TIMEOUT_SECS", "abc")]);
        cfg.apply_env_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.nav_timeout_secs, 30);
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let cfg = VerifyConfig::default();
        assert_eq!(cfg.nav_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.wait_timeout(), Duration::from_secs(10));
    }
}
