// SPDX-License-Identifier: MIT
//! Pre-flight diagnostic checks for `geoverify doctor`.
//!
//! Self-contained: runs before any browser is launched, so it can catch a
//! missing Chromium or an unreachable dev server before they cause confusing
//! mid-scenario failures.

use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use crate::browser::detect_browser;
use crate::config::VerifyConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// The result of a single diagnostic check.
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Run all diagnostic checks and return a list of results.
pub fn run_doctor(cfg: &VerifyConfig) -> Vec<CheckResult> {
    vec![
        check_browser_binary(),
        check_target_reachable("refactor target", &cfg.refactor_url),
        check_target_reachable("pwa target", &cfg.pwa_url),
        check_target_reachable("frontend target", &cfg.frontend_url),
        check_output_writable(&cfg.refactor_screenshot),
    ]
}

// ─── Individual checks ────────────────────────────────────────────────────────

/// Check 1: a headless-capable browser binary is on PATH.
fn check_browser_binary() -> CheckResult {
    match detect_browser() {
        Some(path) => CheckResult {
            name: "Browser binary".to_string(),
            passed: true,
            detail: path.display().to_string(),
        },
        None => CheckResult {
            name: "Browser binary".to_string(),
            passed: false,
            detail: "no chromium/chrome binary found in PATH".to_string(),
        },
    }
}

/// Check 2-4: a target dev server accepts TCP connections.
fn check_target_reachable(label: &str, url: &str) -> CheckResult {
    let name = format!("{label} ({url})");
    let Some((host, port)) = host_port(url) else {
        return CheckResult {
            name,
            passed: false,
            detail: format!("cannot parse host/port from '{url}'"),
        };
    };
    let target = format!("{host}:{port}");
    match target.to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
                Ok(_) => CheckResult {
                    name,
                    passed: true,
                    detail: format!("{target} accepting connections"),
                },
                Err(e) => CheckResult {
                    name,
                    passed: false,
                    detail: format!("cannot connect to {target} (is the dev server running?): {e}"),
                },
            },
            None => CheckResult {
                name,
                passed: false,
                detail: format!("cannot resolve {target}"),
            },
        },
        Err(e) => CheckResult {
            name,
            passed: false,
            detail: format!("cannot resolve {target}: {e}"),
        },
    }
}

/// Check 5: the screenshot output directory is writable.
fn check_output_writable(screenshot: &Path) -> CheckResult {
    let dir = match screenshot.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        return CheckResult {
            name: "Output directory writable".to_string(),
            passed: false,
            detail: format!("cannot create output directory: {e}"),
        };
    }
    let test_path = dir.join(".doctor_write_test");
    match std::fs::write(&test_path, b"ok") {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_path);
            CheckResult {
                name: "Output directory writable".to_string(),
                passed: true,
                detail: format!("{} is writable", dir.display()),
            }
        }
        Err(e) => CheckResult {
            name: "Output directory writable".to_string(),
            passed: false,
            detail: format!("cannot write to {}: {e}", dir.display()),
        },
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Extract host and port from an http URL. Only enough parsing for the
/// fixed localhost targets this harness connects to.
fn host_port(url: &str) -> Option<(String, u16)> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))?;
    let default_port = if url.starts_with("https://") { 443 } else { 80 };
    let authority = rest.split('/').next()?;
    match authority.rsplit_once(':') {
        Some((host, port)) => Some((host.to_string(), port.parse().ok()?)),
        None => Some((authority.to_string(), default_port)),
    }
}

// ─── Output ───────────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print a formatted table of check results to stdout.
pub fn print_doctor_results(results: &[CheckResult]) {
    println!();
    println!("{BOLD}geoverify doctor — pre-flight checks{RESET}");
    println!("{}", "─".repeat(60));

    for r in results {
        let (symbol, color) = if r.passed { ("✓", GREEN) } else { ("✗", RED) };
        println!("  {color}{symbol}{RESET}  {:<38}  {}", r.name, r.detail);
    }

    println!("{}", "─".repeat(60));

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        println!("{GREEN}All checks passed.{RESET}");
    } else {
        println!("{RED}{failed} check(s) failed. See above for details.{RESET}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_port_with_explicit_port() {
        assert_eq!(
            host_port("http://localhost:4173/"),
            Some(("localhost".to_string(), 4173))
        );
    }

    #[test]
    fn host_port_default_http() {
        assert_eq!(
            host_port("http://localhost/"),
            Some(("localhost".to_string(), 80))
        );
    }

    #[test]
    fn host_port_rejects_non_http() {
        assert_eq!(host_port("ftp://localhost:21/"), None);
        assert_eq!(host_port("localhost:3000"), None);
    }

    #[test]
    fn host_port_ignores_path() {
        assert_eq!(
            host_port("http://localhost:3000/some/deep/path"),
            Some(("localhost".to_string(), 3000))
        );
    }
}
