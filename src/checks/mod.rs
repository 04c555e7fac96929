// SPDX-License-Identifier: MIT
//! Verification scenarios.
//!
//! Each scenario is a strictly linear sequence: launch → navigate → checks →
//! screenshot → release. There is no branching on assertion outcomes —
//! mismatches print `FAILURE:` and the run continues. Automation errors
//! (launch, navigation, wait timeouts) abort the sequence, but the browser is
//! closed before the error leaves the wrapper.

mod frontend;
mod pwa;
mod refactor;

use crate::browser::{BrowserError, BrowserSession};
use crate::config::VerifyConfig;
use crate::report::Reporter;
use tracing::info;

/// Desktop layout smoke-check against the dev server (default :3000).
pub async fn run_refactor(
    cfg: &VerifyConfig,
    reporter: &mut Reporter,
) -> Result<(), BrowserError> {
    info!(url = %cfg.refactor_url, "running refactor verification");
    let session = BrowserSession::launch(cfg.nav_timeout(), cfg.wait_timeout()).await?;
    let outcome = refactor::run(&session, cfg, reporter).await;
    session.close().await;
    outcome
}

/// PWA metadata inspection (default :4173) under iPhone 12 Pro emulation.
///
/// Launch failures propagate (non-zero exit); automation errors after launch
/// are caught here, printed as `Error: <message>`, and the run still exits 0.
pub async fn run_pwa(cfg: &VerifyConfig, reporter: &mut Reporter) -> Result<(), BrowserError> {
    info!(url = %cfg.pwa_url, "running pwa verification");
    let session = BrowserSession::launch(cfg.nav_timeout(), cfg.wait_timeout()).await?;
    let outcome = pwa::run(&session, cfg, reporter).await;
    session.close().await;
    if let Err(e) = outcome {
        reporter.info(format!("Error: {e}"));
    }
    Ok(())
}

/// Mobile safe-area verification (default :4174) under iPhone 12 Pro emulation.
/// Same caught-error policy as `run_pwa`.
pub async fn run_frontend(
    cfg: &VerifyConfig,
    reporter: &mut Reporter,
) -> Result<(), BrowserError> {
    info!(url = %cfg.frontend_url, "running frontend verification");
    let session = BrowserSession::launch(cfg.nav_timeout(), cfg.wait_timeout()).await?;
    let outcome = frontend::run(&session, cfg, reporter).await;
    session.close().await;
    if let Err(e) = outcome {
        reporter.info(format!("Error: {e}"));
    }
    Ok(())
}
