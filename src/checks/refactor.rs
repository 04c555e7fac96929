// SPDX-License-Identifier: MIT
//! Desktop refactor smoke-check: the app shell renders its three landmark
//! elements after the component refactor.

use crate::browser::{BrowserError, BrowserSession};
use crate::config::VerifyConfig;
use crate::report::Reporter;

const TASK_INPUT_SELECTOR: &str = r#"input[placeholder="Ej: Comprar leche en Walmart..."]"#;

pub(super) async fn run(
    session: &BrowserSession,
    cfg: &VerifyConfig,
    reporter: &mut Reporter,
) -> Result<(), BrowserError> {
    reporter.info(format!("Navigating to {}", cfg.refactor_url));
    session.navigate(&cfg.refactor_url).await?;

    reporter.info("Waiting for 'GeoTasker' header...");
    session.wait_for_text("GeoTasker").await?;

    reporter.info("Waiting for input placeholder...");
    session.wait_for_selector(TASK_INPUT_SELECTOR).await?;

    reporter.info("Waiting for 'Mapa' button...");
    session.wait_for_text("Mapa").await?;

    reporter.info("Taking screenshot...");
    session.screenshot(&cfg.refactor_screenshot).await?;
    reporter.info(format!(
        "Screenshot saved to {}",
        cfg.refactor_screenshot.display()
    ));

    Ok(())
}
