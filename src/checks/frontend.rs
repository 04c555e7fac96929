// SPDX-License-Identifier: MIT
//! Mobile safe-area verification: the header and bottom nav must carry the
//! safe-area inset padding classes, the body height is reported, and the
//! robots.txt is fetched from inside the page.
//!
//! Assertion mismatches print `FAILURE:` with the observed value and the run
//! continues to the next check — a wrong header class must not hide a wrong
//! nav class.

use crate::browser::{BrowserError, BrowserSession};
use crate::config::VerifyConfig;
use crate::devices::DeviceProfile;
use crate::report::Reporter;

// Tailwind class substrings checked on the class attribute, not compiled CSS
// output, so they survive the production build unless stripped.
const HEADER_SAFE_AREA_CLASS: &str = "pt-[calc(0.75rem_+_env(safe-area-inset-top))]";
const NAV_SAFE_AREA_CLASS: &str = "pb-[calc(0.75rem_+_env(safe-area-inset-bottom))]";

const ROBOTS_FETCH: &str = "fetch('/robots.txt').then(r => r.text())";
const ROBOTS_EXPECTED: &str = "Disallow: /";

pub(super) async fn run(
    session: &BrowserSession,
    cfg: &VerifyConfig,
    reporter: &mut Reporter,
) -> Result<(), BrowserError> {
    session.emulate(&DeviceProfile::iphone_12_pro()).await?;
    session.navigate(&cfg.frontend_url).await?;

    assert_class_contains(session, reporter, "header", "Header", HEADER_SAFE_AREA_CLASS).await?;
    assert_class_contains(session, reporter, "nav", "Nav", NAV_SAFE_AREA_CLASS).await?;

    let body_height = session
        .evaluate_string("window.getComputedStyle(document.body).height")
        .await?;
    reporter.info(format!("Body Height: {body_height}"));

    let robots = session.evaluate_string(ROBOTS_FETCH).await?;
    if robots.contains(ROBOTS_EXPECTED) {
        reporter.success("robots.txt content verified.");
    } else {
        reporter.failure(&format!("robots.txt content incorrect: {robots}"));
    }

    session.screenshot(&cfg.frontend_screenshot).await?;
    reporter.info("Screenshot saved.");

    Ok(())
}

/// Check that the element's class attribute contains the expected substring.
/// Mismatch is non-fatal; a missing element is an automation error.
async fn assert_class_contains(
    session: &BrowserSession,
    reporter: &mut Reporter,
    selector: &str,
    subject: &str,
    needle: &str,
) -> Result<(), BrowserError> {
    let observed = session.attribute(selector, "class").await?.unwrap_or_default();
    if observed.contains(needle) {
        reporter.success(&format!("{subject} has correct safe-area class."));
    } else {
        reporter.failure(&format!(
            "{subject} class is missing or incorrect. Found: {observed}"
        ));
    }
    Ok(())
}
