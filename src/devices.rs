// SPDX-License-Identifier: MIT
//! Device emulation presets.
//!
//! A profile bundles the viewport, scale factor, user-agent, and touch
//! capability of a physical device. Profiles are applied to a page via the
//! CDP `Emulation` domain (see `BrowserSession::emulate`).

/// Mobile Safari UA string matching the iPhone 12 Pro preset.
const IPHONE_12_PRO_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";

/// A named device emulation preset.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub name: String,
    pub user_agent: String,
    /// Viewport width in CSS pixels.
    pub width: u32,
    /// Viewport height in CSS pixels.
    pub height: u32,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub has_touch: bool,
}

impl DeviceProfile {
    /// iPhone 12 Pro: 390×844 @3x, mobile Safari UA, touch enabled.
    pub fn iphone_12_pro() -> Self {
        Self {
            name: "iPhone 12 Pro".to_string(),
            user_agent: IPHONE_12_PRO_UA.to_string(),
            width: 390,
            height: 844,
            device_scale_factor: 3.0,
            is_mobile: true,
            has_touch: true,
        }
    }
}
