#![forbid(unsafe_code)]

//! Panel configuration.
//!
//! The only option a page can set is `fontSize`, read from the page URL's
//! query string (`?fontSize=18`). Everything else uses fixed defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{DEFAULT_HANDLE_WIDTH_PX, DEFAULT_SCREEN_PADDING_PX};
use crate::style::WIDGET_FONT_SCALE;
use crate::widget::DEFAULT_POLL_INTERVAL_MS;

/// Query parameter controlling the base font size.
pub const QUERY_FONT_SIZE: &str = "fontSize";

/// Base font size when the page does not set one.
pub const DEFAULT_FONT_SIZE_PX: f64 = 14.0;

/// Runtime configuration of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    /// Label text size; widget text is scaled to 80% of it.
    pub font_size_px: f64,
    /// Gap kept between the panel and every viewport edge.
    pub screen_padding_px: f64,
    /// Thickness of the resize handles.
    pub handle_width_px: f64,
    /// Poll period used by widgets that do not set their own.
    pub default_poll_interval_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE_PX,
            screen_padding_px: DEFAULT_SCREEN_PADDING_PX,
            handle_width_px: DEFAULT_HANDLE_WIDTH_PX,
            default_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PanelConfig {
    /// Build from a query parameter lookup, rejecting bad values.
    ///
    /// A missing or empty `fontSize` keeps the default.
    pub fn try_from_query_with<F>(get_param: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = get_param(QUERY_FONT_SIZE).filter(|raw| !raw.trim().is_empty()) {
            config.font_size_px = parse_font_size(&raw)?;
        }
        Ok(config)
    }

    /// Build from a query parameter lookup; invalid values are logged and
    /// replaced by their defaults.
    #[must_use]
    pub fn from_query_with<F>(get_param: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::try_from_query_with(get_param).unwrap_or_else(|err| {
            tracing::warn!(target: "dbgui::panel", error = %err, "ignoring query configuration");
            Self::default()
        })
    }

    /// Build from a raw query string (`"?fontSize=18&x=1"` or without `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::from_query_with(|name| query_param(query, name))
    }

    /// Strict variant of [`Self::from_query`].
    pub fn try_from_query(query: &str) -> Result<Self, ConfigError> {
        Self::try_from_query_with(|name| query_param(query, name))
    }

    /// Font size used inside widget rows.
    #[must_use]
    pub fn widget_font_size_px(&self) -> f64 {
        self.font_size_px * WIDGET_FONT_SCALE
    }
}

fn parse_font_size(raw: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidFontSize {
        raw: raw.to_string(),
    };
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// First value of `name` in a URL query string, decoded like
/// `URLSearchParams`: `+` is a space, percent escapes are collected as
/// UTF-8 bytes, and invalid sequences become U+FFFD.
///
/// Used off the browser; the wasm binding asks `URLSearchParams` directly.
#[must_use]
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == name).then(|| decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel_constants() {
        let config = PanelConfig::default();
        assert_eq!(config.font_size_px, 14.0);
        assert_eq!(config.screen_padding_px, 10.0);
        assert_eq!(config.handle_width_px, 6.0);
        assert_eq!(config.default_poll_interval_ms, 100);
        assert!((config.widget_font_size_px() - 11.2).abs() < 1e-9);
    }

    #[test]
    fn font_size_is_read_from_query() {
        let config = PanelConfig::from_query("?debug=1&fontSize=18");
        assert_eq!(config.font_size_px, 18.0);
        let config = PanelConfig::from_query("fontSize=12.5px");
        assert_eq!(config.font_size_px, 12.5);
    }

    #[test]
    fn missing_or_empty_font_size_keeps_default() {
        assert_eq!(PanelConfig::try_from_query(""), Ok(PanelConfig::default()));
        assert_eq!(
            PanelConfig::try_from_query("?fontSize="),
            Ok(PanelConfig::default())
        );
    }

    #[test]
    fn invalid_font_size_is_rejected() {
        for raw in ["big", "-3", "0", "NaN", "inf"] {
            let err = PanelConfig::try_from_query(&format!("fontSize={raw}")).unwrap_err();
            assert_eq!(err, ConfigError::InvalidFontSize { raw: raw.to_string() });
        }
        assert_eq!(
            PanelConfig::from_query("fontSize=big").font_size_px,
            DEFAULT_FONT_SIZE_PX
        );
    }

    #[test]
    fn query_components_are_decoded() {
        assert_eq!(query_param("a=1%202&b=x+y", "a").as_deref(), Some("1 2"));
        assert_eq!(query_param("a=1%202&b=x+y", "b").as_deref(), Some("x y"));
        assert_eq!(query_param("flag&a=1", "flag").as_deref(), Some(""));
        assert_eq!(query_param("a=%zz", "a").as_deref(), Some("%zz"));
        assert_eq!(query_param("a=1", "missing"), None);
    }

    #[test]
    fn multibyte_escapes_decode_as_utf8() {
        assert_eq!(query_param("c=%E2%82%AC", "c").as_deref(), Some("\u{20ac}"));
        assert_eq!(query_param("%C3%A9t%C3%A9=1", "\u{e9}t\u{e9}").as_deref(), Some("1"));
        assert_eq!(query_param("c=%FF", "c").as_deref(), Some("\u{fffd}"));
        assert_eq!(query_param("c=%4", "c").as_deref(), Some("%4"));
        assert_eq!(
            PanelConfig::try_from_query("fontSize=%31%36"),
            Ok(PanelConfig {
                font_size_px: 16.0,
                ..PanelConfig::default()
            })
        );
    }
}
