#![forbid(unsafe_code)]

//! Inline style strings for panel chrome and widgets.
//!
//! The panel never injects a stylesheet for its layout; every element carries
//! its own `style` attribute so host page rules cannot reach it.

use core::fmt::Write as _;

use crate::geometry::{PanelRect, ResizeHandle};

/// Monospace stack used by every panel element.
pub const FONT_FAMILY: &str = "\"IBM Plex Mono\", monospace";

/// Class shared by every widget row and category container.
pub const ROW_CLASS: &str = "__DBGUI_INJECTED_row";
/// Extra class on category containers.
pub const CATEGORY_CLASS: &str = "__DBGUI_INJECTED_category";
/// Class on category summaries.
pub const SUMMARY_CLASS: &str = "__DBGUI_INJECTED_summary";

/// Widget text size relative to the configured font size.
pub const WIDGET_FONT_SCALE: f64 = 0.8;

/// Ordered `property:value;` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Css {
    text: String,
}

impl Css {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, property: &str, value: impl AsRef<str>) -> Self {
        self.text.push_str(property);
        self.text.push(':');
        self.text.push_str(value.as_ref());
        self.text.push(';');
        self
    }

    /// Append a pixel value (`12.5px`).
    #[must_use]
    pub fn with_px(mut self, property: &str, px: f64) -> Self {
        let _ = write!(self.text, "{property}:{}px;", px_value(px));
        self
    }

    #[must_use]
    pub fn extend(mut self, other: &Css) -> Self {
        self.text.push_str(&other.text);
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for Css {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Format a pixel length without a trailing `.0`.
#[must_use]
pub fn px_value(px: f64) -> String {
    if px.fract() == 0.0 && px.abs() < 1e15 {
        format!("{}", px as i64)
    } else {
        format!("{px}")
    }
}

#[must_use]
pub fn button() -> Css {
    Css::new()
        .with("all", "unset")
        .with("padding", "2px")
        .with("background", "rgb(100 100 100)")
        .with("font-family", FONT_FAMILY)
}

/// Outer grid: contents in the centre cell, handles around it.
#[must_use]
pub fn container(rect: &PanelRect, handle_width_px: f64) -> Css {
    let h = px_value(handle_width_px);
    Css::new()
        .with("position", "fixed")
        .with("display", "grid")
        .with(
            "grid",
            format!("\"nw n ne\" {h}px \"w c e\" 1fr \"sw s se\" {h}px / {h}px 1fr {h}px"),
        )
        .with_px("left", rect.x)
        .with_px("top", rect.y)
        .with_px("width", rect.width)
        .with_px("max-width", rect.width)
        .with_px("height", rect.height)
        .with_px("max-height", rect.height)
        .with("user-select", "none")
        .with("z-index", "2147483647")
        .with("background", "rgb(230 230 230 / .7)")
}

#[must_use]
pub fn handle(handle: ResizeHandle) -> Css {
    Css::new()
        .with("grid-area", handle.css_name())
        .with("cursor", format!("{}-resize", handle.css_name()))
        .with("touch-action", "none")
        .with("background", "black")
}

#[must_use]
pub fn contents(font_size_px: f64) -> Css {
    Css::new()
        .with("grid-area", "c")
        .with("font-family", FONT_FAMILY)
        .with_px("font-size", font_size_px)
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("padding", "6px")
        .with("min-width", "0px")
        .with("max-width", "100%")
        .with("overflow", "hidden auto")
        .with("gap", "3px")
        .with("user-select", "auto")
}

#[must_use]
pub fn uncategorized() -> Css {
    Css::new()
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("width", "100%")
        .with("max-height", "40%")
        .with("overflow", "hidden auto")
        .with("gap", "3px")
}

#[must_use]
pub fn categories() -> Css {
    Css::new()
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("width", "100%")
        .with("flex", "1")
        .with("overflow", "hidden auto")
        .with("gap", "3px")
}

#[must_use]
pub fn category() -> Css {
    Css::new()
        .with("display", "flex")
        .with("flex-direction", "column")
}

#[must_use]
pub fn category_widgets() -> Css {
    Css::new().with("width", "100%")
}

#[must_use]
pub fn row() -> Css {
    Css::new()
        .with("width", "100%")
        .with("overflow-y", "hidden")
        .with("overflow-x", "auto")
        .with("display", "flex")
        .with("flex-direction", "row")
        .with("justify-content", "space-between")
        .with("align-items", "start")
        .with("flex-wrap", "nowrap")
        .with("flex", "none")
}

#[must_use]
pub fn row_label() -> Css {
    Css::new()
        .with("min-width", "0")
        .with("max-width", "50%")
        .with("overflow-wrap", "anywhere")
        .with("text-overflow", "ellipsis")
}

#[must_use]
pub fn row_widget(widget_font_size_px: f64) -> Css {
    Css::new()
        .with("flex", "1")
        .with("min-width", "0")
        .with("display", "flex")
        .with("justify-content", "end")
        .with_px("font-size", widget_font_size_px)
        .with("align-self", "center")
}

#[must_use]
pub fn value_display() -> Css {
    Css::new()
        .with("display", "flex")
        .with("flex-direction", "row")
        .with("align-items", "center")
        .with("gap", "3px")
        .with("white-space", "pre")
}

#[must_use]
pub fn text_field() -> Css {
    Css::new().with("min-width", "0").with("max-width", "80px")
}

#[must_use]
pub fn slider() -> Css {
    Css::new()
        .with("max-width", "80px")
        .with("min-width", "0")
        .with("width", "80px")
        .with("flex", "1")
}

#[must_use]
pub fn slider_row() -> Css {
    Css::new()
        .with("display", "flex")
        .with("min-width", "0")
        .with("align-items", "center")
}

#[must_use]
pub fn group(direction: &str) -> Css {
    Css::new()
        .with("display", "flex")
        .with("flex-direction", direction)
        .with("flex-wrap", "wrap")
        .with("justify-content", "flex-end")
        .with("align-items", "center")
        .with("gap", "5px")
        .with("min-width", "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_are_semicolon_terminated() {
        let css = Css::new().with("display", "flex").with_px("left", 10.0);
        assert_eq!(css.as_str(), "display:flex;left:10px;");
    }

    #[test]
    fn fractional_pixels_keep_their_fraction() {
        assert_eq!(px_value(12.5), "12.5");
        assert_eq!(px_value(-3.0), "-3");
        assert_eq!(px_value(11.200000000000001), "11.200000000000001");
    }

    #[test]
    fn container_grid_uses_handle_width() {
        let rect = PanelRect {
            x: 10.0,
            y: 10.0,
            width: 400.0,
            height: 300.0,
            min_width: 50.0,
            min_height: 50.0,
            max_width: 800.0,
            max_height: 600.0,
        };
        let css = container(&rect, 6.0);
        assert!(css.as_str().contains(
            "grid:\"nw n ne\" 6px \"w c e\" 1fr \"sw s se\" 6px / 6px 1fr 6px;"
        ));
        assert!(css.as_str().contains("max-height:300px;"));
    }

    #[test]
    fn handle_cursor_matches_direction() {
        let css = handle(ResizeHandle::SouthWest);
        assert!(css.as_str().contains("grid-area:sw;"));
        assert!(css.as_str().contains("cursor:sw-resize;"));
    }
}
