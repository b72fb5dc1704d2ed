#![forbid(unsafe_code)]

//! Panel rectangle and the per-edge resize algorithm.
//!
//! All values are CSS pixels. The rectangle lives inside the viewport minus a
//! fixed screen padding on every side; its size is bounded by
//! `[min, max]` per axis. Every mutation re-establishes both bounds, clamping
//! the size first and the position second.
//!
//! Each axis has a *near* edge (top / left) and a *far* edge (bottom /
//! right). Dragging an edge away from the box centre grows the box until it
//! reaches its maximum size, after which the whole box translates toward the
//! boundary. Dragging toward the centre shrinks the box until it reaches its
//! minimum size, after which the box translates in the drag direction. A
//! single drag step never carries leftover growth into translation; the
//! switch happens on the next step.

use serde::{Deserialize, Serialize};

/// Gap kept between the panel and every viewport edge.
pub const DEFAULT_SCREEN_PADDING_PX: f64 = 10.0;

/// Thickness of the eight resize handles.
pub const DEFAULT_HANDLE_WIDTH_PX: f64 = 6.0;

/// Size of the browser viewport (`innerWidth` x `innerHeight`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Panel position, size and size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl PanelRect {
    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle satisfies its size bounds and stays inside the
    /// padded viewport.
    #[must_use]
    pub fn is_within(&self, viewport: Viewport, padding: f64) -> bool {
        const EPS: f64 = 1e-9;
        self.width >= self.min_width - EPS
            && self.width <= self.max_width + EPS
            && self.height >= self.min_height - EPS
            && self.height <= self.max_height + EPS
            && self.x >= padding - EPS
            && self.y >= padding - EPS
            && self.right() <= viewport.width - padding + EPS
            && self.bottom() <= viewport.height - padding + EPS
    }

    fn span(&self, axis: Axis) -> AxisSpan {
        match axis {
            Axis::Vertical => AxisSpan {
                pos: self.y,
                size: self.height,
                min: self.min_height,
                max: self.max_height,
            },
            Axis::Horizontal => AxisSpan {
                pos: self.x,
                size: self.width,
                min: self.min_width,
                max: self.max_width,
            },
        }
    }

    fn set_span(&mut self, axis: Axis, span: AxisSpan) {
        match axis {
            Axis::Vertical => {
                self.y = span.pos;
                self.height = span.size;
            }
            Axis::Horizontal => {
                self.x = span.pos;
                self.width = span.size;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Which edge of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisEdge {
    /// Top or left edge.
    Near,
    /// Bottom or right edge.
    Far,
}

/// One of the eight compass-direction resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    /// All handles, clockwise from north.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Compass abbreviation, also used as CSS grid area and cursor prefix.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
        }
    }

    /// Parse a compass abbreviation (`"n"`, `"se"`, ...).
    #[must_use]
    pub fn from_css_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|handle| handle.css_name() == name)
    }

    /// Edge of the vertical axis this handle drags, if any.
    #[must_use]
    pub const fn vertical_edge(self) -> Option<AxisEdge> {
        match self {
            Self::North | Self::NorthEast | Self::NorthWest => Some(AxisEdge::Near),
            Self::South | Self::SouthEast | Self::SouthWest => Some(AxisEdge::Far),
            Self::East | Self::West => None,
        }
    }

    /// Edge of the horizontal axis this handle drags, if any.
    #[must_use]
    pub const fn horizontal_edge(self) -> Option<AxisEdge> {
        match self {
            Self::West | Self::NorthWest | Self::SouthWest => Some(AxisEdge::Near),
            Self::East | Self::NorthEast | Self::SouthEast => Some(AxisEdge::Far),
            Self::North | Self::South => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisSpan {
    pos: f64,
    size: f64,
    min: f64,
    max: f64,
}

impl AxisSpan {
    /// Drag the far edge (bottom / right) by `delta`; positive grows.
    fn drag_far(&mut self, delta: f64, lo: f64, hi: f64) {
        if delta > 0.0 {
            if self.size < self.max {
                self.size = (self.size + delta).min(self.max).min(hi - self.pos);
            } else {
                self.pos = (self.pos + delta).min(hi - self.size);
            }
        } else if delta < 0.0 {
            if self.size > self.min {
                self.size = (self.size + delta).max(self.min);
            } else {
                self.pos = (self.pos + delta).max(lo);
            }
        }
    }

    /// Drag the near edge (top / left) by `delta`; negative grows.
    fn drag_near(&mut self, delta: f64, lo: f64, hi: f64) {
        let far = self.pos + self.size;
        if delta < 0.0 {
            if self.size < self.max {
                let size = (self.size - delta).min(self.max).min(far - lo);
                self.pos = far - size;
                self.size = size;
            } else {
                self.pos = (self.pos + delta).max(lo);
            }
        } else if delta > 0.0 {
            if self.size > self.min {
                let size = (self.size - delta).max(self.min);
                self.pos = far - size;
                self.size = size;
            } else {
                self.pos = (self.pos + delta).min(hi - self.size);
            }
        }
    }

    /// Size bound first, then position bound.
    fn enforce(&mut self, lo: f64, hi: f64) {
        let available = (hi - lo).max(0.0);
        self.size = self.size.min(available).max(self.min).min(self.max.max(self.min));
        self.pos = self.pos.min(hi - self.size).max(lo);
    }
}

/// Owns the panel rectangle and applies drag deltas to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    rect: PanelRect,
    padding: f64,
}

impl PanelGeometry {
    /// Wrap an explicit rectangle. Inverted bounds are normalised so that
    /// `max >= min` on both axes.
    #[must_use]
    pub fn new(mut rect: PanelRect, padding: f64) -> Self {
        rect.max_width = rect.max_width.max(rect.min_width);
        rect.max_height = rect.max_height.max(rect.min_height);
        Self { rect, padding }
    }

    /// Default placement for a fresh panel: top-left corner, two fifths of
    /// the usable width and three fifths of the usable height.
    #[must_use]
    pub fn initial(viewport: Viewport, padding: f64) -> Self {
        let usable_width = (viewport.width - 2.0 * padding).max(0.0);
        let usable_height = (viewport.height - 2.0 * padding).max(0.0);
        let usable_min = usable_width.min(usable_height);
        Self::new(
            PanelRect {
                x: padding,
                y: padding,
                width: usable_width * 2.0 / 5.0,
                height: usable_height * 3.0 / 5.0,
                min_width: usable_min / 6.0,
                min_height: usable_min / 6.0,
                max_width: usable_width * 5.0 / 6.0,
                max_height: usable_height * 5.0 / 6.0,
            },
            padding,
        )
    }

    #[must_use]
    pub const fn rect(&self) -> PanelRect {
        self.rect
    }

    #[must_use]
    pub const fn padding(&self) -> f64 {
        self.padding
    }

    /// Apply one pointer movement for `handle`.
    ///
    /// The vertical component is applied before the horizontal one. Returns
    /// `true` if the rectangle changed.
    pub fn resize(&mut self, handle: ResizeHandle, dx: f64, dy: f64, viewport: Viewport) -> bool {
        let before = self.rect;
        if let Some(edge) = handle.vertical_edge() {
            self.drag_edge(Axis::Vertical, edge, dy, viewport);
        }
        if let Some(edge) = handle.horizontal_edge() {
            self.drag_edge(Axis::Horizontal, edge, dx, viewport);
        }
        let changed = before != self.rect;
        if changed {
            tracing::trace!(
                target: "dbgui::geometry",
                handle = handle.css_name(),
                dx,
                dy,
                x = self.rect.x,
                y = self.rect.y,
                width = self.rect.width,
                height = self.rect.height,
                "panel resized"
            );
        }
        changed
    }

    /// Drag the top edge; positive `delta` moves it down.
    pub fn resize_north(&mut self, delta: f64, viewport: Viewport) {
        self.drag_edge(Axis::Vertical, AxisEdge::Near, delta, viewport);
    }

    /// Drag the bottom edge; positive `delta` moves it down.
    pub fn resize_south(&mut self, delta: f64, viewport: Viewport) {
        self.drag_edge(Axis::Vertical, AxisEdge::Far, delta, viewport);
    }

    /// Drag the right edge; positive `delta` moves it right.
    pub fn resize_east(&mut self, delta: f64, viewport: Viewport) {
        self.drag_edge(Axis::Horizontal, AxisEdge::Far, delta, viewport);
    }

    /// Drag the left edge; positive `delta` moves it right.
    pub fn resize_west(&mut self, delta: f64, viewport: Viewport) {
        self.drag_edge(Axis::Horizontal, AxisEdge::Near, delta, viewport);
    }

    /// Re-clamp after the viewport changed size.
    ///
    /// The size shrinks (never below its minimum) when the padded viewport
    /// got smaller than the panel, then the position is pulled back inside.
    /// Returns `true` if the rectangle changed.
    pub fn fit_viewport(&mut self, viewport: Viewport) -> bool {
        let before = self.rect;
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let (lo, hi) = self.bounds(axis, viewport);
            let mut span = self.rect.span(axis);
            span.enforce(lo, hi);
            self.rect.set_span(axis, span);
        }
        before != self.rect
    }

    fn bounds(&self, axis: Axis, viewport: Viewport) -> (f64, f64) {
        let extent = match axis {
            Axis::Vertical => viewport.height,
            Axis::Horizontal => viewport.width,
        };
        (self.padding, extent - self.padding)
    }

    fn drag_edge(&mut self, axis: Axis, edge: AxisEdge, delta: f64, viewport: Viewport) {
        if !delta.is_finite() {
            return;
        }
        let (lo, hi) = self.bounds(axis, viewport);
        let mut span = self.rect.span(axis);
        match edge {
            AxisEdge::Near => span.drag_near(delta, lo, hi),
            AxisEdge::Far => span.drag_far(delta, lo, hi),
        }
        span.enforce(lo, hi);
        self.rect.set_span(axis, span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1000.0, 1000.0);

    fn square(x: f64, y: f64, size: f64) -> PanelGeometry {
        PanelGeometry::new(
            PanelRect {
                x,
                y,
                width: size,
                height: size,
                min_width: 50.0,
                min_height: 50.0,
                max_width: 500.0,
                max_height: 500.0,
            },
            DEFAULT_SCREEN_PADDING_PX,
        )
    }

    #[test]
    fn initial_layout_uses_viewport_fractions() {
        let geometry = PanelGeometry::initial(Viewport::new(1020.0, 620.0), 10.0);
        let rect = geometry.rect();
        assert_eq!(rect.x, 10.0);
        assert_eq!(rect.y, 10.0);
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 360.0);
        assert_eq!(rect.min_width, 100.0);
        assert_eq!(rect.min_height, 100.0);
        assert_eq!(rect.max_width, 1000.0 * 5.0 / 6.0);
        assert_eq!(rect.max_height, 500.0);
        assert!(rect.is_within(Viewport::new(1020.0, 620.0), 10.0));
    }

    #[test]
    fn south_grows_to_max_then_translates_to_bottom() {
        let mut g = square(10.0, 10.0, 200.0);

        g.resize_south(400.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (10.0, 500.0));

        g.resize_south(400.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (410.0, 500.0));

        g.resize_south(400.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (490.0, 500.0));
        assert_eq!(g.rect().bottom(), 990.0);

        let pinned = g.rect();
        g.resize_south(400.0, VIEW);
        assert_eq!(g.rect(), pinned);
    }

    #[test]
    fn south_growth_stops_at_bottom_boundary_below_max() {
        let mut g = square(10.0, 850.0, 100.0);
        g.resize_south(300.0, VIEW);
        assert_eq!(g.rect().height, 140.0);
        assert_eq!(g.rect().bottom(), 990.0);
        g.resize_south(300.0, VIEW);
        assert_eq!(g.rect().height, 140.0);
        assert_eq!(g.rect().y, 850.0);
    }

    #[test]
    fn south_shrinks_to_min_then_translates_up() {
        let mut g = square(10.0, 300.0, 200.0);
        g.resize_south(-1000.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (300.0, 50.0));
        g.resize_south(-100.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (200.0, 50.0));
        g.resize_south(-1000.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (10.0, 50.0));
    }

    #[test]
    fn north_grow_keeps_bottom_edge_fixed() {
        let mut g = square(10.0, 400.0, 200.0);
        g.resize_north(-100.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (300.0, 300.0));
        assert_eq!(g.rect().bottom(), 600.0);
    }

    #[test]
    fn north_grow_is_clamped_by_top_boundary() {
        let mut g = square(10.0, 60.0, 200.0);
        g.resize_north(-400.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (10.0, 250.0));
        g.resize_north(-50.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (10.0, 250.0));
    }

    #[test]
    fn north_grow_at_max_translates_up() {
        let mut g = square(10.0, 400.0, 500.0);
        g.resize_north(-100.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (300.0, 500.0));
        g.resize_north(-1000.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (10.0, 500.0));
    }

    #[test]
    fn north_shrink_then_translate_down() {
        let mut g = square(10.0, 100.0, 200.0);
        g.resize_north(500.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (250.0, 50.0));
        g.resize_north(100.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (350.0, 50.0));
        g.resize_north(5000.0, VIEW);
        assert_eq!((g.rect().y, g.rect().height), (940.0, 50.0));
    }

    #[test]
    fn east_and_west_mirror_south_and_north() {
        let mut g = square(400.0, 10.0, 200.0);
        g.resize_east(100.0, VIEW);
        assert_eq!((g.rect().x, g.rect().width), (400.0, 300.0));
        g.resize_west(-100.0, VIEW);
        assert_eq!((g.rect().x, g.rect().width), (300.0, 400.0));
        g.resize_west(1000.0, VIEW);
        assert_eq!((g.rect().x, g.rect().width), (650.0, 50.0));
        g.resize_east(-2000.0, VIEW);
        assert_eq!((g.rect().x, g.rect().width), (10.0, 50.0));
    }

    #[test]
    fn corner_applies_both_axes() {
        let mut g = square(100.0, 100.0, 200.0);
        assert!(g.resize(ResizeHandle::SouthEast, 50.0, 30.0, VIEW));
        let rect = g.rect();
        assert_eq!((rect.width, rect.height), (250.0, 230.0));
        assert_eq!((rect.x, rect.y), (100.0, 100.0));

        assert!(g.resize(ResizeHandle::NorthWest, -20.0, -40.0, VIEW));
        let rect = g.rect();
        assert_eq!((rect.x, rect.y), (80.0, 60.0));
        assert_eq!((rect.width, rect.height), (270.0, 270.0));
    }

    #[test]
    fn edge_handles_ignore_the_other_axis() {
        let mut g = square(100.0, 100.0, 200.0);
        g.resize(ResizeHandle::North, 999.0, 0.0, VIEW);
        assert_eq!(g.rect(), square(100.0, 100.0, 200.0).rect());
        assert!(!g.resize(ResizeHandle::East, 0.0, 50.0, VIEW));
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut g = square(100.0, 100.0, 200.0);
        assert!(!g.resize(ResizeHandle::SouthEast, f64::NAN, f64::INFINITY, VIEW));
    }

    #[test]
    fn fit_viewport_pulls_panel_back_inside() {
        let mut g = square(600.0, 600.0, 300.0);
        assert!(g.fit_viewport(Viewport::new(700.0, 500.0)));
        let rect = g.rect();
        assert!(rect.is_within(Viewport::new(700.0, 500.0), 10.0));
        assert_eq!((rect.x, rect.width), (390.0, 300.0));
        assert_eq!((rect.y, rect.height), (190.0, 300.0));
        assert!(!g.fit_viewport(Viewport::new(700.0, 500.0)));
    }

    #[test]
    fn fit_viewport_shrinks_but_never_below_min() {
        let mut g = square(10.0, 10.0, 300.0);
        g.fit_viewport(Viewport::new(120.0, 60.0));
        let rect = g.rect();
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 50.0);
        assert_eq!(rect.y, 10.0);
    }

    #[test]
    fn inverted_bounds_are_normalised() {
        let g = PanelGeometry::new(
            PanelRect {
                x: 10.0,
                y: 10.0,
                width: 80.0,
                height: 80.0,
                min_width: 100.0,
                min_height: 100.0,
                max_width: 50.0,
                max_height: 50.0,
            },
            10.0,
        );
        assert_eq!(g.rect().max_width, 100.0);
        assert_eq!(g.rect().max_height, 100.0);
    }

    #[test]
    fn handle_names_round_trip() {
        for handle in ResizeHandle::ALL {
            assert_eq!(ResizeHandle::from_css_name(handle.css_name()), Some(handle));
        }
        assert_eq!(ResizeHandle::from_css_name("x"), None);
    }

    #[test]
    fn corner_handles_drive_both_edges() {
        assert_eq!(ResizeHandle::NorthEast.vertical_edge(), Some(AxisEdge::Near));
        assert_eq!(ResizeHandle::NorthEast.horizontal_edge(), Some(AxisEdge::Far));
        assert_eq!(ResizeHandle::SouthWest.vertical_edge(), Some(AxisEdge::Far));
        assert_eq!(ResizeHandle::SouthWest.horizontal_edge(), Some(AxisEdge::Near));
    }
}
