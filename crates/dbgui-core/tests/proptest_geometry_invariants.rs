//! Property tests for the resize algorithm.
//!
//! For any sequence of handle drags the rectangle keeps its size bounds and
//! stays inside the padded viewport; re-fitting to a smaller viewport
//! restores the same invariant.

use dbgui_core::geometry::{PanelGeometry, ResizeHandle, Viewport};
use proptest::prelude::*;

const PADDING: f64 = 10.0;

fn viewport() -> impl Strategy<Value = Viewport> {
    (200.0..2400.0_f64, 200.0..1600.0_f64).prop_map(|(w, h)| Viewport::new(w, h))
}

fn drag() -> impl Strategy<Value = (ResizeHandle, f64, f64)> {
    (
        prop::sample::select(ResizeHandle::ALL.to_vec()),
        -600.0..600.0_f64,
        -600.0..600.0_f64,
    )
}

proptest! {
    #[test]
    fn drags_preserve_invariants(view in viewport(), drags in prop::collection::vec(drag(), 0..64)) {
        let mut geometry = PanelGeometry::initial(view, PADDING);
        prop_assert!(geometry.rect().is_within(view, PADDING));
        for (handle, dx, dy) in drags {
            geometry.resize(handle, dx, dy, view);
            let rect = geometry.rect();
            prop_assert!(rect.is_within(view, PADDING), "{handle:?} ({dx}, {dy}) -> {rect:?}");
        }
    }

    #[test]
    fn shrinking_never_goes_below_minimum(view in viewport(), steps in prop::collection::vec(1.0..400.0_f64, 1..16)) {
        let mut geometry = PanelGeometry::initial(view, PADDING);
        for step in steps {
            geometry.resize(ResizeHandle::NorthWest, step, step, view);
            geometry.resize(ResizeHandle::SouthEast, -step, -step, view);
            let rect = geometry.rect();
            prop_assert!(rect.width >= rect.min_width);
            prop_assert!(rect.height >= rect.min_height);
        }
    }

    #[test]
    fn fit_viewport_restores_invariants(
        view in viewport(),
        drags in prop::collection::vec(drag(), 0..16),
        shrink in (0.3..1.0_f64, 0.3..1.0_f64),
    ) {
        let mut geometry = PanelGeometry::initial(view, PADDING);
        for (handle, dx, dy) in drags {
            geometry.resize(handle, dx, dy, view);
        }
        let rect = geometry.rect();
        // Minimum sizes are one sixth of the initial usable area, so a
        // viewport at least 30% as large still fits them.
        let smaller = Viewport::new(
            (view.width * shrink.0).max(rect.min_width + 2.0 * PADDING),
            (view.height * shrink.1).max(rect.min_height + 2.0 * PADDING),
        );
        geometry.fit_viewport(smaller);
        prop_assert!(geometry.rect().is_within(smaller, PADDING), "{:?}", geometry.rect());
        prop_assert!(!geometry.fit_viewport(smaller));
    }
}
