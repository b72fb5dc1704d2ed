#![forbid(unsafe_code)]

//! Routing of browser pointer and window signals to the panel.
//!
//! The wasm layer reduces DOM events to [`PanelSignal`] values. Everything
//! after that point is host-agnostic and runs natively against
//! `MemoryHost` in tests.

use dbgui_core::{DomHost, Panel, PanelDragEffect, ResizeHandle, Result};

/// One input relevant to the panel chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelSignal {
    /// `pointerdown` on a resize handle.
    HandleDown {
        handle: ResizeHandle,
        pointer_id: i32,
    },
    /// `pointermove` anywhere in the window, carrying `movementX/Y`.
    Move { pointer_id: i32, dx: f64, dy: f64 },
    /// `pointerup` anywhere in the window.
    Up,
    /// `pointercancel`, e.g. the browser took over the gesture.
    Cancel,
    /// Window `resize`.
    ViewportResized,
}

/// What a dispatched signal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Drag(PanelDragEffect),
    Refit { changed: bool },
}

/// Apply `signal` to `panel`.
pub fn dispatch<H: DomHost>(panel: &mut Panel<H>, signal: PanelSignal) -> Result<SignalOutcome> {
    let outcome = match signal {
        PanelSignal::HandleDown { handle, pointer_id } => {
            SignalOutcome::Drag(panel.begin_resize(handle, pointer_id))
        }
        PanelSignal::Move { pointer_id, dx, dy } => {
            SignalOutcome::Drag(panel.pointer_move(pointer_id, finite_or_zero(dx), finite_or_zero(dy))?)
        }
        PanelSignal::Up | PanelSignal::Cancel => SignalOutcome::Drag(panel.end_resize()),
        PanelSignal::ViewportResized => SignalOutcome::Refit {
            changed: panel.fit_viewport()?,
        },
    };
    tracing::trace!(target: "dbgui_web", ?signal, ?outcome, "panel signal");
    Ok(outcome)
}

fn finite_or_zero(delta: f64) -> f64 {
    if delta.is_finite() { delta } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use dbgui_core::{MemoryHost, PanelConfig, PanelDragNoop, Viewport};
    use pretty_assertions::assert_eq;

    use super::*;

    const EPS: f64 = 1e-9;

    fn panel() -> (Rc<MemoryHost>, Panel<MemoryHost>) {
        let host = Rc::new(MemoryHost::default());
        let mut panel = Panel::new(Rc::clone(&host), PanelConfig::default()).expect("panel");
        panel.attach().expect("attach");
        (host, panel)
    }

    fn send(panel: &mut Panel<MemoryHost>, signal: PanelSignal) -> SignalOutcome {
        dispatch(panel, signal).expect("dispatch")
    }

    #[test]
    fn corner_gesture_resizes_both_axes() {
        let (host, mut panel) = panel();
        let before = panel.rect();

        let down = send(
            &mut panel,
            PanelSignal::HandleDown {
                handle: ResizeHandle::SouthEast,
                pointer_id: 1,
            },
        );
        assert_eq!(
            down,
            SignalOutcome::Drag(PanelDragEffect::Armed {
                handle: ResizeHandle::SouthEast
            })
        );

        let moved = send(
            &mut panel,
            PanelSignal::Move {
                pointer_id: 1,
                dx: 50.0,
                dy: 20.0,
            },
        );
        assert_eq!(
            moved,
            SignalOutcome::Drag(PanelDragEffect::Resized {
                handle: ResizeHandle::SouthEast
            })
        );
        let after = panel.rect();
        assert!((after.width - (before.width + 50.0)).abs() < EPS);
        assert!((after.height - (before.height + 20.0)).abs() < EPS);
        assert_eq!(after.x, before.x);
        assert_eq!(after.y, before.y);

        let width = host.style_property(*panel.container(), "width");
        assert_eq!(width.as_deref(), Some("451.6px"));
    }

    #[test]
    fn moves_from_other_pointers_are_ignored() {
        let (_host, mut panel) = panel();
        send(
            &mut panel,
            PanelSignal::HandleDown {
                handle: ResizeHandle::East,
                pointer_id: 3,
            },
        );
        let before = panel.rect();
        let outcome = send(
            &mut panel,
            PanelSignal::Move {
                pointer_id: 4,
                dx: 30.0,
                dy: 0.0,
            },
        );
        assert_eq!(
            outcome,
            SignalOutcome::Drag(PanelDragEffect::Noop(PanelDragNoop::PointerMismatch))
        );
        assert_eq!(panel.rect(), before);
    }

    #[test]
    fn release_and_cancel_end_the_gesture() {
        for release in [PanelSignal::Up, PanelSignal::Cancel] {
            let (_host, mut panel) = panel();
            send(
                &mut panel,
                PanelSignal::HandleDown {
                    handle: ResizeHandle::North,
                    pointer_id: 1,
                },
            );
            assert_eq!(
                send(&mut panel, release),
                SignalOutcome::Drag(PanelDragEffect::Released {
                    handle: ResizeHandle::North
                })
            );
            let before = panel.rect();
            let outcome = send(
                &mut panel,
                PanelSignal::Move {
                    pointer_id: 1,
                    dx: 0.0,
                    dy: -40.0,
                },
            );
            assert_eq!(
                outcome,
                SignalOutcome::Drag(PanelDragEffect::Noop(PanelDragNoop::IdleWithoutActiveDrag))
            );
            assert_eq!(panel.rect(), before);
        }
    }

    #[test]
    fn non_finite_movement_is_treated_as_still() {
        let (_host, mut panel) = panel();
        send(
            &mut panel,
            PanelSignal::HandleDown {
                handle: ResizeHandle::SouthEast,
                pointer_id: 1,
            },
        );
        let before = panel.rect();
        send(
            &mut panel,
            PanelSignal::Move {
                pointer_id: 1,
                dx: f64::NAN,
                dy: f64::INFINITY,
            },
        );
        assert_eq!(panel.rect(), before);
    }

    #[test]
    fn viewport_shrink_refits_the_panel() {
        let (host, mut panel) = panel();
        assert_eq!(
            send(&mut panel, PanelSignal::ViewportResized),
            SignalOutcome::Refit { changed: false }
        );

        host.set_viewport(Viewport::new(500.0, 400.0));
        assert_eq!(
            send(&mut panel, PanelSignal::ViewportResized),
            SignalOutcome::Refit { changed: true }
        );
        let rect = panel.rect();
        assert!(rect.bottom() <= 390.0 + EPS);
        assert!(rect.right() <= 490.0 + EPS);
        assert!(rect.y >= 10.0 - EPS);
    }
}
