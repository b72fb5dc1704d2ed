#![forbid(unsafe_code)]

//! Pointer lifecycle for resize handles.
//!
//! ```text
//! Idle --pointer_down(handle)--> Resizing --pointer_up / cancel--> Idle
//!                                   |
//!                               pointer_move (applies deltas)
//! ```
//!
//! Only one pointer may drive a resize at a time. A pointer-up anywhere in
//! the document ends the gesture, regardless of which element it lands on.

use crate::geometry::{PanelGeometry, ResizeHandle, Viewport};

/// Current lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelDragState {
    #[default]
    Idle,
    Resizing {
        handle: ResizeHandle,
        pointer_id: i32,
    },
}

/// Why a pointer signal did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelDragNoop {
    /// Move or up received without an active gesture.
    IdleWithoutActiveDrag,
    /// Pointer-down while another pointer is already resizing.
    ActiveDragAlreadyInProgress,
    /// Move from a different pointer than the one that started the gesture.
    PointerMismatch,
    /// Movement left the rectangle untouched (already clamped).
    Clamped,
}

/// Outcome of one pointer signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelDragEffect {
    Armed { handle: ResizeHandle },
    Resized { handle: ResizeHandle },
    Released { handle: ResizeHandle },
    Noop(PanelDragNoop),
}

impl PanelDragEffect {
    /// Whether geometry changed and must be pushed to the rendered panel.
    #[must_use]
    pub const fn geometry_changed(self) -> bool {
        matches!(self, Self::Resized { .. })
    }
}

/// Resize gesture state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelDrag {
    state: PanelDragState,
}

impl PanelDrag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PanelDragState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PanelDragState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, PanelDragState::Idle)
    }

    /// Pointer pressed on `handle`.
    pub fn pointer_down(&mut self, handle: ResizeHandle, pointer_id: i32) -> PanelDragEffect {
        match self.state {
            PanelDragState::Idle => {
                self.state = PanelDragState::Resizing { handle, pointer_id };
                PanelDragEffect::Armed { handle }
            }
            PanelDragState::Resizing { .. } => {
                PanelDragEffect::Noop(PanelDragNoop::ActiveDragAlreadyInProgress)
            }
        }
    }

    /// Pointer moved by `(dx, dy)` anywhere in the document.
    pub fn pointer_move(
        &mut self,
        pointer_id: i32,
        dx: f64,
        dy: f64,
        geometry: &mut PanelGeometry,
        viewport: Viewport,
    ) -> PanelDragEffect {
        let PanelDragState::Resizing {
            handle,
            pointer_id: active,
        } = self.state
        else {
            return PanelDragEffect::Noop(PanelDragNoop::IdleWithoutActiveDrag);
        };
        if active != pointer_id {
            return PanelDragEffect::Noop(PanelDragNoop::PointerMismatch);
        }
        if geometry.resize(handle, dx, dy, viewport) {
            PanelDragEffect::Resized { handle }
        } else {
            PanelDragEffect::Noop(PanelDragNoop::Clamped)
        }
    }

    /// Pointer released (or cancelled) anywhere in the document.
    pub fn pointer_up(&mut self) -> PanelDragEffect {
        match std::mem::take(&mut self.state) {
            PanelDragState::Idle => PanelDragEffect::Noop(PanelDragNoop::IdleWithoutActiveDrag),
            PanelDragState::Resizing { handle, .. } => PanelDragEffect::Released { handle },
        }
    }
}
