#![forbid(unsafe_code)]

//! `dbgui-core` is the host-agnostic engine behind the dbgui floating debug
//! panel.
//!
//! Design goals:
//! - **No ambient globals**: a [`Panel`] is an ordinary value owned by
//!   whoever drives the document lifecycle.
//! - **Host boundary**: every document operation goes through
//!   [`host::DomHost`], so the whole engine runs headless against
//!   [`memory_host::MemoryHost`].
//! - **Deterministic teardown**: listeners and poll timers are owned guards,
//!   released when a widget is replaced, removed or disposed.
//!
//! ```
//! use std::rc::Rc;
//! use dbgui_core::{MemoryHost, Panel, PanelConfig, button, slider};
//!
//! let host = Rc::new(MemoryHost::default());
//! let mut panel = Panel::new(host, PanelConfig::default())?;
//! panel.attach()?;
//! panel
//!     .add("Reset", button("reset").on_click(|| {}))?
//!     .add_in("Camera", "Zoom", slider(0.5, 4.0, 0.1).on_input(|_| {}))?;
//! assert_eq!(panel.category_names().collect::<Vec<_>>(), ["Camera"]);
//! # Ok::<(), dbgui_core::DbguiError>(())
//! ```

pub mod category;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod host;
pub mod memory_host;
pub mod panel;
pub mod registry;
pub mod render;
pub mod style;
pub mod widget;

pub use config::PanelConfig;
pub use drag::{PanelDrag, PanelDragEffect, PanelDragNoop, PanelDragState};
pub use error::{ConfigError, DbguiError, HostError, HostResult, Result};
pub use geometry::{PanelGeometry, PanelRect, ResizeHandle, Viewport};
pub use host::{DomEvent, DomHost, ElementKind};
pub use memory_host::{MemoryHost, MemoryNode};
pub use panel::{CategoryHandle, Panel, PanelSnapshot};
pub use registry::{Keyed, RegistryChange, SortedRegistry};
pub use render::LiveWidget;
pub use widget::{
    Button, FlexDirection, Group, IntoWidget, NumberInput, PollPolicy, RangeInput, TextInput,
    ValueDisplay, ValueDisplayBuilder, Widget, button, coerce_number, format_number, group, input,
    number, number_input, range, range_input, slider, text, text_input, value_display,
};
