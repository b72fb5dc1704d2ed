#![forbid(unsafe_code)]

//! Browser binding of the dbgui floating debug panel.
//!
//! The crate has two layers:
//! - [`pointer`]: host-agnostic routing of pointer and window signals to a
//!   [`dbgui_core::Panel`]; compiled everywhere and tested natively.
//! - `dom_host` + `wasm` (only on `wasm32`): the `web-sys` document backend
//!   and the `wasm-bindgen` exports (`dbgui()`, `add`, `in`, `addIn`,
//!   `show`, `hide` and the widget constructors).

pub mod pointer;
pub mod ready;

#[cfg(target_arch = "wasm32")]
mod dom_host;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom_host::{WebHost, config_from_search};
#[cfg(target_arch = "wasm32")]
pub use wasm::{
    DbgUi, DbgUiCategory, JsWidget, dbgui, js_button, js_group, js_input, js_number,
    js_number_input, js_panel, js_range, js_range_input, js_slider, js_text, js_text_input,
    js_value_display,
};

pub use pointer::{PanelSignal, SignalOutcome, dispatch};
pub use ready::ReadyState;
