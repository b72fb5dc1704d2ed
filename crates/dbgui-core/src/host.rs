#![forbid(unsafe_code)]

//! Document backend boundary.
//!
//! The engine never touches a browser API directly. Everything it needs from
//! the document (element creation, tree mutation, listeners, timers,
//! viewport size) goes through [`DomHost`]. Concrete implementations:
//! - `dbgui-web`: `web-sys` DOM on `wasm32`.
//! - [`crate::memory_host::MemoryHost`]: deterministic in-memory document
//!   with a manual clock, used for headless driving and tests.
//!
//! Listener and timer registrations are returned as guard values. Dropping a
//! guard unregisters the listener or cancels the timer; that is the only
//! teardown path the engine relies on.

use core::fmt;

use crate::error::HostResult;
use crate::geometry::Viewport;

/// Closed set of elements the panel creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Div,
    Button,
    TextInput,
    NumberInput,
    RangeInput,
    Details,
    Summary,
}

impl ElementKind {
    /// HTML tag name.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Button => "button",
            Self::TextInput | Self::NumberInput | Self::RangeInput => "input",
            Self::Details => "details",
            Self::Summary => "summary",
        }
    }

    /// `type` attribute for `<input>` kinds.
    #[must_use]
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::RangeInput => Some("range"),
            Self::Div | Self::Button | Self::Details | Self::Summary => None,
        }
    }
}

/// Element events the widgets subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    /// Fires on every edit of an input.
    Input,
    /// Fires when an edit is committed (blur, Enter, slider release).
    Change,
    Focus,
    Blur,
}

impl DomEvent {
    /// DOM event type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

/// Event handler installed through [`DomHost::listen`].
pub type EventHandler = Box<dyn FnMut()>;

/// Timer callback installed through [`DomHost::set_interval`].
pub type TimerTick = Box<dyn FnMut()>;

/// Document operations required by the panel.
///
/// All methods take `&self`: hosts are shared (`Rc<H>`) between the panel
/// and every live widget callback, and the underlying document is mutated
/// through interior mutability.
pub trait DomHost: 'static {
    /// Handle to one element.
    type Node: Clone + fmt::Debug + 'static;
    /// Listener guard; dropping it unregisters the handler.
    type Listener: 'static;
    /// Timer guard; dropping it cancels the timer.
    type Timer: 'static;

    fn create(&self, kind: ElementKind) -> HostResult<Self::Node>;

    /// Replace the element's whole inline style with `css`.
    fn set_style(&self, node: &Self::Node, css: &str) -> HostResult<()>;

    fn set_style_property(&self, node: &Self::Node, name: &str, value: &str) -> HostResult<()>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> HostResult<()>;

    /// Replace the element's content with a text node.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Current value of an `<input>`; empty for other elements.
    fn input_value(&self, node: &Self::Node) -> String;

    fn set_input_value(&self, node: &Self::Node, value: &str);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> HostResult<()>;

    /// Insert `child` into `parent` right before `reference`.
    fn insert_before(
        &self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: &Self::Node,
    ) -> HostResult<()>;

    /// Put `new` where `old` is and detach `old`.
    fn replace_with(&self, old: &Self::Node, new: &Self::Node) -> HostResult<()>;

    /// Detach `node` from its parent; detached nodes are ignored.
    fn remove(&self, node: &Self::Node);

    fn append_to_body(&self, node: &Self::Node) -> HostResult<()>;

    fn viewport(&self) -> Viewport;

    fn listen(
        &self,
        node: &Self::Node,
        event: DomEvent,
        handler: EventHandler,
    ) -> HostResult<Self::Listener>;

    /// Start a repeating timer firing every `period_ms`.
    fn set_interval(&self, period_ms: u32, tick: TimerTick) -> HostResult<Self::Timer>;
}
