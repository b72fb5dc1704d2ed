#![forbid(unsafe_code)]

//! [`DomHost`] over the live browser document.
//!
//! Listener and timer guards are `gloo` values: dropping an
//! [`EventListener`] removes it from its target, dropping an [`Interval`]
//! clears it.

use dbgui_core::host::{EventHandler, TimerTick};
use dbgui_core::{DomEvent, DomHost, ElementKind, HostError, HostResult, PanelConfig, Viewport};
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlInputElement, UrlSearchParams, Window};

use crate::ready::ReadyState;

fn js_error(operation: &'static str, err: &JsValue) -> HostError {
    let message = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"));
    HostError::new(operation, message)
}

/// Browser document backend.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Bind to the global `window` and its document.
    pub fn from_window() -> HostResult<Self> {
        let window = web_sys::window().ok_or_else(|| HostError::new("window", "no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::new("document", "window has no document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether the document is still being parsed (no `<body>` guaranteed).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !ReadyState::parse(&self.document.ready_state()).allows_attach()
    }

    /// `location.search` of the page, empty when unavailable.
    #[must_use]
    pub fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    /// Panel configuration from the page URL.
    #[must_use]
    pub fn panel_config(&self) -> PanelConfig {
        config_from_search(&self.location_search())
    }
}

/// Read configuration from a `location.search` string with the browser's
/// own `URLSearchParams` decoding.
#[must_use]
pub fn config_from_search(search: &str) -> PanelConfig {
    match UrlSearchParams::new_with_str(search) {
        Ok(params) => PanelConfig::from_query_with(|name| params.get(name)),
        Err(err) => {
            tracing::warn!(
                target: "dbgui_web",
                error = %js_error("query", &err),
                "unreadable query string, using defaults"
            );
            PanelConfig::default()
        }
    }
}

impl DomHost for WebHost {
    type Node = HtmlElement;
    type Listener = EventListener;
    type Timer = Interval;

    fn create(&self, kind: ElementKind) -> HostResult<HtmlElement> {
        let element = self
            .document
            .create_element(kind.tag_name())
            .map_err(|err| js_error("create", &err))?;
        let element = element
            .dyn_into::<HtmlElement>()
            .map_err(|err| js_error("create", &err))?;
        if let Some(input_type) = kind.input_type() {
            element
                .set_attribute("type", input_type)
                .map_err(|err| js_error("create", &err))?;
        }
        Ok(element)
    }

    fn set_style(&self, node: &HtmlElement, css: &str) -> HostResult<()> {
        node.style().set_css_text(css);
        Ok(())
    }

    fn set_style_property(&self, node: &HtmlElement, name: &str, value: &str) -> HostResult<()> {
        node.style()
            .set_property(name, value)
            .map_err(|err| js_error("set_style_property", &err))
    }

    fn set_attribute(&self, node: &HtmlElement, name: &str, value: &str) -> HostResult<()> {
        node.set_attribute(name, value)
            .map_err(|err| js_error("set_attribute", &err))
    }

    fn set_text(&self, node: &HtmlElement, text: &str) {
        node.set_text_content(Some(text));
    }

    fn input_value(&self, node: &HtmlElement) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_input_value(&self, node: &HtmlElement, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn append_child(&self, parent: &HtmlElement, child: &HtmlElement) -> HostResult<()> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|err| js_error("append_child", &err))
    }

    fn insert_before(
        &self,
        parent: &HtmlElement,
        child: &HtmlElement,
        reference: &HtmlElement,
    ) -> HostResult<()> {
        parent
            .insert_before(child, Some(reference))
            .map(drop)
            .map_err(|err| js_error("insert_before", &err))
    }

    fn replace_with(&self, old: &HtmlElement, new: &HtmlElement) -> HostResult<()> {
        old.replace_with_with_node_1(new)
            .map_err(|err| js_error("replace_with", &err))
    }

    fn remove(&self, node: &HtmlElement) {
        node.remove();
    }

    fn append_to_body(&self, node: &HtmlElement) -> HostResult<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| HostError::new("append_to_body", "document has no body"))?;
        body.append_child(node)
            .map(drop)
            .map_err(|err| js_error("append_to_body", &err))
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn listen(
        &self,
        node: &HtmlElement,
        event: DomEvent,
        mut handler: EventHandler,
    ) -> HostResult<EventListener> {
        Ok(EventListener::new(node, event.name(), move |_event| {
            handler();
        }))
    }

    fn set_interval(&self, period_ms: u32, mut tick: TimerTick) -> HostResult<Interval> {
        Ok(Interval::new(period_ms.max(1), move || tick()))
    }
}
