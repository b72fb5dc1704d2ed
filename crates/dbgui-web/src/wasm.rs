#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: the `dbgui()` entry point, the panel and
//! category handles, and the widget constructors.
//!
//! Only compiled on `wasm32` targets.
//!
//! JS has no owner to hand the panel to, so the first `dbgui()` call creates
//! one [`Session`] and parks it in a thread-local slot for the lifetime of
//! the page. Every handle returned to JS holds an `Rc` to that session.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use dbgui_core::{
    Button, DbguiError, FlexDirection, Group, HostError, NumberInput, Panel,
    PollPolicy, RangeInput, TextInput, ValueDisplay, Widget, coerce_number,
    widget::interval_from_ms,
};
use gloo::events::EventListener;
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{FontFace, PointerEvent};

use crate::dom_host::WebHost;
use crate::pointer::{PanelSignal, dispatch};

const FONT_FAMILY_NAME: &str = "IBM Plex Mono";
const FONT_SOURCE: &str =
    "url(https://fonts.gstatic.com/s/ibmplexmono/v19/-F63fjptAgt5VM-kVkqdyU8n1i8q1w.woff2)";

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "dbgui panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("dbgui panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn to_js(err: DbguiError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn host_to_js(err: HostError) -> JsValue {
    to_js(err.into())
}

fn type_error(msg: &str) -> JsValue {
    js_sys::TypeError::new(msg).into()
}

/// `String(value)` for the common cases.
fn js_display(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_undefined() {
        return String::from("undefined");
    }
    if value.is_null() {
        return String::from("null");
    }
    value.unchecked_ref::<Object>().to_string().into()
}

/// `JSON.stringify(value, null, 2)`; values JSON cannot represent render as
/// `undefined`.
fn js_json(value: &JsValue) -> String {
    js_sys::JSON::stringify_with_replacer_and_space(value, &JsValue::NULL, &JsValue::from_f64(2.0))
        .ok()
        .and_then(|text| text.as_string())
        .unwrap_or_else(|| String::from("undefined"))
}

fn call_js(callback: &Function, arg: Option<&JsValue>, what: &'static str) -> Result<JsValue, JsValue> {
    let result = match arg {
        Some(arg) => callback.call1(&JsValue::UNDEFINED, arg),
        None => callback.call0(&JsValue::UNDEFINED),
    };
    result.inspect_err(|err| {
        tracing::warn!(target: "dbgui_web", callback = what, error = %js_display(err), "widget callback threw");
    })
}

fn load_font(host: &WebHost) {
    let font = match FontFace::new_with_str(FONT_FAMILY_NAME, FONT_SOURCE) {
        Ok(font) => font,
        Err(err) => {
            tracing::warn!(target: "dbgui_web", error = %js_display(&err), "font face rejected");
            return;
        }
    };
    if let Err(err) = host.document().fonts().add(&font) {
        tracing::warn!(target: "dbgui_web", error = %js_display(&err), "font face not added");
        return;
    }
    let _ = font.load();
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Session {
    host: Rc<WebHost>,
    panel: RefCell<Panel<WebHost>>,
    listeners: RefCell<Vec<EventListener>>,
    attach_pending: Cell<bool>,
}

thread_local! {
    static SESSION: OnceCell<Rc<Session>> = const { OnceCell::new() };
}

impl Session {
    fn get_or_create() -> Result<Rc<Self>, JsValue> {
        SESSION.with(|slot| {
            if let Some(session) = slot.get() {
                return Ok(Rc::clone(session));
            }
            let session = Self::create()?;
            let _ = slot.set(Rc::clone(&session));
            Ok(session)
        })
    }

    fn create() -> Result<Rc<Self>, JsValue> {
        install_panic_hook();
        let host = Rc::new(WebHost::from_window().map_err(host_to_js)?);
        let config = host.panel_config();
        load_font(&host);
        let panel = Panel::new(Rc::clone(&host), config).map_err(to_js)?;
        let session = Rc::new(Self {
            host,
            panel: RefCell::new(panel),
            listeners: RefCell::new(Vec::new()),
            attach_pending: Cell::new(false),
        });
        session.install_pointer_listeners();
        tracing::debug!(target: "dbgui_web", "session created");
        Ok(session)
    }

    fn with_panel<T>(
        &self,
        f: impl FnOnce(&mut Panel<WebHost>) -> dbgui_core::Result<T>,
    ) -> Result<T, JsValue> {
        let mut panel = self.panel.try_borrow_mut().map_err(|_| {
            js_sys::Error::new(
                "dbgui: the panel is busy; register widgets after the current callback returns",
            )
        })?;
        f(&mut panel).map_err(to_js)
    }

    /// Attach now, or once `DOMContentLoaded` fires if the document is
    /// still loading.
    fn attach_when_ready(self: &Rc<Self>) -> Result<(), JsValue> {
        let attached = self
            .panel
            .try_borrow()
            .map(|panel| panel.is_attached())
            .unwrap_or(true);
        if attached || self.attach_pending.get() {
            return Ok(());
        }
        if !self.host.is_loading() {
            return self.with_panel(|panel| panel.attach().map(drop));
        }

        self.attach_pending.set(true);
        let weak = Rc::downgrade(self);
        let listener = EventListener::once(self.host.document(), "DOMContentLoaded", move |_| {
            let Some(session) = weak.upgrade() else {
                return;
            };
            session.attach_pending.set(false);
            if let Err(err) = session.with_panel(|panel| panel.attach().map(drop)) {
                tracing::warn!(target: "dbgui_web", error = %js_display(&err), "deferred attach failed");
            }
        });
        self.listeners.borrow_mut().push(listener);
        tracing::debug!(target: "dbgui_web", "attach deferred until DOMContentLoaded");
        Ok(())
    }

    fn install_pointer_listeners(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let mut listeners = Vec::new();

        {
            let panel = self.panel.borrow();
            for (handle, node) in panel.handle_nodes() {
                let weak = weak.clone();
                listeners.push(EventListener::new(node, "pointerdown", move |event| {
                    let Some(event) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    event.prevent_default();
                    send_signal(
                        &weak,
                        PanelSignal::HandleDown {
                            handle,
                            pointer_id: event.pointer_id(),
                        },
                    );
                }));
            }
        }

        let window = self.host.window();
        let move_weak = weak.clone();
        listeners.push(EventListener::new(window, "pointermove", move |event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            send_signal(
                &move_weak,
                PanelSignal::Move {
                    pointer_id: event.pointer_id(),
                    dx: f64::from(event.movement_x()),
                    dy: f64::from(event.movement_y()),
                },
            );
        }));
        let up_weak = weak.clone();
        listeners.push(EventListener::new(window, "pointerup", move |_| {
            send_signal(&up_weak, PanelSignal::Up);
        }));
        let cancel_weak = weak.clone();
        listeners.push(EventListener::new(window, "pointercancel", move |_| {
            send_signal(&cancel_weak, PanelSignal::Cancel);
        }));
        listeners.push(EventListener::new(window, "resize", move |_| {
            send_signal(&weak, PanelSignal::ViewportResized);
        }));

        self.listeners.borrow_mut().extend(listeners);
    }
}

fn send_signal(session: &Weak<Session>, signal: PanelSignal) {
    let Some(session) = session.upgrade() else {
        return;
    };
    let Ok(mut panel) = session.panel.try_borrow_mut() else {
        tracing::warn!(target: "dbgui_web", ?signal, "panel busy, pointer signal dropped");
        return;
    };
    if let Err(err) = dispatch(&mut panel, signal) {
        tracing::warn!(target: "dbgui_web", ?signal, error = %err, "pointer signal failed");
    }
}

// ---------------------------------------------------------------------------
// Panel handles
// ---------------------------------------------------------------------------

/// Return the page's debug panel, creating it on first use. Attachment to
/// the document waits for `DOMContentLoaded` when called during parsing.
#[wasm_bindgen]
pub fn dbgui() -> Result<DbgUi, JsValue> {
    let session = Session::get_or_create()?;
    session.attach_when_ready()?;
    Ok(DbgUi { session })
}

/// Alias of [`dbgui`].
#[wasm_bindgen(js_name = panel)]
pub fn js_panel() -> Result<DbgUi, JsValue> {
    dbgui()
}

/// Handle to the panel.
#[wasm_bindgen]
pub struct DbgUi {
    session: Rc<Session>,
}

#[wasm_bindgen]
impl DbgUi {
    /// Register `widget` under `key`; `null` removes the key.
    ///
    /// The widget handle stays usable; adding it again renders a new copy.
    pub fn add(&self, key: &str, widget: JsValue) -> Result<DbgUi, JsValue> {
        let widget = JsWidget::build_from_js(&widget)?;
        self.session.with_panel(|panel| panel.add(key, widget).map(drop))?;
        Ok(self.handle())
    }

    pub fn remove(&self, key: &str) -> Result<DbgUi, JsValue> {
        self.session.with_panel(|panel| panel.remove(key).map(drop))?;
        Ok(self.handle())
    }

    /// Category `name`, created on first use.
    #[wasm_bindgen(js_name = "in")]
    pub fn in_category(&self, name: &str) -> Result<DbgUiCategory, JsValue> {
        self.session
            .with_panel(|panel| panel.in_category(name).map(drop))?;
        Ok(DbgUiCategory {
            session: Rc::clone(&self.session),
            name: name.to_string(),
        })
    }

    #[wasm_bindgen(js_name = addIn)]
    pub fn add_in(
        &self,
        category: &str,
        key: &str,
        widget: JsValue,
    ) -> Result<DbgUi, JsValue> {
        let widget = JsWidget::build_from_js(&widget)?;
        self.session
            .with_panel(|panel| panel.add_in(category, key, widget).map(drop))?;
        Ok(self.handle())
    }

    pub fn show(&self) -> Result<(), JsValue> {
        self.session.with_panel(|panel| panel.show())
    }

    pub fn hide(&self) -> Result<(), JsValue> {
        self.session.with_panel(|panel| panel.hide())
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> Result<bool, JsValue> {
        self.session.with_panel(|panel| Ok(panel.is_visible()))
    }

    /// Uncategorised keys in display order.
    pub fn keys(&self) -> Result<Vec<String>, JsValue> {
        self.session
            .with_panel(|panel| Ok(panel.keys().map(String::from).collect()))
    }

    #[wasm_bindgen(js_name = categoryNames)]
    pub fn category_names(&self) -> Result<Vec<String>, JsValue> {
        self.session
            .with_panel(|panel| Ok(panel.category_names().map(String::from).collect()))
    }

    /// `{ x, y, width, height }` of the panel in CSS pixels.
    pub fn rect(&self) -> Result<Object, JsValue> {
        let rect = self.session.with_panel(|panel| Ok(panel.rect()))?;
        let obj = Object::new();
        set_js(&obj, "x", JsValue::from_f64(rect.x));
        set_js(&obj, "y", JsValue::from_f64(rect.y));
        set_js(&obj, "width", JsValue::from_f64(rect.width));
        set_js(&obj, "height", JsValue::from_f64(rect.height));
        Ok(obj)
    }

    /// Whole panel state as a JSON string.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let snapshot = self.session.with_panel(|panel| Ok(panel.snapshot()))?;
        snapshot
            .to_json()
            .map_err(|err| js_sys::Error::new(&err.to_string()).into())
    }
}

impl DbgUi {
    fn handle(&self) -> DbgUi {
        DbgUi {
            session: Rc::clone(&self.session),
        }
    }
}

/// Handle to one category of the panel.
#[wasm_bindgen]
pub struct DbgUiCategory {
    session: Rc<Session>,
    name: String,
}

#[wasm_bindgen]
impl DbgUiCategory {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Register `widget` under `key` in this category; `null` removes it.
    pub fn add(&self, key: &str, widget: JsValue) -> Result<DbgUiCategory, JsValue> {
        let widget = JsWidget::build_from_js(&widget)?;
        self.session
            .with_panel(|panel| panel.add_in(&self.name, key, widget).map(drop))?;
        Ok(self.handle())
    }

    pub fn remove(&self, key: &str) -> Result<DbgUiCategory, JsValue> {
        self.session
            .with_panel(|panel| panel.in_category(&self.name)?.remove(key).map(drop))?;
        Ok(self.handle())
    }

    pub fn keys(&self) -> Result<Vec<String>, JsValue> {
        self.session.with_panel(|panel| {
            Ok(panel
                .category_keys(&self.name)
                .unwrap_or_default()
                .into_iter()
                .map(String::from)
                .collect())
        })
    }
}

impl DbgUiCategory {
    fn handle(&self) -> DbgUiCategory {
        DbgUiCategory {
            session: Rc::clone(&self.session),
            name: self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct InputDraft {
    getter: Option<Function>,
    on_input: Option<Function>,
    on_change: Option<Function>,
    poll_ms: Option<u32>,
}

#[derive(Clone)]
enum Draft {
    Button {
        label: String,
        on_click: Option<Function>,
    },
    ValueDisplay {
        getter: Function,
        rep_as_json: bool,
        stringify: Option<Function>,
        poll: Option<PollPolicy>,
    },
    Text(InputDraft),
    Number(InputDraft),
    Range {
        min: f64,
        max: f64,
        step: f64,
        input: InputDraft,
    },
    Group {
        children: Vec<Draft>,
        direction: FlexDirection,
    },
}

fn number_from_js(value: &JsValue) -> f64 {
    value
        .as_f64()
        .unwrap_or_else(|| coerce_number(&js_display(value)))
}

fn number_getter(getter: Function) -> impl Fn() -> f64 + 'static {
    move || match call_js(&getter, None, "getter") {
        Ok(value) => number_from_js(&value),
        Err(_) => f64::NAN,
    }
}

fn text_callback(callback: Function, what: &'static str) -> impl Fn(&str) + 'static {
    move |text| {
        let _ = call_js(&callback, Some(&JsValue::from_str(text)), what);
    }
}

fn number_callback(callback: Function, what: &'static str) -> impl Fn(f64) + 'static {
    move |value| {
        let _ = call_js(&callback, Some(&JsValue::from_f64(value)), what);
    }
}

impl Draft {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::ValueDisplay { .. } => "valueDisplay",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Range { .. } => "range",
            Self::Group { .. } => "group",
        }
    }

    fn input_mut(&mut self) -> Option<&mut InputDraft> {
        match self {
            Self::Text(input) | Self::Number(input) | Self::Range { input, .. } => Some(input),
            _ => None,
        }
    }

    fn build(&self) -> Widget {
        match self {
            Self::Button { label, on_click } => {
                let mut button = Button::new(label.clone());
                if let Some(callback) = on_click.clone() {
                    button = button.on_click(move || {
                        let _ = call_js(&callback, None, "onClick");
                    });
                }
                button.into()
            }
            Self::ValueDisplay {
                getter,
                rep_as_json,
                stringify,
                poll,
            } => {
                let getter = getter.clone();
                let stringify = stringify.clone();
                let rep_as_json = *rep_as_json;
                let display = ValueDisplay::from_text(move || {
                    let value = match call_js(&getter, None, "valueDisplay") {
                        Ok(value) => value,
                        Err(err) => return js_display(&err),
                    };
                    match &stringify {
                        Some(stringify) => match call_js(stringify, Some(&value), "stringify") {
                            Ok(text) => js_display(&text),
                            Err(err) => js_display(&err),
                        },
                        None if rep_as_json => js_json(&value),
                        None => js_display(&value),
                    }
                });
                match poll {
                    Some(poll) => display.with_poll_policy(*poll).into(),
                    None => display.into(),
                }
            }
            Self::Text(input) => {
                let mut widget = TextInput::new();
                if let Some(getter) = input.getter.clone() {
                    widget = widget.with_getter(move || match call_js(&getter, None, "getter") {
                        Ok(value) => js_display(&value),
                        Err(err) => js_display(&err),
                    });
                }
                if let Some(callback) = input.on_input.clone() {
                    widget = widget.on_input(text_callback(callback, "onInput"));
                }
                if let Some(callback) = input.on_change.clone() {
                    widget = widget.on_change(text_callback(callback, "onChange"));
                }
                if let Some(ms) = input.poll_ms {
                    widget = widget.with_poll_interval(ms);
                }
                widget.into()
            }
            Self::Number(input) => {
                let mut widget = NumberInput::new();
                if let Some(getter) = input.getter.clone() {
                    widget = widget.with_getter(number_getter(getter));
                }
                if let Some(callback) = input.on_input.clone() {
                    widget = widget.on_input(number_callback(callback, "onInput"));
                }
                if let Some(callback) = input.on_change.clone() {
                    widget = widget.on_change(number_callback(callback, "onChange"));
                }
                if let Some(ms) = input.poll_ms {
                    widget = widget.with_poll_interval(ms);
                }
                widget.into()
            }
            Self::Range {
                min,
                max,
                step,
                input,
            } => {
                let mut widget = RangeInput::new(*min, *max, *step);
                if let Some(getter) = input.getter.clone() {
                    widget = widget.with_getter(number_getter(getter));
                }
                if let Some(callback) = input.on_input.clone() {
                    widget = widget.on_input(number_callback(callback, "onInput"));
                }
                if let Some(callback) = input.on_change.clone() {
                    widget = widget.on_change(number_callback(callback, "onChange"));
                }
                if let Some(ms) = input.poll_ms {
                    widget = widget.with_poll_interval(ms);
                }
                widget.into()
            }
            Self::Group {
                children,
                direction,
            } => Group::new(children.iter().map(Self::build))
                .with_dir(*direction)
                .into(),
        }
    }
}

fn poll_policy_from_js(value: &JsValue) -> Option<PollPolicy> {
    if let Some(ms) = value.as_f64() {
        return interval_from_ms(ms).map(PollPolicy::Interval);
    }
    value.as_string().as_deref().and_then(PollPolicy::parse)
}

/// Property exposing a widget handle's draft id to [`JsWidget::draft_from_js`].
const WIDGET_ID_PROPERTY: &str = "widgetId";

thread_local! {
    /// Live drafts by id. Entries go away with the last handle.
    static DRAFTS: RefCell<HashMap<u32, Weak<RefCell<Draft>>>> = RefCell::new(HashMap::new());
    static NEXT_DRAFT_ID: Cell<u32> = const { Cell::new(1) };
}

/// A widget definition. Builder methods mutate the definition and return
/// another handle to the same definition, so both chaining and
/// mutate-then-add work.
///
/// Passing a handle to `add`, `addIn` or `group` borrows it: the definition
/// is snapshotted and the handle can be added again.
#[wasm_bindgen(js_name = Widget)]
pub struct JsWidget {
    id: u32,
    draft: Rc<RefCell<Draft>>,
}

impl JsWidget {
    fn new(draft: Draft) -> Self {
        let id = NEXT_DRAFT_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1).max(1));
            id
        });
        let draft = Rc::new(RefCell::new(draft));
        DRAFTS.with(|drafts| drafts.borrow_mut().insert(id, Rc::downgrade(&draft)));
        Self { id, draft }
    }

    fn share(&self) -> Self {
        Self {
            id: self.id,
            draft: Rc::clone(&self.draft),
        }
    }

    fn with_draft(
        &self,
        f: impl FnOnce(&mut Draft) -> Result<(), JsValue>,
    ) -> Result<JsWidget, JsValue> {
        f(&mut self.draft.borrow_mut())?;
        Ok(self.share())
    }

    /// Current definition behind a JS widget handle; `null` and `undefined`
    /// yield `None`.
    fn draft_from_js(value: &JsValue) -> Result<Option<Draft>, JsValue> {
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        let draft = Reflect::get(value, &JsValue::from_str(WIDGET_ID_PROPERTY))
            .ok()
            .and_then(|id| id.as_f64())
            .and_then(|id| {
                let id = id as u32;
                DRAFTS.with(|drafts| drafts.borrow().get(&id).and_then(Weak::upgrade))
            });
        match draft {
            Some(draft) => Ok(Some(draft.borrow().clone())),
            None => Err(type_error(
                "expected a widget created by a dbgui constructor, or null",
            )),
        }
    }

    fn build_from_js(value: &JsValue) -> Result<Option<Widget>, JsValue> {
        Ok(Self::draft_from_js(value)?.map(|draft| draft.build()))
    }
}

impl Drop for JsWidget {
    fn drop(&mut self) {
        if Rc::strong_count(&self.draft) == 1 {
            let _ = DRAFTS.try_with(|drafts| {
                if let Ok(mut drafts) = drafts.try_borrow_mut() {
                    drafts.remove(&self.id);
                }
            });
        }
    }
}

#[wasm_bindgen(js_class = Widget)]
impl JsWidget {
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.draft.borrow().kind().to_string()
    }

    #[wasm_bindgen(getter, js_name = widgetId)]
    pub fn widget_id(&self) -> u32 {
        self.id
    }

    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&self, callback: Function) -> Result<JsWidget, JsValue> {
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft {
                Draft::Button { on_click, .. } => {
                    *on_click = Some(callback);
                    Ok(())
                }
                _ => Err(unsupported(kind, "onClick")),
            }
        })
    }

    #[wasm_bindgen(js_name = onInput)]
    pub fn on_input(&self, callback: Function) -> Result<JsWidget, JsValue> {
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft.input_mut() {
                Some(input) => {
                    input.on_input = Some(callback);
                    Ok(())
                }
                None => Err(unsupported(kind, "onInput")),
            }
        })
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) -> Result<JsWidget, JsValue> {
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft.input_mut() {
                Some(input) => {
                    input.on_change = Some(callback);
                    Ok(())
                }
                None => Err(unsupported(kind, "onChange")),
            }
        })
    }

    /// Milliseconds between refreshes, or `"manual"` for value displays.
    #[wasm_bindgen(js_name = withPollInterval)]
    pub fn with_poll_interval(&self, ms: JsValue) -> Result<JsWidget, JsValue> {
        let policy = poll_policy_from_js(&ms).ok_or_else(|| {
            type_error("withPollInterval expects a number of milliseconds or \"manual\"")
        })?;
        self.with_draft(|draft| {
            let kind = draft.kind();
            match (draft, policy) {
                (Draft::ValueDisplay { poll, .. }, policy) => *poll = Some(policy),
                (draft, PollPolicy::Interval(ms)) => match draft.input_mut() {
                    Some(input) => input.poll_ms = Some(ms),
                    None => return Err(unsupported(kind, "withPollInterval")),
                },
                (_, PollPolicy::Manual) => {
                    return Err(type_error(
                        "\"manual\" polling is only available on value displays",
                    ));
                }
            }
            Ok(())
        })
    }

    /// `true` (default): `JSON.stringify(value, null, 2)`; `false`:
    /// `String(value)`.
    #[wasm_bindgen(js_name = repAsJSON)]
    pub fn rep_as_json_upper(&self, enabled: bool) -> Result<JsWidget, JsValue> {
        self.rep_as_json(enabled)
    }

    #[wasm_bindgen(js_name = repAsJson)]
    pub fn rep_as_json(&self, enabled: bool) -> Result<JsWidget, JsValue> {
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft {
                Draft::ValueDisplay { rep_as_json, .. } => {
                    *rep_as_json = enabled;
                    Ok(())
                }
                _ => Err(unsupported(kind, "repAsJson")),
            }
        })
    }

    /// Custom `value => string` conversion; overrides `repAsJson`.
    #[wasm_bindgen(js_name = withStringifyFunction)]
    pub fn with_stringify_function(&self, stringify: Function) -> Result<JsWidget, JsValue> {
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft {
                Draft::ValueDisplay {
                    stringify: slot, ..
                } => {
                    *slot = Some(stringify);
                    Ok(())
                }
                _ => Err(unsupported(kind, "withStringifyFunction")),
            }
        })
    }

    /// `"row"` (default) or `"column"`.
    #[wasm_bindgen(js_name = withDir)]
    pub fn with_dir(&self, direction: &str) -> Result<JsWidget, JsValue> {
        let parsed = FlexDirection::parse(direction)
            .ok_or_else(|| type_error("withDir expects \"row\" or \"column\""))?;
        self.with_draft(|draft| {
            let kind = draft.kind();
            match draft {
                Draft::Group { direction, .. } => {
                    *direction = parsed;
                    Ok(())
                }
                _ => Err(unsupported(kind, "withDir")),
            }
        })
    }
}

fn unsupported(kind: &str, method: &str) -> JsValue {
    type_error(&format!("{method} is not available on a {kind} widget"))
}

fn widget(draft: Draft) -> JsWidget {
    JsWidget::new(draft)
}

fn text_widget(getter: Option<Function>) -> JsWidget {
    widget(Draft::Text(InputDraft {
        getter,
        ..InputDraft::default()
    }))
}

fn number_widget(getter: Option<Function>) -> JsWidget {
    widget(Draft::Number(InputDraft {
        getter,
        ..InputDraft::default()
    }))
}

fn range_widget(
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    getter: Option<Function>,
) -> JsWidget {
    let defaults = RangeInput::default();
    let (default_min, default_max, default_step) = defaults.bounds();
    widget(Draft::Range {
        min: min.unwrap_or(default_min),
        max: max.unwrap_or(default_max),
        step: step.unwrap_or(default_step),
        input: InputDraft {
            getter,
            ..InputDraft::default()
        },
    })
}

/// Button labelled `label` (default `"Click"`).
#[wasm_bindgen(js_name = button)]
pub fn js_button(label: Option<String>) -> JsWidget {
    widget(Draft::Button {
        label: label.unwrap_or_else(|| Button::default().label().to_string()),
        on_click: None,
    })
}

/// Read-only display of `getter()`, refreshed every 100 ms by default.
#[wasm_bindgen(js_name = valueDisplay)]
pub fn js_value_display(getter: Function) -> JsWidget {
    widget(Draft::ValueDisplay {
        getter,
        rep_as_json: true,
        stringify: None,
        poll: None,
    })
}

#[wasm_bindgen(js_name = text)]
pub fn js_text(getter: Option<Function>) -> JsWidget {
    text_widget(getter)
}

#[wasm_bindgen(js_name = input)]
pub fn js_input(getter: Option<Function>) -> JsWidget {
    text_widget(getter)
}

#[wasm_bindgen(js_name = textInput)]
pub fn js_text_input(getter: Option<Function>) -> JsWidget {
    text_widget(getter)
}

#[wasm_bindgen(js_name = number)]
pub fn js_number(getter: Option<Function>) -> JsWidget {
    number_widget(getter)
}

#[wasm_bindgen(js_name = numberInput)]
pub fn js_number_input(getter: Option<Function>) -> JsWidget {
    number_widget(getter)
}

/// Slider over `[min, max]` (defaults `0`, `100`, step `1`).
#[wasm_bindgen(js_name = range)]
pub fn js_range(
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    getter: Option<Function>,
) -> JsWidget {
    range_widget(min, max, step, getter)
}

#[wasm_bindgen(js_name = slider)]
pub fn js_slider(
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    getter: Option<Function>,
) -> JsWidget {
    range_widget(min, max, step, getter)
}

#[wasm_bindgen(js_name = rangeInput)]
pub fn js_range_input(
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    getter: Option<Function>,
) -> JsWidget {
    range_widget(min, max, step, getter)
}

/// Row (or column) of `children`. The children are snapshotted; their
/// handles stay usable.
#[wasm_bindgen(js_name = group)]
pub fn js_group(children: Vec<JsValue>) -> Result<JsWidget, JsValue> {
    let children = children
        .iter()
        .map(|child| {
            JsWidget::draft_from_js(child)?
                .ok_or_else(|| type_error("group children must be widgets"))
        })
        .collect::<Result<Vec<_>, JsValue>>()?;
    Ok(widget(Draft::Group {
        children,
        direction: FlexDirection::default(),
    }))
}
