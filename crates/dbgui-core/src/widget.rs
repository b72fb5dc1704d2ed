#![forbid(unsafe_code)]

//! Widget descriptions.
//!
//! A [`Widget`] is an immutable, cheaply clonable description: label,
//! getters, callbacks and poll policy. Builders consume `self` and return the
//! configured value, so nothing can be mutated after a widget produced a live
//! node. Rendering lives in [`crate::render`]; one description may be
//! rendered any number of times, each call yielding an independent node bound
//! to the same getters and callbacks.

use core::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Poll period used when a widget does not choose one.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

pub type Callback = Rc<dyn Fn()>;
pub type TextCallback = Rc<dyn Fn(&str)>;
pub type NumberCallback = Rc<dyn Fn(f64)>;
pub type TextSource = Rc<dyn Fn() -> String>;
pub type NumberSource = Rc<dyn Fn() -> f64>;
type Stringify<T> = Rc<dyn Fn(&T) -> String>;

/// How a value display learns about new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPolicy {
    /// Re-read the getter every `n` milliseconds.
    Interval(u32),
    /// Re-read only when the user presses the "Update" button.
    Manual,
}

impl PollPolicy {
    /// Parse the JS-facing spelling: `"manual"` or a millisecond count.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("manual") {
            return Some(Self::Manual);
        }
        let ms = coerce_number(raw);
        interval_from_ms(ms).map(Self::Interval)
    }
}

/// Convert a host millisecond count into a timer period.
///
/// Negative values behave like `0` (the host clamps them to its minimum
/// tick); non-finite values are rejected.
#[must_use]
pub fn interval_from_ms(ms: f64) -> Option<u32> {
    if !ms.is_finite() {
        return None;
    }
    Some(ms.clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Static label plus click callback.
#[derive(Clone)]
pub struct Button {
    pub(crate) label: String,
    pub(crate) on_click: Option<Callback>,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_click: None,
        }
    }

    /// Replace the click callback.
    #[must_use]
    pub fn on_click(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new("Click")
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Typed builder for a value display.
///
/// The value type is erased when the builder is turned into a [`Widget`].
pub struct ValueDisplayBuilder<T> {
    getter: Rc<dyn Fn() -> T>,
    stringify: Stringify<T>,
    poll: Option<PollPolicy>,
}

impl<T> Clone for ValueDisplayBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            getter: Rc::clone(&self.getter),
            stringify: Rc::clone(&self.stringify),
            poll: self.poll,
        }
    }
}

impl<T: 'static> ValueDisplayBuilder<T> {
    /// Display with `stringify`; no `Debug` bound needed.
    pub fn with_stringify(
        getter: impl Fn() -> T + 'static,
        stringify: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            getter: Rc::new(getter),
            stringify: Rc::new(stringify),
            poll: None,
        }
    }

    /// Override how values are turned into text.
    #[must_use]
    pub fn with_stringify_function(mut self, stringify: impl Fn(&T) -> String + 'static) -> Self {
        self.stringify = Rc::new(stringify);
        self
    }

    /// Render values with their `Display` implementation.
    #[must_use]
    pub fn rep_as_display(self) -> Self
    where
        T: fmt::Display,
    {
        self.with_stringify_function(ToString::to_string)
    }

    /// Render values as pretty-printed JSON (two-space indent).
    #[must_use]
    pub fn rep_as_json(self) -> Self
    where
        T: Serialize,
    {
        self.with_stringify_function(|value| match serde_json::to_string_pretty(value) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(target: "dbgui::widget", error = %err, "value is not representable as JSON");
                String::from("undefined")
            }
        })
    }

    #[must_use]
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll = Some(PollPolicy::Interval(ms));
        self
    }

    /// Only refresh when the user asks for it.
    #[must_use]
    pub fn manual(mut self) -> Self {
        self.poll = Some(PollPolicy::Manual);
        self
    }

    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Erase the value type.
    #[must_use]
    pub fn build(self) -> ValueDisplay {
        let Self {
            getter,
            stringify,
            poll,
        } = self;
        ValueDisplay {
            sample: Rc::new(move || stringify(&getter())),
            poll,
        }
    }
}

impl<T> fmt::Debug for ValueDisplayBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDisplayBuilder")
            .field("value_type", &core::any::type_name::<T>())
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

/// Type-erased value display.
#[derive(Clone)]
pub struct ValueDisplay {
    pub(crate) sample: TextSource,
    pub(crate) poll: Option<PollPolicy>,
}

impl ValueDisplay {
    /// Display from a getter that already produces text.
    pub fn from_text(sample: impl Fn() -> String + 'static) -> Self {
        Self {
            sample: Rc::new(sample),
            poll: None,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll = Some(PollPolicy::Interval(ms));
        self
    }

    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = Some(poll);
        self
    }

    #[must_use]
    pub fn poll_policy(&self) -> Option<PollPolicy> {
        self.poll
    }
}

impl fmt::Debug for ValueDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDisplay")
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

/// Free-text input.
#[derive(Clone, Default)]
pub struct TextInput {
    pub(crate) getter: Option<TextSource>,
    pub(crate) on_input: Option<TextCallback>,
    pub(crate) on_change: Option<TextCallback>,
    pub(crate) poll_interval_ms: Option<u32>,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// External source of truth, polled while the field is not focused.
    #[must_use]
    pub fn with_getter(mut self, getter: impl Fn() -> String + 'static) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    /// Called on every edit.
    #[must_use]
    pub fn on_input(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_input = Some(Rc::new(callback));
        self
    }

    /// Called when an edit is committed.
    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("getter", &self.getter.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

/// Numeric input; text is coerced with [`coerce_number`].
#[derive(Clone, Default)]
pub struct NumberInput {
    pub(crate) getter: Option<NumberSource>,
    pub(crate) on_input: Option<NumberCallback>,
    pub(crate) on_change: Option<NumberCallback>,
    pub(crate) poll_interval_ms: Option<u32>,
}

impl NumberInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_getter(mut self, getter: impl Fn() -> f64 + 'static) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    #[must_use]
    pub fn on_input(mut self, callback: impl Fn(f64) + 'static) -> Self {
        self.on_input = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(f64) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }
}

impl fmt::Debug for NumberInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberInput")
            .field("getter", &self.getter.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

/// Slider with fixed bounds and boundary labels.
#[derive(Clone)]
pub struct RangeInput {
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) step: f64,
    pub(crate) getter: Option<NumberSource>,
    pub(crate) on_input: Option<NumberCallback>,
    pub(crate) on_change: Option<NumberCallback>,
    pub(crate) poll_interval_ms: Option<u32>,
}

impl RangeInput {
    #[must_use]
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            getter: None,
            on_input: None,
            on_change: None,
            poll_interval_ms: None,
        }
    }

    #[must_use]
    pub fn with_getter(mut self, getter: impl Fn() -> f64 + 'static) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    #[must_use]
    pub fn on_input(mut self, callback: impl Fn(f64) + 'static) -> Self {
        self.on_input = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(f64) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    #[must_use]
    pub const fn bounds(&self) -> (f64, f64, f64) {
        (self.min, self.max, self.step)
    }

    /// Value shown before any getter is consulted.
    pub(crate) fn initial_value(&self) -> f64 {
        match &self.getter {
            Some(getter) => getter(),
            None => 0.0_f64.max(self.min).min(self.max),
        }
    }
}

impl Default for RangeInput {
    fn default() -> Self {
        Self::new(0.0, 100.0, 1.0)
    }
}

impl fmt::Debug for RangeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeInput")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("getter", &self.getter.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

/// Main axis of a [`Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "row" => Some(Self::Row),
            "column" => Some(Self::Column),
            _ => None,
        }
    }
}

/// Ordered composition of child widgets.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub(crate) children: Vec<Widget>,
    pub(crate) direction: FlexDirection,
}

impl Group {
    #[must_use]
    pub fn new(children: impl IntoIterator<Item = Widget>) -> Self {
        Self {
            children: children.into_iter().collect(),
            direction: FlexDirection::Row,
        }
    }

    /// Append one more child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_dir(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn children(&self) -> &[Widget] {
        &self.children
    }
}

/// Closed set of renderable widgets.
#[derive(Debug, Clone)]
pub enum Widget {
    Button(Button),
    ValueDisplay(ValueDisplay),
    TextInput(TextInput),
    NumberInput(NumberInput),
    RangeInput(RangeInput),
    Group(Group),
}

impl Widget {
    /// Variant name, used in logs and snapshots.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Button(_) => "button",
            Self::ValueDisplay(_) => "value_display",
            Self::TextInput(_) => "text_input",
            Self::NumberInput(_) => "number_input",
            Self::RangeInput(_) => "range_input",
            Self::Group(_) => "group",
        }
    }
}

macro_rules! widget_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Widget {
                fn from(widget: $variant) -> Self {
                    Self::$variant(widget)
                }
            }

            impl IntoWidget for $variant {
                fn into_widget(self) -> Option<Widget> {
                    Some(Widget::$variant(self))
                }
            }
        )*
    };
}

/// Argument accepted by registration calls: a widget, or `None` to delete.
pub trait IntoWidget {
    fn into_widget(self) -> Option<Widget>;
}

widget_from!(Button, ValueDisplay, TextInput, NumberInput, RangeInput, Group);

impl<T: 'static> From<ValueDisplayBuilder<T>> for Widget {
    fn from(builder: ValueDisplayBuilder<T>) -> Self {
        Self::ValueDisplay(builder.build())
    }
}

impl<T: 'static> IntoWidget for ValueDisplayBuilder<T> {
    fn into_widget(self) -> Option<Widget> {
        Some(self.into())
    }
}

impl IntoWidget for Widget {
    fn into_widget(self) -> Option<Widget> {
        Some(self)
    }
}

impl IntoWidget for Option<Widget> {
    fn into_widget(self) -> Option<Widget> {
        self
    }
}

#[must_use]
pub fn button(label: impl Into<String>) -> Button {
    Button::new(label)
}

/// Display the result of `getter`, stringified with `Debug` by default.
pub fn value_display<T>(getter: impl Fn() -> T + 'static) -> ValueDisplayBuilder<T>
where
    T: fmt::Debug + 'static,
{
    ValueDisplayBuilder::with_stringify(getter, |value| format!("{value:?}"))
}

#[must_use]
pub fn text_input() -> TextInput {
    TextInput::new()
}

#[must_use]
pub fn number_input() -> NumberInput {
    NumberInput::new()
}

#[must_use]
pub fn range_input(min: f64, max: f64, step: f64) -> RangeInput {
    RangeInput::new(min, max, step)
}

#[must_use]
pub fn group(children: impl IntoIterator<Item = Widget>) -> Group {
    Group::new(children)
}

/// Alias of [`text_input`].
#[must_use]
pub fn text() -> TextInput {
    text_input()
}

/// Alias of [`text_input`].
#[must_use]
pub fn input() -> TextInput {
    text_input()
}

/// Alias of [`number_input`].
#[must_use]
pub fn number() -> NumberInput {
    number_input()
}

/// Alias of [`range_input`].
#[must_use]
pub fn range(min: f64, max: f64, step: f64) -> RangeInput {
    range_input(min, max, step)
}

/// Alias of [`range_input`].
#[must_use]
pub fn slider(min: f64, max: f64, step: f64) -> RangeInput {
    range_input(min, max, step)
}

/// Coerce input text to a number the way the browser's `Number()` does:
/// whitespace is ignored, empty text is `0`, anything unparsable is `NaN`.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return radix_digits(digits, radix);
        }
    }
    // Rust accepts `inf`/`nan` spellings the browser rejects.
    if text
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// Prefixed integer literal; values past `u64` keep growing as floats.
fn radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN)
}

/// Format a number the way the browser stringifies it: `NaN`, `Infinity`,
/// integral values without a fraction, and exponent notation (`1e+21`,
/// `1e-7`) outside `[1e-6, 1e21)`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value == f64::INFINITY {
        String::from("Infinity")
    } else if value == f64::NEG_INFINITY {
        String::from("-Infinity")
    } else if value == 0.0 {
        String::from("0")
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        value.to_string()
    }
}
