#![forbid(unsafe_code)]

//! Turning widget descriptions into live nodes.
//!
//! Every render produces an autonomous [`LiveWidget`]: its own element tree,
//! its own listeners and its own poll timer. All of them are owned by the
//! live widget as host guards, so [`LiveWidget::dispose`] (or simply dropping
//! the value) unregisters listeners and cancels timers deterministically.
//!
//! Callbacks hold a `Weak` reference to the host; a live widget never keeps
//! its host alive.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::HostResult;
use crate::host::{DomEvent, DomHost, ElementKind};
use crate::style;
use crate::widget::{
    Button, Group, NumberCallback, NumberInput, NumberSource, PollPolicy, RangeInput,
    TextCallback, TextInput, TextSource, ValueDisplay, Widget, coerce_number, format_number,
};

/// Label of the refresh button of manual value displays.
pub const UPDATE_BUTTON_LABEL: &str = "Update";

/// A rendered widget and the registrations keeping it live.
pub struct LiveWidget<H: DomHost> {
    node: H::Node,
    listeners: Vec<H::Listener>,
    timers: Vec<H::Timer>,
    children: Vec<LiveWidget<H>>,
}

impl<H: DomHost> LiveWidget<H> {
    fn new(node: H::Node) -> Self {
        Self {
            node,
            listeners: Vec::new(),
            timers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Root element of this widget.
    pub fn node(&self) -> &H::Node {
        &self.node
    }

    /// Running poll timers, children included.
    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.timers.len() + self.children.iter().map(Self::timer_count).sum::<usize>()
    }

    /// Registered listeners, children included.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.children.iter().map(Self::listener_count).sum::<usize>()
    }

    /// Cancel every timer and unregister every listener.
    ///
    /// The element tree itself is left alone; detaching it is the caller's
    /// job. Idempotent.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.listeners.clear();
        for child in &mut self.children {
            child.dispose();
        }
    }

    fn listen(
        &mut self,
        host: &Rc<H>,
        node: &H::Node,
        event: DomEvent,
        handler: impl FnMut() + 'static,
    ) -> HostResult<()> {
        let listener = host.listen(node, event, Box::new(handler))?;
        self.listeners.push(listener);
        Ok(())
    }
}

impl<H: DomHost> core::fmt::Debug for LiveWidget<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LiveWidget")
            .field("node", &self.node)
            .field("listeners", &self.listeners.len())
            .field("timers", &self.timers.len())
            .field("children", &self.children)
            .finish()
    }
}

/// Tracks whether an input currently has focus.
#[derive(Debug, Clone, Default)]
pub struct FocusGate(Rc<Cell<bool>>);

impl FocusGate {
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.0.get()
    }

    fn set(&self, focused: bool) {
        self.0.set(focused);
    }
}

impl Widget {
    /// Render a fresh live node.
    ///
    /// `default_poll_ms` applies to widgets that did not pick an interval.
    /// Each widget starts its poll timer as soon as its own node is built.
    /// If a later part of the tree fails, the guards already created are
    /// dropped and those timers stop.
    pub fn render<H: DomHost>(
        &self,
        host: &Rc<H>,
        default_poll_ms: u32,
    ) -> HostResult<LiveWidget<H>> {
        let live = match self {
            Self::Button(button) => render_button(host, button),
            Self::ValueDisplay(display) => render_value_display(host, display, default_poll_ms),
            Self::TextInput(input) => render_text_input(host, input, default_poll_ms),
            Self::NumberInput(input) => render_number_input(host, input, default_poll_ms),
            Self::RangeInput(range) => render_range_input(host, range, default_poll_ms),
            Self::Group(group) => render_group(host, group, default_poll_ms),
        }?;
        tracing::trace!(
            target: "dbgui::widget",
            kind = self.kind_name(),
            timers = live.timer_count(),
            listeners = live.listener_count(),
            "widget rendered"
        );
        Ok(live)
    }
}

fn render_button<H: DomHost>(host: &Rc<H>, button: &Button) -> HostResult<LiveWidget<H>> {
    let node = host.create(ElementKind::Button)?;
    host.set_style(&node, style::button().as_str())?;
    host.set_text(&node, &button.label);
    let mut live = LiveWidget::new(node.clone());
    if let Some(on_click) = button.on_click.clone() {
        live.listen(host, &node, DomEvent::Click, move || on_click())?;
    }
    Ok(live)
}

fn render_value_display<H: DomHost>(
    host: &Rc<H>,
    display: &ValueDisplay,
    default_poll_ms: u32,
) -> HostResult<LiveWidget<H>> {
    let container = host.create(ElementKind::Div)?;
    host.set_style(&container, style::value_display().as_str())?;
    let mut live = LiveWidget::new(container.clone());

    match display.poll.unwrap_or(PollPolicy::Interval(default_poll_ms)) {
        PollPolicy::Manual => {
            let value_el = host.create(ElementKind::Div)?;
            host.set_text(&value_el, &(display.sample)());
            let update_btn = host.create(ElementKind::Button)?;
            host.set_style(&update_btn, style::button().as_str())?;
            host.set_text(&update_btn, UPDATE_BUTTON_LABEL);
            host.append_child(&container, &value_el)?;
            host.append_child(&container, &update_btn)?;

            let weak = Rc::downgrade(host);
            let sample = display.sample.clone();
            live.listen(host, &update_btn, DomEvent::Click, move || {
                let Some(host) = weak.upgrade() else {
                    return;
                };
                host.set_text(&value_el, &sample());
            })?;
        }
        PollPolicy::Interval(period_ms) => {
            let shown = sample_into(host.as_ref(), &container, &display.sample);
            let shown = Rc::new(RefCell::new(shown));
            let weak = Rc::downgrade(host);
            let sample = display.sample.clone();
            let timer = host.set_interval(
                period_ms,
                Box::new(move || {
                    let Some(host) = weak.upgrade() else {
                        return;
                    };
                    let next = sample();
                    let mut shown = shown.borrow_mut();
                    if *shown != next {
                        host.set_text(&container, &next);
                        *shown = next;
                    }
                    tracing::trace!(target: "dbgui::widget", kind = "value_display", "poll tick");
                }),
            )?;
            live.timers.push(timer);
        }
    }
    Ok(live)
}

fn sample_into<H: DomHost>(host: &H, node: &H::Node, sample: &TextSource) -> String {
    let text = sample();
    host.set_text(node, &text);
    text
}

/// Wire focus tracking, edit callbacks and the optional refresh timer of one
/// `<input>`.
struct InputBinding<F> {
    on_input: Option<F>,
    on_change: Option<F>,
    refresh: Option<TextSource>,
    period_ms: u32,
}

impl<F: Clone + 'static> InputBinding<F> {
    fn install<H: DomHost>(
        self,
        host: &Rc<H>,
        live: &mut LiveWidget<H>,
        input: &H::Node,
        emit: fn(&F, &str),
    ) -> HostResult<()> {
        let focus = FocusGate::default();
        let gate = focus.clone();
        live.listen(host, input, DomEvent::Focus, move || gate.set(true))?;
        let gate = focus.clone();
        live.listen(host, input, DomEvent::Blur, move || gate.set(false))?;

        for (event, callback) in [
            (DomEvent::Input, self.on_input),
            (DomEvent::Change, self.on_change),
        ] {
            let Some(callback) = callback else {
                continue;
            };
            let weak = Rc::downgrade(host);
            let node = input.clone();
            live.listen(host, input, event, move || {
                let Some(host) = weak.upgrade() else {
                    return;
                };
                let value = host.input_value(&node);
                emit(&callback, &value);
            })?;
        }

        // Inputs without a getter are their own source of truth.
        if let Some(refresh) = self.refresh {
            let weak = Rc::downgrade(host);
            let node = input.clone();
            let timer = host.set_interval(
                self.period_ms,
                Box::new(move || {
                    if focus.is_focused() {
                        return;
                    }
                    let Some(host) = weak.upgrade() else {
                        return;
                    };
                    let next = refresh();
                    if host.input_value(&node) != next {
                        host.set_input_value(&node, &next);
                    }
                }),
            )?;
            live.timers.push(timer);
        }
        Ok(())
    }
}

fn emit_text(callback: &TextCallback, value: &str) {
    callback(value);
}

fn emit_number(callback: &NumberCallback, value: &str) {
    callback(coerce_number(value));
}

fn number_text(getter: &NumberSource) -> TextSource {
    let getter = Rc::clone(getter);
    Rc::new(move || format_number(getter()))
}

fn render_text_input<H: DomHost>(
    host: &Rc<H>,
    input: &TextInput,
    default_poll_ms: u32,
) -> HostResult<LiveWidget<H>> {
    let node = host.create(ElementKind::TextInput)?;
    host.set_style(&node, style::text_field().as_str())?;
    if let Some(getter) = &input.getter {
        host.set_input_value(&node, &getter());
    }
    let mut live = LiveWidget::new(node.clone());
    InputBinding {
        on_input: input.on_input.clone(),
        on_change: input.on_change.clone(),
        refresh: input.getter.clone(),
        period_ms: input.poll_interval_ms.unwrap_or(default_poll_ms),
    }
    .install(host, &mut live, &node, emit_text)?;
    Ok(live)
}

fn render_number_input<H: DomHost>(
    host: &Rc<H>,
    input: &NumberInput,
    default_poll_ms: u32,
) -> HostResult<LiveWidget<H>> {
    let node = host.create(ElementKind::NumberInput)?;
    host.set_style(&node, style::text_field().as_str())?;
    let initial = input.getter.as_ref().map_or(0.0, |getter| getter());
    host.set_input_value(&node, &format_number(initial));
    let mut live = LiveWidget::new(node.clone());
    InputBinding {
        on_input: input.on_input.clone(),
        on_change: input.on_change.clone(),
        refresh: input.getter.as_ref().map(number_text),
        period_ms: input.poll_interval_ms.unwrap_or(default_poll_ms),
    }
    .install(host, &mut live, &node, emit_number)?;
    Ok(live)
}

fn render_range_input<H: DomHost>(
    host: &Rc<H>,
    range: &RangeInput,
    default_poll_ms: u32,
) -> HostResult<LiveWidget<H>> {
    let container = host.create(ElementKind::Div)?;
    host.set_style(&container, style::slider_row().as_str())?;

    let min_el = host.create(ElementKind::Div)?;
    host.set_text(&min_el, &format_number(range.min));
    let max_el = host.create(ElementKind::Div)?;
    host.set_text(&max_el, &format_number(range.max));

    let slider = host.create(ElementKind::RangeInput)?;
    host.set_style(&slider, style::slider().as_str())?;
    host.set_attribute(&slider, "min", &format_number(range.min))?;
    host.set_attribute(&slider, "max", &format_number(range.max))?;
    host.set_attribute(&slider, "step", &format_number(range.step))?;
    host.set_input_value(&slider, &format_number(range.initial_value()));

    host.append_child(&container, &min_el)?;
    host.append_child(&container, &slider)?;
    host.append_child(&container, &max_el)?;

    let mut live = LiveWidget::new(container);
    InputBinding {
        on_input: range.on_input.clone(),
        on_change: range.on_change.clone(),
        refresh: range.getter.as_ref().map(number_text),
        period_ms: range.poll_interval_ms.unwrap_or(default_poll_ms),
    }
    .install(host, &mut live, &slider, emit_number)?;
    Ok(live)
}

fn render_group<H: DomHost>(
    host: &Rc<H>,
    group: &Group,
    default_poll_ms: u32,
) -> HostResult<LiveWidget<H>> {
    let node = host.create(ElementKind::Div)?;
    host.set_style(&node, style::group(group.direction.as_css()).as_str())?;
    let mut live = LiveWidget::new(node.clone());
    for child in &group.children {
        let child = child.render(host, default_poll_ms)?;
        host.append_child(&node, child.node())?;
        live.children.push(child);
    }
    Ok(live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::MemoryHost;
    use crate::widget::{button, number_input, slider, text_input, value_display};

    fn host() -> Rc<MemoryHost> {
        Rc::new(MemoryHost::default())
    }

    #[test]
    fn button_click_runs_callback() {
        let host = host();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let widget: Widget = button("Go").on_click(move || counter.set(counter.get() + 1)).into();
        let live = widget.render(&host, 100).unwrap();
        assert_eq!(host.text(*live.node()), "Go");
        host.click(*live.node());
        host.click(*live.node());
        assert_eq!(clicks.get(), 2);
        assert_eq!(live.timer_count(), 0);
    }

    #[test]
    fn interval_display_follows_getter() {
        let host = host();
        let source = Rc::new(Cell::new(1));
        let getter = Rc::clone(&source);
        let widget: Widget = value_display(move || getter.get()).with_poll_interval(50).into();
        let live = widget.render(&host, 100).unwrap();
        assert_eq!(host.text(*live.node()), "1");

        source.set(2);
        host.advance(49);
        assert_eq!(host.text(*live.node()), "1");
        host.advance(1);
        assert_eq!(host.text(*live.node()), "2");
    }

    #[test]
    fn manual_display_waits_for_update_button() {
        let host = host();
        let source = Rc::new(Cell::new(1));
        let getter = Rc::clone(&source);
        let widget: Widget = value_display(move || getter.get()).manual().into();
        let live = widget.render(&host, 100).unwrap();
        assert_eq!(live.timer_count(), 0);
        let [value_el, update_btn] = host.children(*live.node())[..] else {
            panic!("manual display has a value and a button");
        };
        assert_eq!(host.text(update_btn), UPDATE_BUTTON_LABEL);

        source.set(5);
        host.advance(10_000);
        assert_eq!(host.text(value_el), "1");
        host.click(update_btn);
        assert_eq!(host.text(value_el), "5");
    }

    #[test]
    fn focused_input_is_not_refreshed() {
        let host = host();
        let source = Rc::new(RefCell::new(String::from("a")));
        let getter = Rc::clone(&source);
        let widget: Widget = text_input().with_getter(move || getter.borrow().clone()).into();
        let live = widget.render(&host, 100).unwrap();
        let node = *live.node();
        assert_eq!(host.value(node), "a");

        host.focus(node);
        host.type_text(node, "typing");
        *source.borrow_mut() = String::from("b");
        host.advance(500);
        assert_eq!(host.value(node), "typing");

        host.blur(node);
        host.advance(100);
        assert_eq!(host.value(node), "b");
    }

    #[test]
    fn number_callbacks_receive_coerced_values() {
        let host = host();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let on_input = Rc::clone(&seen);
        let on_change = Rc::clone(&seen);
        let widget: Widget = number_input()
            .on_input(move |v| on_input.borrow_mut().push(v))
            .on_change(move |v| on_change.borrow_mut().push(v * 10.0))
            .into();
        let live = widget.render(&host, 100).unwrap();
        let node = *live.node();
        assert_eq!(host.value(node), "0");
        assert_eq!(live.timer_count(), 0);

        host.type_text(node, "4");
        host.commit(node);
        host.type_text(node, "x");
        let seen = seen.borrow();
        assert_eq!(seen[..2], [4.0, 40.0]);
        assert!(seen[2].is_nan());
    }

    #[test]
    fn range_renders_bounds_and_slider() {
        let host = host();
        let widget: Widget = slider(-1.0, 1.0, 0.5).with_getter(|| 0.5).into();
        let live = widget.render(&host, 100).unwrap();
        let [min_el, input, max_el] = host.children(*live.node())[..] else {
            panic!("range has three parts");
        };
        assert_eq!(host.text(min_el), "-1");
        assert_eq!(host.text(max_el), "1");
        assert_eq!(host.attribute(input, "step").as_deref(), Some("0.5"));
        assert_eq!(host.value(input), "0.5");
        assert_eq!(live.timer_count(), 1);
    }

    #[test]
    fn timers_start_during_render_and_stop_when_render_fails() {
        let host = host();
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        let display: Widget = value_display(move || {
            counter.set(counter.get() + 1);
            counter.get()
        })
        .into();
        let widget: Widget = crate::widget::group([display.clone(), button("late").into()]).into();

        host.fail_creates_after(2);
        let err = widget.render(&host, 100).err().expect("button create fails");
        assert_eq!(err.operation, "create");
        assert_eq!(ticks.get(), 1);
        assert_eq!(host.live_timer_count(), 0);
        host.allow_creates();

        let live = display.render(&host, 100).unwrap();
        assert_eq!(host.live_timer_count(), 1);
        assert_eq!(live.timer_count(), 1);
    }

    #[test]
    fn dispose_cancels_timers_and_listeners() {
        let host = host();
        let widget: Widget = crate::widget::group([
            value_display(|| 1).into(),
            text_input().with_getter(String::new).into(),
        ])
        .into();
        let mut live = widget.render(&host, 100).unwrap();
        assert_eq!(live.timer_count(), 2);
        assert_eq!(host.live_timer_count(), 2);
        assert_eq!(host.children(*live.node()).len(), 2);

        live.dispose();
        assert_eq!(live.timer_count(), 0);
        assert_eq!(host.live_timer_count(), 0);
        assert_eq!(host.live_listener_count(), 0);
        live.dispose();
    }

    #[test]
    fn each_render_is_independent() {
        let host = host();
        let widget: Widget = value_display(|| "x").into();
        let first = widget.render(&host, 100).unwrap();
        let second = widget.render(&host, 100).unwrap();
        assert_ne!(first.node(), second.node());
        drop(first);
        assert_eq!(host.live_timer_count(), 1);
        drop(second);
        assert_eq!(host.live_timer_count(), 0);
    }
}
