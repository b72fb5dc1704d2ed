//! Live-update lifecycle of rendered widgets, driven through the panel with
//! the in-memory host clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dbgui_core::host::ElementKind;
use dbgui_core::render::UPDATE_BUTTON_LABEL;
use dbgui_core::{
    MemoryHost, MemoryNode, Panel, PanelConfig, Widget, button, group, number_input, slider,
    text_input, value_display,
};
use pretty_assertions::assert_eq;

fn new_panel() -> (Rc<MemoryHost>, Panel<MemoryHost>) {
    let host = Rc::new(MemoryHost::default());
    let panel = Panel::new(Rc::clone(&host), PanelConfig::default()).unwrap();
    (host, panel)
}

fn row_widget(host: &MemoryHost, panel: &Panel<MemoryHost>, key: &str) -> MemoryNode {
    let row = *panel.uncategorized().get(key).unwrap().node();
    let wrapper = host.children(row)[1];
    host.children(wrapper)[0]
}

#[test]
fn interval_display_tracks_getter_within_one_period() {
    let (host, mut panel) = new_panel();
    let value = Rc::new(Cell::new(10));
    let source = Rc::clone(&value);
    panel
        .add("fps", value_display(move || source.get()).with_poll_interval(250))
        .unwrap();
    let node = row_widget(&host, &panel, "fps");
    assert_eq!(host.text(node), "10");

    value.set(11);
    host.advance(249);
    assert_eq!(host.text(node), "10");
    host.advance(1);
    assert_eq!(host.text(node), "11");
}

#[test]
fn manual_display_never_updates_on_its_own() {
    let (host, mut panel) = new_panel();
    let value = Rc::new(Cell::new(1));
    let source = Rc::clone(&value);
    panel
        .add("state", value_display(move || source.get()).manual())
        .unwrap();
    let node = row_widget(&host, &panel, "state");
    let update = host.find_by_kind(node, ElementKind::Button).unwrap();
    assert_eq!(host.text(update), UPDATE_BUTTON_LABEL);

    value.set(2);
    host.advance(60_000);
    assert_eq!(host.text_content(node), format!("1{UPDATE_BUTTON_LABEL}"));
    host.click(update);
    assert_eq!(host.text_content(node), format!("2{UPDATE_BUTTON_LABEL}"));
    assert_eq!(host.live_timer_count(), 0);
}

#[test]
fn focused_input_keeps_user_edit() {
    let (host, mut panel) = new_panel();
    let model = Rc::new(RefCell::new(String::from("title")));
    let getter = Rc::clone(&model);
    let setter = Rc::clone(&model);
    panel
        .add(
            "Value",
            text_input()
                .with_getter(move || getter.borrow().clone())
                .on_input(move |text| *setter.borrow_mut() = text.to_uppercase()),
        )
        .unwrap();
    let node = row_widget(&host, &panel, "Value");

    host.focus(node);
    host.type_text(node, "new");
    assert_eq!(*model.borrow(), "NEW");
    host.advance(1_000);
    assert_eq!(host.value(node), "new");

    host.blur(node);
    host.advance(100);
    assert_eq!(host.value(node), "NEW");
}

#[test]
fn focus_moving_to_another_input_releases_the_first() {
    let (host, mut panel) = new_panel();
    let a = Rc::new(Cell::new(1.0));
    let b = Rc::new(Cell::new(2.0));
    let (ga, gb) = (Rc::clone(&a), Rc::clone(&b));
    panel.add("a", number_input().with_getter(move || ga.get())).unwrap();
    panel.add("b", number_input().with_getter(move || gb.get())).unwrap();
    let (na, nb) = (row_widget(&host, &panel, "a"), row_widget(&host, &panel, "b"));

    host.focus(na);
    host.focus(nb);
    a.set(5.0);
    b.set(6.0);
    host.advance(100);
    assert_eq!(host.value(na), "5");
    assert_eq!(host.value(nb), "2");
}

#[test]
fn slider_coerces_and_reports_nan() {
    let (host, mut panel) = new_panel();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    panel
        .add("x", slider(-100.0, 100.0, 1.0).on_input(move |v| sink.borrow_mut().push(v)))
        .unwrap();
    let container = row_widget(&host, &panel, "x");
    let input = host.find_by_kind(container, ElementKind::RangeInput).unwrap();
    assert_eq!(host.value(input), "0");

    host.type_text(input, "42");
    host.type_text(input, "forty");
    let seen = seen.borrow();
    assert_eq!(seen[0], 42.0);
    assert!(seen[1].is_nan());
}

#[test]
fn replacing_a_key_tears_down_previous_timers() {
    let (host, mut panel) = new_panel();
    panel.add("k", value_display(|| 1)).unwrap();
    panel.add("k", value_display(|| 2)).unwrap();
    assert_eq!(host.live_timer_count(), 1);
    panel.add("k", button("done")).unwrap();
    assert_eq!(host.live_timer_count(), 0);
}

#[test]
fn removing_a_key_tears_down_group_children() {
    let (host, mut panel) = new_panel();
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    panel
        .add(
            "g",
            group([
                value_display(|| "a").into(),
                text_input().with_getter(String::new).into(),
                button("b").on_click(move || counter.set(counter.get() + 1)).into(),
            ]),
        )
        .unwrap();
    assert_eq!(host.live_timer_count(), 2);
    let group_node = row_widget(&host, &panel, "g");
    let btn = host.children(group_node)[2];

    panel.add("g", None::<Widget>).unwrap();
    assert_eq!(host.live_timer_count(), 0);
    assert_eq!(host.live_listener_count(), 0);
    host.click(btn);
    assert_eq!(clicks.get(), 0);
}

#[test]
fn hidden_panel_keeps_polling() {
    let (host, mut panel) = new_panel();
    let ticks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ticks);
    panel
        .add(
            "t",
            value_display(move || {
                counter.set(counter.get() + 1);
                counter.get()
            }),
        )
        .unwrap();
    panel.hide().unwrap();
    host.advance(300);
    assert_eq!(ticks.get(), 4);
}
