#![forbid(unsafe_code)]

//! Deterministic in-memory [`DomHost`].
//!
//! Design goals:
//! - **Host-driven time**: timers only fire inside [`MemoryHost::advance`].
//! - **Synthetic input**: clicks, typing, commits and focus changes are
//!   dispatched explicitly by the caller.
//! - **Inspectable**: tree shape, text, values, styles and attributes can be
//!   read back at any point.
//!
//! Handlers run with no internal borrow held, so they may call back into the
//! host (and into the panel that owns it).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{HostError, HostResult};
use crate::geometry::Viewport;
use crate::host::{DomEvent, DomHost, ElementKind, EventHandler, TimerTick};

/// Handle to an element owned by a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryNode(usize);

const BODY: MemoryNode = MemoryNode(0);

type SharedHandler = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Debug)]
struct NodeData {
    kind: ElementKind,
    parent: Option<MemoryNode>,
    children: Vec<MemoryNode>,
    text: String,
    value: String,
    style: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
}

impl NodeData {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            text: String::new(),
            value: String::new(),
            style: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }
}

struct ListenerSlot {
    node: MemoryNode,
    event: DomEvent,
    handler: SharedHandler,
    alive: Rc<Cell<bool>>,
}

struct TimerSlot {
    period_ms: u64,
    next_due_ms: u64,
    tick: SharedHandler,
    alive: Rc<Cell<bool>>,
}

struct MemoryDom {
    nodes: Vec<NodeData>,
    listeners: Vec<ListenerSlot>,
    timers: Vec<TimerSlot>,
    now_ms: u64,
    viewport: Viewport,
    focused: Option<MemoryNode>,
    create_budget: Option<usize>,
}

impl MemoryDom {
    fn data(&self, node: MemoryNode) -> HostResult<&NodeData> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| HostError::new("lookup", format!("unknown node {}", node.0)))
    }

    fn detach(&mut self, node: MemoryNode) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|data| data.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.retain(|child| *child != node);
        }
    }

    fn is_ancestor(&self, candidate: MemoryNode, node: MemoryNode) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.nodes.get(current.0).and_then(|data| data.parent);
        }
        false
    }

    fn insert_at(&mut self, parent: MemoryNode, child: MemoryNode, index: Option<usize>) -> HostResult<()> {
        self.data(parent)?;
        self.data(child)?;
        if self.is_ancestor(child, parent) {
            return Err(HostError::new(
                "insert",
                "HierarchyRequestError: child contains the parent",
            ));
        }
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    fn prune(&mut self) {
        self.listeners.retain(|slot| slot.alive.get());
        self.timers.retain(|slot| slot.alive.get());
    }
}

/// Listener guard for [`MemoryHost`].
#[derive(Debug)]
pub struct MemoryListener {
    alive: Rc<Cell<bool>>,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// Timer guard for [`MemoryHost`].
#[derive(Debug)]
pub struct MemoryTimer {
    alive: Rc<Cell<bool>>,
}

impl Drop for MemoryTimer {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// In-memory document with a manual millisecond clock.
pub struct MemoryHost {
    dom: RefCell<MemoryDom>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Viewport::new(1024.0, 768.0))
    }
}

impl MemoryHost {
    /// Create an empty document with the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            dom: RefCell::new(MemoryDom {
                nodes: vec![NodeData::new(ElementKind::Div)],
                listeners: Vec::new(),
                timers: Vec::new(),
                now_ms: 0,
                viewport,
                focused: None,
                create_budget: None,
            }),
        }
    }

    /// The document body.
    #[must_use]
    pub const fn body(&self) -> MemoryNode {
        BODY
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.dom.borrow_mut().viewport = viewport;
    }

    /// Milliseconds elapsed on the manual clock.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.dom.borrow().now_ms
    }

    /// Advance the clock by `ms`, firing every timer that comes due in
    /// chronological order (ties by registration order).
    pub fn advance(&self, ms: u64) {
        let target = self.dom.borrow().now_ms.saturating_add(ms);
        loop {
            let tick = {
                let mut dom = self.dom.borrow_mut();
                dom.prune();
                let next = dom
                    .timers
                    .iter_mut()
                    .filter(|slot| slot.next_due_ms <= target)
                    .min_by_key(|slot| slot.next_due_ms);
                let Some(slot) = next else {
                    break;
                };
                let due = slot.next_due_ms;
                slot.next_due_ms = due.saturating_add(slot.period_ms);
                let tick = Rc::clone(&slot.tick);
                dom.now_ms = due;
                tick
            };
            if let Ok(mut tick) = tick.try_borrow_mut() {
                (tick)();
            }
        }
        self.dom.borrow_mut().now_ms = target;
    }

    fn dispatch(&self, node: MemoryNode, event: DomEvent) {
        let handlers: Vec<(SharedHandler, Rc<Cell<bool>>)> = {
            let mut dom = self.dom.borrow_mut();
            dom.prune();
            dom.listeners
                .iter()
                .filter(|slot| slot.node == node && slot.event == event)
                .map(|slot| (Rc::clone(&slot.handler), Rc::clone(&slot.alive)))
                .collect()
        };
        for (handler, alive) in handlers {
            // An earlier handler may have torn this one down.
            if !alive.get() {
                continue;
            }
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (handler)();
            }
        }
    }

    /// Dispatch a click.
    pub fn click(&self, node: MemoryNode) {
        self.dispatch(node, DomEvent::Click);
    }

    /// Replace an input's value as if typed and dispatch `input`.
    pub fn type_text(&self, node: MemoryNode, text: &str) {
        self.set_input_value(&node, text);
        self.dispatch(node, DomEvent::Input);
    }

    /// Dispatch `change` for the current value.
    pub fn commit(&self, node: MemoryNode) {
        self.dispatch(node, DomEvent::Change);
    }

    /// Move focus to `node`, blurring the previously focused element.
    pub fn focus(&self, node: MemoryNode) {
        let previous = self.dom.borrow_mut().focused.replace(node);
        match previous {
            Some(previous) if previous == node => return,
            Some(previous) => self.dispatch(previous, DomEvent::Blur),
            None => {}
        }
        self.dispatch(node, DomEvent::Focus);
    }

    /// Remove focus from `node` if it has it.
    pub fn blur(&self, node: MemoryNode) {
        let had_focus = {
            let mut dom = self.dom.borrow_mut();
            if dom.focused == Some(node) {
                dom.focused = None;
                true
            } else {
                false
            }
        };
        if had_focus {
            self.dispatch(node, DomEvent::Blur);
        }
    }

    #[must_use]
    pub fn focused(&self) -> Option<MemoryNode> {
        self.dom.borrow().focused
    }

    #[must_use]
    pub fn kind(&self, node: MemoryNode) -> Option<ElementKind> {
        self.dom.borrow().nodes.get(node.0).map(|data| data.kind)
    }

    /// Own text of `node` (not including descendants).
    #[must_use]
    pub fn text(&self, node: MemoryNode) -> String {
        self.dom
            .borrow()
            .nodes
            .get(node.0)
            .map(|data| data.text.clone())
            .unwrap_or_default()
    }

    /// Concatenated text of `node` and all descendants, depth first.
    #[must_use]
    pub fn text_content(&self, node: MemoryNode) -> String {
        fn walk(dom: &MemoryDom, node: MemoryNode, out: &mut String) {
            let Some(data) = dom.nodes.get(node.0) else {
                return;
            };
            out.push_str(&data.text);
            for child in &data.children {
                walk(dom, *child, out);
            }
        }
        let mut out = String::new();
        walk(&self.dom.borrow(), node, &mut out);
        out
    }

    #[must_use]
    pub fn value(&self, node: MemoryNode) -> String {
        self.input_value(&node)
    }

    #[must_use]
    pub fn children(&self, node: MemoryNode) -> Vec<MemoryNode> {
        self.dom
            .borrow()
            .nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, node: MemoryNode) -> Option<MemoryNode> {
        self.dom.borrow().nodes.get(node.0).and_then(|data| data.parent)
    }

    /// Whether `node` is connected to the body.
    #[must_use]
    pub fn is_connected(&self, node: MemoryNode) -> bool {
        self.dom.borrow().is_ancestor(BODY, node)
    }

    #[must_use]
    pub fn style_property(&self, node: MemoryNode, name: &str) -> Option<String> {
        self.dom
            .borrow()
            .nodes
            .get(node.0)
            .and_then(|data| data.style.get(name).cloned())
    }

    #[must_use]
    pub fn attribute(&self, node: MemoryNode, name: &str) -> Option<String> {
        self.dom
            .borrow()
            .nodes
            .get(node.0)
            .and_then(|data| data.attributes.get(name).cloned())
    }

    /// First descendant of `root` (depth first, `root` included) whose
    /// attribute `name` equals `value`.
    #[must_use]
    pub fn find_by_attribute(&self, root: MemoryNode, name: &str, value: &str) -> Option<MemoryNode> {
        let dom = self.dom.borrow();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let data = dom.nodes.get(node.0)?;
            if data.attributes.get(name).map(String::as_str) == Some(value) {
                return Some(node);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        None
    }

    /// First descendant of `root` (depth first, `root` included) of `kind`.
    #[must_use]
    pub fn find_by_kind(&self, root: MemoryNode, kind: ElementKind) -> Option<MemoryNode> {
        let dom = self.dom.borrow();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let data = dom.nodes.get(node.0)?;
            if data.kind == kind {
                return Some(node);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        None
    }

    /// Timers that have not been cancelled.
    #[must_use]
    pub fn live_timer_count(&self) -> usize {
        self.dom
            .borrow()
            .timers
            .iter()
            .filter(|slot| slot.alive.get())
            .count()
    }

    /// Let `count` more elements be created, then fail every `create` until
    /// [`Self::allow_creates`].
    pub fn fail_creates_after(&self, count: usize) {
        self.dom.borrow_mut().create_budget = Some(count);
    }

    pub fn allow_creates(&self) {
        self.dom.borrow_mut().create_budget = None;
    }

    /// Listeners that have not been unregistered.
    #[must_use]
    pub fn live_listener_count(&self) -> usize {
        self.dom
            .borrow()
            .listeners
            .iter()
            .filter(|slot| slot.alive.get())
            .count()
    }
}

impl DomHost for MemoryHost {
    type Node = MemoryNode;
    type Listener = MemoryListener;
    type Timer = MemoryTimer;

    fn create(&self, kind: ElementKind) -> HostResult<MemoryNode> {
        let mut dom = self.dom.borrow_mut();
        match dom.create_budget {
            Some(0) => return Err(HostError::new("create", "element creation disabled")),
            Some(left) => dom.create_budget = Some(left - 1),
            None => {}
        }
        let node = MemoryNode(dom.nodes.len());
        let mut data = NodeData::new(kind);
        if let Some(input_type) = kind.input_type() {
            data.attributes.insert("type".to_string(), input_type.to_string());
        }
        dom.nodes.push(data);
        Ok(node)
    }

    fn set_style(&self, node: &MemoryNode, css: &str) -> HostResult<()> {
        let mut dom = self.dom.borrow_mut();
        dom.data(*node)?;
        let style = &mut dom.nodes[node.0].style;
        style.clear();
        for declaration in css.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                style.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(())
    }

    fn set_style_property(&self, node: &MemoryNode, name: &str, value: &str) -> HostResult<()> {
        let mut dom = self.dom.borrow_mut();
        dom.data(*node)?;
        dom.nodes[node.0]
            .style
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) -> HostResult<()> {
        let mut dom = self.dom.borrow_mut();
        dom.data(*node)?;
        dom.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&self, node: &MemoryNode, text: &str) {
        let mut dom = self.dom.borrow_mut();
        let Some(children) = dom.nodes.get(node.0).map(|data| data.children.clone()) else {
            return;
        };
        for child in children {
            dom.detach(child);
        }
        dom.nodes[node.0].text = text.to_string();
    }

    fn input_value(&self, node: &MemoryNode) -> String {
        self.dom
            .borrow()
            .nodes
            .get(node.0)
            .map(|data| data.value.clone())
            .unwrap_or_default()
    }

    fn set_input_value(&self, node: &MemoryNode, value: &str) {
        if let Some(data) = self.dom.borrow_mut().nodes.get_mut(node.0) {
            data.value = value.to_string();
        }
    }

    fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) -> HostResult<()> {
        self.dom.borrow_mut().insert_at(*parent, *child, None)
    }

    fn insert_before(
        &self,
        parent: &MemoryNode,
        child: &MemoryNode,
        reference: &MemoryNode,
    ) -> HostResult<()> {
        let mut dom = self.dom.borrow_mut();
        if dom.data(*reference)?.parent != Some(*parent) {
            return Err(HostError::new(
                "insert_before",
                "NotFoundError: reference is not a child of parent",
            ));
        }
        dom.detach(*child);
        let index = dom.nodes[parent.0]
            .children
            .iter()
            .position(|node| node == reference);
        dom.insert_at(*parent, *child, index)
    }

    fn replace_with(&self, old: &MemoryNode, new: &MemoryNode) -> HostResult<()> {
        let mut dom = self.dom.borrow_mut();
        let Some(parent) = dom.data(*old)?.parent else {
            return Err(HostError::new("replace_with", "node has no parent"));
        };
        dom.detach(*new);
        let index = dom.nodes[parent.0]
            .children
            .iter()
            .position(|node| node == old);
        dom.insert_at(parent, *new, index)?;
        dom.detach(*old);
        Ok(())
    }

    fn remove(&self, node: &MemoryNode) {
        let mut dom = self.dom.borrow_mut();
        dom.detach(*node);
        if dom.focused.is_some_and(|focused| dom.is_ancestor(*node, focused)) {
            dom.focused = None;
        }
    }

    fn append_to_body(&self, node: &MemoryNode) -> HostResult<()> {
        self.append_child(&BODY, node)
    }

    fn viewport(&self) -> Viewport {
        self.dom.borrow().viewport
    }

    fn listen(
        &self,
        node: &MemoryNode,
        event: DomEvent,
        handler: EventHandler,
    ) -> HostResult<MemoryListener> {
        let mut dom = self.dom.borrow_mut();
        dom.data(*node)?;
        let alive = Rc::new(Cell::new(true));
        dom.listeners.push(ListenerSlot {
            node: *node,
            event,
            handler: Rc::new(RefCell::new(handler)),
            alive: Rc::clone(&alive),
        });
        Ok(MemoryListener { alive })
    }

    fn set_interval(&self, period_ms: u32, tick: TimerTick) -> HostResult<MemoryTimer> {
        let mut dom = self.dom.borrow_mut();
        // Browsers clamp non-positive delays to a minimum tick.
        let period_ms = u64::from(period_ms.max(1));
        let alive = Rc::new(Cell::new(true));
        let next_due_ms = dom.now_ms.saturating_add(period_ms);
        dom.timers.push(TimerSlot {
            period_ms,
            next_due_ms,
            tick: Rc::new(RefCell::new(tick)),
            alive: Rc::clone(&alive),
        });
        Ok(MemoryTimer { alive })
    }
}
