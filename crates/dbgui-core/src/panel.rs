#![forbid(unsafe_code)]

//! The panel façade.
//!
//! [`Panel`] owns the whole state of one debug overlay: the chrome elements,
//! the geometry and its drag machine, the uncategorised bucket and the
//! category directory. It is an ordinary value; whoever drives the document
//! lifecycle (the wasm binding, or a test) owns it and passes it around
//! explicitly.
//!
//! Registration calls are total. `None` deletes, an existing key is
//! replaced in place, absent keys are ignored. The only errors are host
//! failures.
//!
//! Registration from inside a widget's own callback must wait until the
//! current call returns; the panel is not reentrant.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryDirectory, WidgetBucket};
use crate::config::PanelConfig;
use crate::drag::{PanelDrag, PanelDragEffect};
use crate::error::Result;
use crate::geometry::{PanelGeometry, PanelRect, ResizeHandle};
use crate::host::{DomHost, ElementKind};
use crate::style::{self, px_value};
use crate::widget::IntoWidget;

/// Attribute naming the direction of a resize handle element.
pub const HANDLE_ATTRIBUTE: &str = "data-handle";

struct Chrome<H: DomHost> {
    container: H::Node,
    contents: H::Node,
    handles: Vec<(ResizeHandle, H::Node)>,
}

/// One debug overlay.
pub struct Panel<H: DomHost> {
    host: Rc<H>,
    config: PanelConfig,
    chrome: Chrome<H>,
    geometry: PanelGeometry,
    drag: PanelDrag,
    uncategorized: WidgetBucket<H>,
    categories: CategoryDirectory<H>,
    visible: bool,
    attached: bool,
}

impl<H: DomHost> Panel<H> {
    /// Build the panel elements, sized from the current viewport. Nothing
    /// is attached to the document until [`Self::attach`].
    pub fn new(host: Rc<H>, config: PanelConfig) -> Result<Self> {
        let geometry = PanelGeometry::initial(host.viewport(), config.screen_padding_px);
        let rect = geometry.rect();

        let container = host.create(ElementKind::Div)?;
        host.set_style(
            &container,
            style::container(&rect, config.handle_width_px).as_str(),
        )?;

        let contents = host.create(ElementKind::Div)?;
        host.set_style(&contents, style::contents(config.font_size_px).as_str())?;
        host.append_child(&container, &contents)?;

        let mut handles = Vec::with_capacity(ResizeHandle::ALL.len());
        for handle in ResizeHandle::ALL {
            let node = host.create(ElementKind::Div)?;
            host.set_style(&node, style::handle(handle).as_str())?;
            host.set_attribute(&node, HANDLE_ATTRIBUTE, handle.css_name())?;
            host.append_child(&container, &node)?;
            handles.push((handle, node));
        }

        let uncategorized_el = host.create(ElementKind::Div)?;
        host.set_style(&uncategorized_el, style::uncategorized().as_str())?;
        let categories_el = host.create(ElementKind::Div)?;
        host.set_style(&categories_el, style::categories().as_str())?;
        host.append_child(&contents, &uncategorized_el)?;
        host.append_child(&contents, &categories_el)?;

        tracing::debug!(
            target: "dbgui::panel",
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            font_size_px = config.font_size_px,
            "panel created"
        );

        Ok(Self {
            host,
            config,
            chrome: Chrome {
                container,
                contents,
                handles,
            },
            geometry,
            drag: PanelDrag::new(),
            uncategorized: WidgetBucket::new(uncategorized_el),
            categories: CategoryDirectory::new(categories_el),
            visible: true,
            attached: false,
        })
    }

    /// Append the panel to the document body. Returns `false` if it was
    /// already attached.
    pub fn attach(&mut self) -> Result<bool> {
        if self.attached {
            return Ok(false);
        }
        self.host.append_to_body(&self.chrome.container)?;
        self.attached = true;
        tracing::debug!(target: "dbgui::panel", "panel attached");
        Ok(true)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Register `widget` under `key` in the uncategorised bucket; `None`
    /// removes the key.
    pub fn add(&mut self, key: &str, widget: impl IntoWidget) -> Result<&mut Self> {
        self.uncategorized
            .set(&self.host, &self.config, key, widget.into_widget())?;
        Ok(self)
    }

    /// Same as `add(key, None)`.
    pub fn remove(&mut self, key: &str) -> Result<&mut Self> {
        self.uncategorized.set(&self.host, &self.config, key, None)?;
        Ok(self)
    }

    /// Handle to the category `name`, created on first use.
    pub fn in_category(&mut self, name: &str) -> Result<CategoryHandle<'_, H>> {
        self.categories.category_for(&self.host, name)?;
        Ok(CategoryHandle {
            panel: self,
            name: name.to_string(),
        })
    }

    /// Sugar for `in_category(category)?.add(key, widget)`.
    pub fn add_in(
        &mut self,
        category: &str,
        key: &str,
        widget: impl IntoWidget,
    ) -> Result<&mut Self> {
        let widget = widget.into_widget();
        let category = self.categories.category_for(&self.host, category)?;
        category
            .bucket_mut()
            .set(&self.host, &self.config, key, widget)?;
        Ok(self)
    }

    pub fn show(&mut self) -> Result<()> {
        self.host
            .set_style_property(&self.chrome.container, "display", "grid")?;
        self.visible = true;
        tracing::debug!(target: "dbgui::panel", "panel shown");
        Ok(())
    }

    /// Hide without touching registered widgets (their timers keep running).
    pub fn hide(&mut self) -> Result<()> {
        self.host
            .set_style_property(&self.chrome.container, "display", "none")?;
        self.visible = false;
        tracing::debug!(target: "dbgui::panel", "panel hidden");
        Ok(())
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Uncategorised keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.uncategorized.keys()
    }

    /// Category names in display order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.names()
    }

    /// Keys of category `name`; `None` if it was never created.
    #[must_use]
    pub fn category_keys(&self, name: &str) -> Option<Vec<&str>> {
        self.categories
            .get(name)
            .map(|category| category.bucket().keys().collect())
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category<H>> {
        self.categories.get(name)
    }

    #[must_use]
    pub fn uncategorized(&self) -> &WidgetBucket<H> {
        &self.uncategorized
    }

    #[must_use]
    pub fn rect(&self) -> PanelRect {
        self.geometry.rect()
    }

    #[must_use]
    pub fn drag(&self) -> &PanelDrag {
        &self.drag
    }

    /// Pointer pressed on a resize handle.
    pub fn begin_resize(&mut self, handle: ResizeHandle, pointer_id: i32) -> PanelDragEffect {
        let effect = self.drag.pointer_down(handle, pointer_id);
        tracing::trace!(target: "dbgui::panel", ?effect, "resize pointer down");
        effect
    }

    /// Pointer moved anywhere in the document.
    ///
    /// Both axes are applied before the new rectangle is pushed to the
    /// elements.
    pub fn pointer_move(&mut self, pointer_id: i32, dx: f64, dy: f64) -> Result<PanelDragEffect> {
        let viewport = self.host.viewport();
        let effect = self
            .drag
            .pointer_move(pointer_id, dx, dy, &mut self.geometry, viewport);
        if effect.geometry_changed() {
            self.push_geometry()?;
        }
        Ok(effect)
    }

    /// Pointer released anywhere in the document.
    pub fn end_resize(&mut self) -> PanelDragEffect {
        let effect = self.drag.pointer_up();
        tracing::trace!(target: "dbgui::panel", ?effect, "resize pointer up");
        effect
    }

    /// Re-clamp the rectangle after the viewport changed size.
    pub fn fit_viewport(&mut self) -> Result<bool> {
        let viewport = self.host.viewport();
        let changed = self.geometry.fit_viewport(viewport);
        if changed {
            tracing::debug!(
                target: "dbgui::geometry",
                viewport_width = viewport.width,
                viewport_height = viewport.height,
                "panel re-clamped to viewport"
            );
            self.push_geometry()?;
        }
        Ok(changed)
    }

    fn push_geometry(&self) -> Result<()> {
        let rect = self.geometry.rect();
        let node = &self.chrome.container;
        let width = format!("{}px", px_value(rect.width));
        let height = format!("{}px", px_value(rect.height));
        self.host
            .set_style_property(node, "left", &format!("{}px", px_value(rect.x)))?;
        self.host
            .set_style_property(node, "top", &format!("{}px", px_value(rect.y)))?;
        self.host.set_style_property(node, "width", &width)?;
        self.host.set_style_property(node, "max-width", &width)?;
        self.host.set_style_property(node, "height", &height)?;
        self.host.set_style_property(node, "max-height", &height)?;
        Ok(())
    }

    /// Resize handle elements with their directions.
    pub fn handle_nodes(&self) -> impl Iterator<Item = (ResizeHandle, &H::Node)> + '_ {
        self.chrome.handles.iter().map(|(handle, node)| (*handle, node))
    }

    /// Outer panel element.
    pub fn container(&self) -> &H::Node {
        &self.chrome.container
    }

    /// Scrollable area holding both buckets.
    pub fn contents(&self) -> &H::Node {
        &self.chrome.contents
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Serialisable view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        fn entries<H: DomHost>(bucket: &WidgetBucket<H>) -> Vec<WidgetSnapshot> {
            bucket
                .rows()
                .map(|row| WidgetSnapshot {
                    key: crate::registry::Keyed::key(row).to_string(),
                    kind: row.kind().to_string(),
                    timers: row.widget().timer_count(),
                })
                .collect()
        }
        PanelSnapshot {
            rect: self.geometry.rect(),
            visible: self.visible,
            attached: self.attached,
            widgets: entries(&self.uncategorized),
            categories: self
                .categories
                .iter()
                .map(|category| CategorySnapshot {
                    name: category.name().to_string(),
                    widgets: entries(category.bucket()),
                })
                .collect(),
        }
    }
}

/// Chainable registration handle for one category.
pub struct CategoryHandle<'a, H: DomHost> {
    panel: &'a mut Panel<H>,
    name: String,
}

impl<'a, H: DomHost> CategoryHandle<'a, H> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `widget` under `key` in this category; `None` removes it.
    pub fn add(self, key: &str, widget: impl IntoWidget) -> Result<Self> {
        let widget = widget.into_widget();
        let panel = &mut *self.panel;
        if let Some(category) = panel.categories.get_mut(&self.name) {
            category
                .bucket_mut()
                .set(&panel.host, &panel.config, key, widget)?;
        }
        Ok(self)
    }

    pub fn remove(self, key: &str) -> Result<Self> {
        self.add(key, None)
    }

    /// Keys of this category in display order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.panel.category_keys(&self.name).unwrap_or_default()
    }

    /// `<details>` element of this category.
    pub fn node(&self) -> Option<&H::Node> {
        self.panel.category(&self.name).map(Category::node)
    }

    /// Back to the panel.
    pub fn panel(self) -> &'a mut Panel<H> {
        self.panel
    }
}

/// Serialisable panel state, as exposed to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub rect: PanelRect,
    pub visible: bool,
    pub attached: bool,
    pub widgets: Vec<WidgetSnapshot>,
    pub categories: Vec<CategorySnapshot>,
}

impl PanelSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub key: String,
    pub kind: String,
    pub timers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub name: String,
    pub widgets: Vec<WidgetSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::memory_host::MemoryHost;
    use crate::widget::{Widget, button, text_input};

    fn panel() -> Panel<MemoryHost> {
        let host = Rc::new(MemoryHost::new(Viewport::new(1020.0, 620.0)));
        Panel::new(host, PanelConfig::default()).unwrap()
    }

    #[test]
    fn new_panel_is_detached_until_attach() {
        let mut panel = panel();
        let host = Rc::clone(panel.host());
        assert!(!host.is_connected(*panel.container()));
        assert!(panel.attach().unwrap());
        assert!(!panel.attach().unwrap());
        assert!(host.is_connected(*panel.container()));
        assert_eq!(host.children(host.body()).len(), 1);
    }

    #[test]
    fn chrome_has_eight_handles_and_initial_rect() {
        let panel = panel();
        let host = panel.host();
        assert_eq!(panel.handle_nodes().count(), 8);
        let (handle, node) = panel.handle_nodes().nth(3).unwrap();
        assert_eq!(handle, ResizeHandle::SouthEast);
        assert_eq!(host.attribute(*node, HANDLE_ATTRIBUTE).as_deref(), Some("se"));
        assert_eq!(
            host.style_property(*panel.container(), "width").as_deref(),
            Some("400px")
        );
        assert_eq!(
            host.style_property(*panel.container(), "height").as_deref(),
            Some("360px")
        );
    }

    #[test]
    fn add_chains_and_none_removes() {
        let mut panel = panel();
        panel
            .add("b", button("b"))
            .unwrap()
            .add("a", text_input())
            .unwrap()
            .add("b", None::<Widget>)
            .unwrap();
        assert_eq!(panel.keys().collect::<Vec<_>>(), ["a"]);
        panel.remove("nope").unwrap();
        assert_eq!(panel.keys().count(), 1);
    }

    #[test]
    fn category_handle_chains() {
        let mut panel = panel();
        panel
            .in_category("Camera")
            .unwrap()
            .add("zoom", button("+"))
            .unwrap()
            .add("fov", button("fov"))
            .unwrap();
        panel.add_in("Audio", "volume", button("v")).unwrap();
        assert_eq!(panel.category_names().collect::<Vec<_>>(), ["Audio", "Camera"]);
        assert_eq!(panel.category_keys("Camera"), Some(vec!["fov", "zoom"]));
        assert_eq!(panel.category_keys("Missing"), None);
    }

    #[test]
    fn show_hide_toggle_display_only() {
        let mut panel = panel();
        panel.add("a", button("a")).unwrap();
        panel.hide().unwrap();
        assert!(!panel.is_visible());
        assert_eq!(
            panel.host().style_property(*panel.container(), "display").as_deref(),
            Some("none")
        );
        panel.show().unwrap();
        assert!(panel.is_visible());
        assert_eq!(
            panel.host().style_property(*panel.container(), "display").as_deref(),
            Some("grid")
        );
        assert_eq!(panel.keys().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn resize_gesture_pushes_geometry() {
        let mut panel = panel();
        panel.begin_resize(ResizeHandle::East, 1);
        let effect = panel.pointer_move(1, 25.5, 0.0).unwrap();
        assert!(effect.geometry_changed());
        assert_eq!(panel.rect().width, 425.5);
        assert_eq!(
            panel.host().style_property(*panel.container(), "max-width").as_deref(),
            Some("425.5px")
        );
        panel.end_resize();
        assert!(!panel.pointer_move(1, 10.0, 0.0).unwrap().geometry_changed());
    }

    #[test]
    fn snapshot_serialises_state() {
        let mut panel = panel();
        panel.add("a", button("a")).unwrap();
        panel.add_in("Cat", "b", text_input().with_getter(String::new)).unwrap();
        let snapshot = panel.snapshot();
        assert_eq!(snapshot.widgets[0].kind, "button");
        assert_eq!(snapshot.categories[0].widgets[0].timers, 1);
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"minWidth\""));
        let back: PanelSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
