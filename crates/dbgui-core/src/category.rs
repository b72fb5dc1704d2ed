#![forbid(unsafe_code)]

//! Widget buckets and the category directory.
//!
//! A [`WidgetBucket`] pairs a [`SortedRegistry`] of rendered rows with the
//! element that displays them; registry order and child order are kept
//! identical. The [`CategoryDirectory`] lazily creates one collapsible
//! bucket per category name and never deletes them.

use std::rc::Rc;

use crate::config::PanelConfig;
use crate::error::HostResult;
use crate::host::{DomHost, ElementKind};
use crate::registry::{Keyed, RegistryChange, SortedRegistry};
use crate::render::LiveWidget;
use crate::style;
use crate::widget::Widget;

/// Attribute carrying a row's key.
pub const KEY_ATTRIBUTE: &str = "data-key";
/// Attribute carrying a category's name.
pub const CATEGORY_ATTRIBUTE: &str = "data-category-name";

/// One labelled widget row.
pub struct Row<H: DomHost> {
    key: String,
    kind: &'static str,
    node: H::Node,
    widget: LiveWidget<H>,
}

impl<H: DomHost> Row<H> {
    fn render(host: &Rc<H>, config: &PanelConfig, key: &str, widget: &Widget) -> HostResult<Self> {
        let node = host.create(ElementKind::Div)?;
        host.set_style(&node, style::row().as_str())?;
        host.set_attribute(&node, "class", style::ROW_CLASS)?;
        host.set_attribute(&node, KEY_ATTRIBUTE, key)?;

        let label = host.create(ElementKind::Div)?;
        host.set_style(&label, style::row_label().as_str())?;
        host.set_text(&label, key);

        let wrapper = host.create(ElementKind::Div)?;
        host.set_style(&wrapper, style::row_widget(config.widget_font_size_px()).as_str())?;

        let live = widget.render(host, config.default_poll_interval_ms)?;
        host.append_child(&wrapper, live.node())?;
        host.append_child(&node, &label)?;
        host.append_child(&node, &wrapper)?;
        Ok(Self {
            key: key.to_string(),
            kind: widget.kind_name(),
            node,
            widget: live,
        })
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn node(&self) -> &H::Node {
        &self.node
    }

    pub fn widget(&self) -> &LiveWidget<H> {
        &self.widget
    }

    fn dispose(&mut self) {
        self.widget.dispose();
    }
}

impl<H: DomHost> Keyed for Row<H> {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Ordered rows rendered into one container element.
pub struct WidgetBucket<H: DomHost> {
    container: H::Node,
    rows: SortedRegistry<Row<H>>,
}

impl<H: DomHost> WidgetBucket<H> {
    pub(crate) fn new(container: H::Node) -> Self {
        Self {
            container,
            rows: SortedRegistry::new(),
        }
    }

    pub fn container(&self) -> &H::Node {
        &self.container
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row<H>> + '_ {
        self.rows.iter()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Row<H>> {
        self.rows.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert, replace or (with `None`) remove the row for `key`.
    pub(crate) fn set(
        &mut self,
        host: &Rc<H>,
        config: &PanelConfig,
        key: &str,
        widget: Option<Widget>,
    ) -> HostResult<()> {
        let Some(widget) = widget else {
            self.remove(host, key);
            return Ok(());
        };
        match self.rows.position(key) {
            Ok(index) => {
                // The old row stays live until its replacement is in the tree.
                let row = Row::render(host, config, key, &widget)?;
                let Some(old) = self.rows.at_mut(index) else {
                    return Ok(());
                };
                host.replace_with(&old.node, &row.node)?;
                old.dispose();
                if let RegistryChange::Replaced { index, .. } = self.rows.upsert(row) {
                    tracing::debug!(
                        target: "dbgui::registry",
                        key,
                        index,
                        kind = widget.kind_name(),
                        "widget replaced"
                    );
                }
            }
            Err(index) => {
                let row = Row::render(host, config, key, &widget)?;
                match self.rows.at(index) {
                    Some(next) => host.insert_before(&self.container, &row.node, &next.node)?,
                    None => host.append_child(&self.container, &row.node)?,
                }
                self.rows.upsert(row);
                tracing::debug!(
                    target: "dbgui::registry",
                    key,
                    index,
                    kind = widget.kind_name(),
                    "widget added"
                );
            }
        }
        Ok(())
    }

    fn remove(&mut self, host: &Rc<H>, key: &str) {
        match self.rows.remove(key) {
            RegistryChange::Removed {
                index,
                mut previous,
            } => {
                previous.dispose();
                host.remove(&previous.node);
                tracing::debug!(target: "dbgui::registry", key, index, "widget removed");
            }
            _ => tracing::trace!(target: "dbgui::registry", key, "remove of absent key"),
        }
    }
}

/// Named, collapsible bucket.
pub struct Category<H: DomHost> {
    name: String,
    node: H::Node,
    bucket: WidgetBucket<H>,
}

impl<H: DomHost> Category<H> {
    fn create(host: &Rc<H>, name: &str) -> HostResult<Self> {
        let node = host.create(ElementKind::Details)?;
        host.set_style(&node, style::category().as_str())?;
        host.set_attribute(
            &node,
            "class",
            &format!("{} {}", style::ROW_CLASS, style::CATEGORY_CLASS),
        )?;
        host.set_attribute(&node, CATEGORY_ATTRIBUTE, name)?;

        let summary = host.create(ElementKind::Summary)?;
        host.set_attribute(&summary, "class", style::SUMMARY_CLASS)?;
        host.set_text(&summary, name);

        let widgets = host.create(ElementKind::Div)?;
        host.set_style(&widgets, style::category_widgets().as_str())?;
        host.append_child(&node, &summary)?;
        host.append_child(&node, &widgets)?;
        Ok(Self {
            name: name.to_string(),
            node,
            bucket: WidgetBucket::new(widgets),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `<details>` element.
    pub fn node(&self) -> &H::Node {
        &self.node
    }

    pub fn bucket(&self) -> &WidgetBucket<H> {
        &self.bucket
    }

    pub(crate) fn bucket_mut(&mut self) -> &mut WidgetBucket<H> {
        &mut self.bucket
    }
}

impl<H: DomHost> Keyed for Category<H> {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Lazily populated, name-ordered category cache.
pub struct CategoryDirectory<H: DomHost> {
    container: H::Node,
    categories: SortedRegistry<Category<H>>,
}

impl<H: DomHost> CategoryDirectory<H> {
    pub(crate) fn new(container: H::Node) -> Self {
        Self {
            container,
            categories: SortedRegistry::new(),
        }
    }

    /// Existing category for `name`, or a freshly created one inserted at
    /// its sorted position.
    pub(crate) fn category_for(&mut self, host: &Rc<H>, name: &str) -> HostResult<&mut Category<H>> {
        let index = match self.categories.position(name) {
            Ok(index) => index,
            Err(index) => {
                let category = Category::create(host, name)?;
                match self.categories.at(index) {
                    Some(next) => host.insert_before(&self.container, &category.node, &next.node)?,
                    None => host.append_child(&self.container, &category.node)?,
                }
                self.categories.upsert(category);
                tracing::debug!(target: "dbgui::registry", category = name, index, "category created");
                index
            }
        };
        self.categories
            .at_mut(index)
            .ok_or_else(|| crate::error::HostError::new("category_for", "category vanished"))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Category<H>> {
        self.categories.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Category<H>> {
        self.categories.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category<H>> + '_ {
        self.categories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
