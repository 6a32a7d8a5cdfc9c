// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static text.

use super::dispatch::{DispatchTable, DispatchTableBuilder};
use super::{Adapter, BindContext, common};
use crate::component::{Color, ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::{TextState, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::Text`].
#[derive(Debug)]
pub struct TextAdapter {
    table: DispatchTable,
}

impl TextAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: text_entries(common::builder()).build(),
        }
    }
}

impl Default for TextAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the text handlers shared by static and editable text.
pub(super) fn text_entries(builder: DispatchTableBuilder) -> DispatchTableBuilder {
    use PropertyKey as K;
    builder
        .on(&[K::Text], "text", apply_text)
        .on(&[K::Color], "color", apply_color)
        .on(&[K::FontSize], "font_size", apply_font_size)
        .on(&[K::MaxLines], "max_lines", apply_max_lines)
        .on(&[K::TextAlign], "text_align", apply_text_align)
}

/// Applies every shared text property, in table order.
pub(super) fn bind_text(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    apply_text(cx, component, widget);
    apply_color(cx, component, widget);
    apply_font_size(cx, component, widget);
    apply_max_lines(cx, component, widget);
    apply_text_align(cx, component, widget);
}

pub(super) fn text_state(store: &mut WidgetStore, widget: WidgetId) -> &mut TextState {
    store
        .props_mut(widget)
        .text
        .get_or_insert_with(TextState::default)
}

fn apply_text(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let text = common::text(cx.source, component, PropertyKey::Text).unwrap_or_default();
    let state = text_state(cx.store, widget);
    if state.text != text {
        state.text = text.into();
        cx.store.request_layout(widget);
    }
}

fn apply_color(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let color = common::typed(cx.source, component, PropertyKey::Color, PropertyValue::as_color)
        .unwrap_or(Color::WHITE);
    text_state(cx.store, widget).color = color;
}

fn apply_font_size(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let size = match common::finite(cx.source, component, PropertyKey::FontSize) {
        Some(n) if n > 0.0 => n,
        Some(n) => {
            log::warn!("{component:?}: font size {n} is not positive, using default");
            TextState::DEFAULT_FONT_SIZE
        }
        None => TextState::DEFAULT_FONT_SIZE,
    };
    let state = text_state(cx.store, widget);
    if state.font_size != size {
        state.font_size = size;
        cx.store.request_layout(widget);
    }
}

fn apply_max_lines(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let lines = common::dimension(cx.source, component, PropertyKey::MaxLines)
        .map_or(0, line_count);
    text_state(cx.store, widget).max_lines = lines;
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is non-negative and saturates at u32::MAX"
)]
fn line_count(n: f64) -> u32 {
    n.floor().min(f64::from(u32::MAX)) as u32
}

fn apply_text_align(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let align = common::typed(
        cx.source,
        component,
        PropertyKey::TextAlign,
        PropertyValue::as_text_align,
    )
    .unwrap_or_default();
    text_state(cx.store, widget).align = align;
}

impl Adapter for TextAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Text
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::Text);
        store.props_mut(widget).text = Some(TextState::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        bind_text(cx, component, widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::test_util::Harness;
    use crate::component::{DirtySet, TextAlign};

    #[test]
    fn binds_text_properties() {
        let mut h = Harness::new();
        let adapter = TextAdapter::new();
        let c = h.tree.create(ComponentKind::Text);
        h.tree.set(c, PropertyKey::Text, "Hello");
        h.tree.set(c, PropertyKey::FontSize, 24.0);
        h.tree.set(c, PropertyKey::MaxLines, 2.7);
        h.tree.set(c, PropertyKey::TextAlign, TextAlign::Center);
        let w = h.bind(&adapter, c);
        let text = h.store.props(w).text.clone().unwrap();
        assert_eq!(text.text, "Hello");
        assert_eq!(text.font_size, 24.0);
        assert_eq!(text.max_lines, 2);
        assert_eq!(text.align, TextAlign::Center);
    }

    #[test]
    fn invalid_font_size_defaults() {
        let mut h = Harness::new();
        let adapter = TextAdapter::new();
        let c = h.tree.create(ComponentKind::Text);
        h.tree.set(c, PropertyKey::FontSize, -5.0);
        let w = h.bind(&adapter, c);
        assert_eq!(
            h.store.props(w).text.as_ref().unwrap().font_size,
            TextState::DEFAULT_FONT_SIZE
        );
    }

    #[test]
    fn text_change_requests_layout() {
        let mut h = Harness::new();
        let adapter = TextAdapter::new();
        let c = h.tree.create(ComponentKind::Text);
        let w = h.bind(&adapter, c);
        let _ = h.store.evaluate();

        h.tree.set(c, PropertyKey::Text, "longer text");
        let out = h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Text]));
        assert_eq!(out.invoked.as_slice(), ["text"]);
        let changes = h.store.evaluate();
        assert!(changes.layout.contains(&w.index()));
    }
}
