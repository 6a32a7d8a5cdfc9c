// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable text.
//!
//! Shares the static text handlers and adds a placeholder and a submit
//! handler. Typing is routed back to the component tree by the engine as an
//! [`UpdateKind::TextChanged`](crate::component::UpdateKind::TextChanged)
//! update; the adapter only mirrors what the tree reports.

use super::dispatch::DispatchTable;
use super::text::{bind_text, text_entries, text_state};
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::{TextState, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::EditText`].
#[derive(Debug)]
pub struct EditTextAdapter {
    table: DispatchTable,
}

impl EditTextAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        use PropertyKey as K;
        Self {
            table: text_entries(common::builder())
                .on(&[K::Placeholder], "placeholder", apply_placeholder)
                .on(&[K::Submit], "submit", apply_submit)
                .build(),
        }
    }
}

impl Default for EditTextAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_placeholder(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let placeholder =
        common::text(cx.source, component, PropertyKey::Placeholder).unwrap_or_default();
    text_state(cx.store, widget).placeholder = placeholder.into();
}

fn apply_submit(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let present =
        common::typed(cx.source, component, PropertyKey::Submit, PropertyValue::as_bool)
            .unwrap_or(false);
    text_state(cx.store, widget).submit_handler = present;
}

impl Adapter for EditTextAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::EditText
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::EditText);
        store.props_mut(widget).text = Some(TextState::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        bind_text(cx, component, widget);
        apply_placeholder(cx, component, widget);
        apply_submit(cx, component, widget);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Insets, Rect};

    use super::*;
    use crate::adapter::test_util::Harness;
    use crate::component::DirtySet;

    #[test]
    fn edit_text_is_box_laid_out_and_focusable() {
        let mut h = Harness::new();
        let adapter = EditTextAdapter::new();
        let c = h.tree.create(ComponentKind::EditText);
        h.tree.set_bounds(
            c,
            Rect::new(0.0, 0.0, 100.0, 40.0),
            Rect::new(8.0, 4.0, 92.0, 36.0),
        );
        h.tree.set(c, PropertyKey::Placeholder, "Search");
        let w = h.bind(&adapter, c);
        let props = h.store.props(w);
        assert_eq!(props.padding, Insets::new(8.0, 4.0, 8.0, 4.0));
        assert!(props.focusable);
        assert_eq!(props.text.as_ref().unwrap().placeholder, "Search");
    }

    #[test]
    fn disabled_edit_text_loses_focus_unless_announced() {
        let mut h = Harness::new();
        let adapter = EditTextAdapter::new();
        let c = h.tree.create(ComponentKind::EditText);
        let w = h.bind(&adapter, c);
        assert!(h.store.props(w).focusable);

        h.tree.set(c, PropertyKey::Disabled, true);
        let out = h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Disabled]));
        assert_eq!(out.invoked.as_slice(), ["disabled", "focusable"]);
        assert!(!h.store.props(w).focusable);

        h.env.screen_reader_enabled = true;
        h.tree.set(c, PropertyKey::AccessibilityLabel, "Name");
        h.refresh(
            &adapter,
            c,
            w,
            DirtySet::of(&[PropertyKey::AccessibilityLabel]),
        );
        assert!(h.store.props(w).focusable);
    }

    #[test]
    fn submit_handler_follows_property() {
        let mut h = Harness::new();
        let adapter = EditTextAdapter::new();
        let c = h.tree.create(ComponentKind::EditText);
        h.tree.set(c, PropertyKey::Submit, true);
        let w = h.bind(&adapter, c);
        assert!(h.store.props(w).text.as_ref().unwrap().submit_handler);
    }
}
