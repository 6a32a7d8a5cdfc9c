// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollable containers: scroll views and lazy sequences.
//!
//! The adapter only mirrors scroll position and axis. Which children are on
//! screen is decided by the component tree and reconciled by the engine
//! after the refresh.

use super::dispatch::DispatchTable;
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::{ScrollState, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::ScrollView`], [`ComponentKind::Sequence`],
/// and [`ComponentKind::GridSequence`].
#[derive(Debug)]
pub struct ScrollAdapter {
    kind: ComponentKind,
    table: DispatchTable,
}

impl ScrollAdapter {
    /// Creates the adapter for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not a scrollable variant.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        assert!(
            matches!(
                kind,
                ComponentKind::ScrollView | ComponentKind::Sequence | ComponentKind::GridSequence
            ),
            "ScrollAdapter cannot serve {kind:?}"
        );
        Self {
            kind,
            table: common::builder()
                .on(&[PropertyKey::ScrollPosition], "scroll_position", apply_position)
                .on(&[PropertyKey::ScrollDirection], "scroll_direction", apply_direction)
                .build(),
        }
    }
}

fn scroll(store: &mut WidgetStore, widget: WidgetId) -> &mut ScrollState {
    store
        .props_mut(widget)
        .scroll
        .get_or_insert_with(ScrollState::default)
}

fn apply_position(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let position =
        common::dimension(cx.source, component, PropertyKey::ScrollPosition).unwrap_or(0.0);
    scroll(cx.store, widget).position = position;
}

fn apply_direction(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let direction = common::typed(
        cx.source,
        component,
        PropertyKey::ScrollDirection,
        PropertyValue::as_scroll_direction,
    )
    .unwrap_or_default();
    scroll(cx.store, widget).direction = direction;
}

impl Adapter for ScrollAdapter {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(self.kind);
        store.props_mut(widget).scroll = Some(ScrollState::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_direction(cx, component, widget);
        apply_position(cx, component, widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::test_util::Harness;
    use crate::component::{DirtySet, ScrollDirection};

    #[test]
    fn negative_or_nan_position_is_zero() {
        let mut h = Harness::new();
        let adapter = ScrollAdapter::new(ComponentKind::Sequence);
        let c = h.tree.create(ComponentKind::Sequence);
        h.tree.set(c, PropertyKey::ScrollPosition, -40.0);
        let w = h.bind(&adapter, c);
        assert_eq!(h.store.props(w).scroll.unwrap().position, 0.0);

        h.tree.set(c, PropertyKey::ScrollPosition, f64::NAN);
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::ScrollPosition]));
        assert_eq!(h.store.props(w).scroll.unwrap().position, 0.0);

        h.tree.set(c, PropertyKey::ScrollPosition, 120.0);
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::ScrollPosition]));
        assert_eq!(h.store.props(w).scroll.unwrap().position, 120.0);
    }

    #[test]
    fn direction_is_mirrored() {
        let mut h = Harness::new();
        let adapter = ScrollAdapter::new(ComponentKind::ScrollView);
        let c = h.tree.create(ComponentKind::ScrollView);
        h.tree
            .set(c, PropertyKey::ScrollDirection, ScrollDirection::Horizontal);
        let w = h.bind(&adapter, c);
        assert_eq!(
            h.store.props(w).scroll.unwrap().direction,
            ScrollDirection::Horizontal
        );
    }
}
