// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paged container.

use super::dispatch::DispatchTable;
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::{PagerState, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::Pager`].
///
/// Pages are absolutely positioned. The displayed page window is derived by
/// the component tree from the current page and navigation policy; this
/// adapter mirrors both onto the widget. The current page is clamped to the
/// page count, so it is recomputed whenever the pages change too.
#[derive(Debug)]
pub struct PagerAdapter {
    table: DispatchTable,
}

impl PagerAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: common::builder()
                .on(
                    &[PropertyKey::CurrentPage, PropertyKey::DisplayedChildren],
                    "current_page",
                    apply_current_page,
                )
                .on(&[PropertyKey::Navigation], "navigation", apply_navigation)
                .build(),
        }
    }
}

impl Default for PagerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn pager(store: &mut WidgetStore, widget: WidgetId) -> &mut PagerState {
    store
        .props_mut(widget)
        .pager
        .get_or_insert_with(PagerState::default)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is non-negative and clamped to the page count"
)]
fn page_index(n: f64, count: usize) -> usize {
    let max = count.saturating_sub(1);
    (n.floor() as usize).min(max)
}

fn apply_current_page(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let count = cx.source.children(component).len();
    let current = common::dimension(cx.source, component, PropertyKey::CurrentPage)
        .map_or(0, |n| page_index(n, count));
    pager(cx.store, widget).current = current;
}

fn apply_navigation(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let navigation = common::typed(
        cx.source,
        component,
        PropertyKey::Navigation,
        PropertyValue::as_navigation,
    )
    .unwrap_or_default();
    pager(cx.store, widget).navigation = navigation;
}

impl Adapter for PagerAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Pager
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::Pager);
        store.props_mut(widget).pager = Some(PagerState::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_navigation(cx, component, widget);
        apply_current_page(cx, component, widget);
    }
}
