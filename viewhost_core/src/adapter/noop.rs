// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catch-all adapter for components with no visual representation.

use super::dispatch::{DispatchTable, RefreshOutcome};
use super::{Adapter, BindContext};
use crate::component::{ComponentId, ComponentKind, DirtySet};
use crate::widget::{Visibility, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::Virtual`].
///
/// Creates a placeholder widget that is always [`Visibility::Gone`] and
/// ignores every property. This is the only adapter that accepts dirty keys
/// without a handler silently.
#[derive(Debug)]
pub struct NoOpAdapter {
    table: DispatchTable,
}

impl NoOpAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: DispatchTable::builder().build(),
        }
    }
}

impl Default for NoOpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for NoOpAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Virtual
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::Virtual);
        store.props_mut(widget).visibility = Visibility::Gone;
        widget
    }

    fn bind_properties(&self, _: &mut BindContext<'_>, _: ComponentId, _: WidgetId) {}

    fn full_bind(&self, cx: &mut BindContext<'_>, _: ComponentId, widget: WidgetId) {
        let props = cx.store.props_mut(widget);
        props.visibility = Visibility::Gone;
        props.bind_count += 1;
    }

    fn apply_padding(&self, _: &mut BindContext<'_>, _: ComponentId, _: WidgetId) {}

    fn refresh(
        &self,
        _: &mut BindContext<'_>,
        _: ComponentId,
        _: WidgetId,
        _: DirtySet,
    ) -> RefreshOutcome {
        RefreshOutcome::default()
    }
}
