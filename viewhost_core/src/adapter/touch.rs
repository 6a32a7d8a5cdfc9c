// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pressable wrapper.

use super::dispatch::DispatchTable;
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::WidgetId;

/// Adapter for [`ComponentKind::TouchWrapper`].
#[derive(Debug)]
pub struct TouchWrapperAdapter {
    table: DispatchTable,
}

impl TouchWrapperAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: common::builder()
                .on(&[PropertyKey::OnPress], "click", apply_click)
                .build(),
        }
    }
}

impl Default for TouchWrapperAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_click(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let present = common::typed(
        cx.source,
        component,
        PropertyKey::OnPress,
        PropertyValue::as_bool,
    )
    .unwrap_or(false);
    common::bind_click_handler(cx.store, widget, present);
}

impl Adapter for TouchWrapperAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::TouchWrapper
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_click(cx, component, widget);
    }
}
