// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain absolute-layout container.

use super::dispatch::DispatchTable;
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind};
use crate::widget::WidgetId;

/// Adapter for [`ComponentKind::Container`].
///
/// A container only carries the common properties; its children are
/// positioned from their own bounds.
#[derive(Debug)]
pub struct ContainerAdapter {
    table: DispatchTable,
}

impl ContainerAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: common::builder().build(),
        }
    }
}

impl Default for ContainerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ContainerAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Container
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn bind_properties(&self, _: &mut BindContext<'_>, _: ComponentId, _: WidgetId) {}
}
