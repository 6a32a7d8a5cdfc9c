// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-variant adapters.
//!
//! An [`Adapter`] owns everything variant-specific about turning one kind
//! of component into a widget:
//!
//! - [`create_widget`](Adapter::create_widget) allocates the widget and the
//!   decorations it privately manages, without reading any component
//!   property.
//! - [`full_bind`](Adapter::full_bind) applies every property relevant to
//!   the variant. Properties the component does not declare are reset to
//!   their documented defaults, so binding the same widget to a different
//!   component never leaks state.
//! - [`refresh`](Adapter::refresh) applies only the dirty keys of the
//!   current frame through the adapter's [`DispatchTable`].
//!
//! The pieces every adapter shares (bounds, padding, opacity, display,
//! disabled, accessibility, focus) live in [`common`] and are invoked
//! identically by all of them.

use core::fmt;

use crate::component::{ComponentId, ComponentKind, ComponentSource, DirtySet, PropertyKey};
use crate::load::LoadQueue;
use crate::widget::{WidgetId, WidgetStore};

pub mod common;
mod container;
pub mod dispatch;
mod edit_text;
mod frame;
mod media;
mod noop;
mod pager;
mod scroll;
mod text;
mod touch;

pub use container::ContainerAdapter;
pub use dispatch::{DispatchTable, DispatchTableBuilder, RefreshOutcome, Resolution};
pub use edit_text::EditTextAdapter;
pub use frame::FrameAdapter;
pub use media::{ImageAdapter, VideoAdapter};
pub use noop::NoOpAdapter;
pub use pager::PagerAdapter;
pub use scroll::ScrollAdapter;
pub use text::TextAdapter;
pub use touch::TouchWrapperAdapter;

/// Host environment signals that affect binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncEnv {
    /// Whether a screen reader or other assistive technology is active.
    pub screen_reader_enabled: bool,
}

/// Everything an adapter may touch while binding or refreshing.
pub struct BindContext<'a> {
    /// Read-only view of the component tree.
    pub source: &'a dyn ComponentSource,
    /// Widget storage.
    pub store: &'a mut WidgetStore,
    /// Host environment.
    pub env: &'a SyncEnv,
    /// Request side of the asynchronous load queue.
    pub loads: &'a mut LoadQueue,
}

impl fmt::Debug for BindContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindContext")
            .field("env", self.env)
            .finish_non_exhaustive()
    }
}

const LAYOUT_KEYS: DirtySet = DirtySet::of(&[PropertyKey::Bounds, PropertyKey::InnerBounds]);

/// An update function stored in a [`DispatchTable`].
pub type UpdateFn = fn(&mut BindContext<'_>, ComponentId, WidgetId);

/// Creates, binds, and refreshes widgets for one component variant.
///
/// Adapters are immutable after construction and are shared by every
/// component of their variant.
pub trait Adapter: fmt::Debug + Send + Sync {
    /// The variant this adapter serves.
    fn kind(&self) -> ComponentKind;

    /// The dirty-key table used by [`refresh`](Self::refresh).
    fn dispatch(&self) -> &DispatchTable;

    /// Allocates a widget and its private decorations.
    ///
    /// Must not read component properties.
    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        store.create_widget(self.kind())
    }

    /// Applies the variant-specific properties, after the common pipeline.
    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId);

    /// Applies every property of `component` to `widget`.
    ///
    /// Order: bounds, padding, the rest of the common pipeline, then
    /// [`bind_properties`](Self::bind_properties). Safe to call repeatedly.
    fn full_bind(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        common::apply_bounds(cx, component, widget);
        self.apply_padding(cx, component, widget);
        common::bind_appearance(cx, component, widget);
        self.bind_properties(cx, component, widget);
        cx.store.props_mut(widget).bind_count += 1;
    }

    /// Applies padding according to the variant's layout mode.
    fn apply_padding(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        common::apply_padding(cx, component, widget, self.kind().layout_mode());
    }

    /// Applies only the handlers selected by `dirty`.
    ///
    /// A change to `Bounds` or `InnerBounds` also reapplies
    /// [`apply_padding`](Self::apply_padding), so an adapter's own padding
    /// rule holds after a refresh exactly as after a bind.
    fn refresh(
        &self,
        cx: &mut BindContext<'_>,
        component: ComponentId,
        widget: WidgetId,
        dirty: DirtySet,
    ) -> RefreshOutcome {
        let outcome = self.dispatch().run(cx, component, widget, dirty);
        if dirty.intersects(LAYOUT_KEYS) {
            self.apply_padding(cx, component, widget);
        }
        outcome
    }
}

/// Returns the built-in adapter for `kind`.
#[must_use]
pub fn builtin(kind: ComponentKind) -> Box<dyn Adapter> {
    match kind {
        ComponentKind::Container => Box::new(ContainerAdapter::new()),
        ComponentKind::Frame => Box::new(FrameAdapter::new()),
        ComponentKind::Text => Box::new(TextAdapter::new()),
        ComponentKind::EditText => Box::new(EditTextAdapter::new()),
        ComponentKind::Image => Box::new(ImageAdapter::new(ComponentKind::Image)),
        ComponentKind::VectorGraphic => Box::new(ImageAdapter::new(ComponentKind::VectorGraphic)),
        ComponentKind::TouchWrapper => Box::new(TouchWrapperAdapter::new()),
        ComponentKind::ScrollView => Box::new(ScrollAdapter::new(ComponentKind::ScrollView)),
        ComponentKind::Pager => Box::new(PagerAdapter::new()),
        ComponentKind::Sequence => Box::new(ScrollAdapter::new(ComponentKind::Sequence)),
        ComponentKind::GridSequence => Box::new(ScrollAdapter::new(ComponentKind::GridSequence)),
        ComponentKind::Video => Box::new(VideoAdapter::new()),
        ComponentKind::Virtual => Box::new(NoOpAdapter::new()),
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::component::ComponentTree;

    /// Owns everything a [`BindContext`] borrows.
    pub(crate) struct Harness {
        pub(crate) tree: ComponentTree,
        pub(crate) store: WidgetStore,
        pub(crate) env: SyncEnv,
        pub(crate) loads: LoadQueue,
    }

    impl Harness {
        pub(crate) fn new() -> Self {
            Self {
                tree: ComponentTree::new(),
                store: WidgetStore::new(),
                env: SyncEnv::default(),
                loads: LoadQueue::new(),
            }
        }

        pub(crate) fn cx(&mut self) -> BindContext<'_> {
            BindContext {
                source: &self.tree,
                store: &mut self.store,
                env: &self.env,
                loads: &mut self.loads,
            }
        }

        /// Creates and fully binds a widget for `component`.
        pub(crate) fn bind(&mut self, adapter: &dyn Adapter, component: ComponentId) -> WidgetId {
            let widget = adapter.create_widget(&mut self.store);
            adapter.full_bind(&mut self.cx(), component, widget);
            widget
        }

        pub(crate) fn refresh(
            &mut self,
            adapter: &dyn Adapter,
            component: ComponentId,
            widget: WidgetId,
            dirty: DirtySet,
        ) -> RefreshOutcome {
            adapter.refresh(&mut self.cx(), component, widget, dirty)
        }
    }
}
