// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource-backed widgets: raster images, vector graphics, and media.
//!
//! Image sources resolve asynchronously. The source handler files a request
//! on the [`LoadQueue`](crate::load::LoadQueue) and leaves the widget in
//! [`ResourceState::Pending`]. When the engine accepts the completion it
//! buffers the result and re-runs the same handler with `{Source}` dirty,
//! which then moves the widget to `Loaded` or `Failed`. Re-applying an
//! unchanged source never files a second request.
//!
//! Media playback is not hosted here: a video widget only shows a static
//! placeholder for its source.

use super::dispatch::{DispatchTable, DispatchTableBuilder};
use super::{Adapter, BindContext, common};
use crate::component::{ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::load::LoadResult;
use crate::widget::{ResourceState, ResourceView, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::Image`] and [`ComponentKind::VectorGraphic`].
#[derive(Debug)]
pub struct ImageAdapter {
    kind: ComponentKind,
    table: DispatchTable,
}

impl ImageAdapter {
    /// Creates the adapter for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not an image-like variant.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        assert!(
            matches!(kind, ComponentKind::Image | ComponentKind::VectorGraphic),
            "ImageAdapter cannot serve {kind:?}"
        );
        Self {
            kind,
            table: view_entries(common::builder())
                .on(&[PropertyKey::Source], "source", apply_source)
                .build(),
        }
    }
}

/// Adapter for [`ComponentKind::Video`].
#[derive(Debug)]
pub struct VideoAdapter {
    table: DispatchTable,
}

impl VideoAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: view_entries(common::builder())
                .on(&[PropertyKey::Source], "media", apply_media)
                .build(),
        }
    }
}

impl Default for VideoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn view_entries(builder: DispatchTableBuilder) -> DispatchTableBuilder {
    builder
        .on(&[PropertyKey::Scale], "scale", apply_scale)
        .on(&[PropertyKey::Align], "align", apply_align)
}

fn view(store: &mut WidgetStore, widget: WidgetId) -> &mut ResourceView {
    store
        .props_mut(widget)
        .resource
        .get_or_insert_with(ResourceView::default)
}

fn current_state(store: &WidgetStore, widget: WidgetId) -> ResourceState {
    store
        .props(widget)
        .resource
        .as_ref()
        .map(|v| v.state.clone())
        .unwrap_or_default()
}

fn apply_source(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let declared =
        common::text(cx.source, component, PropertyKey::Source).filter(|s| !s.is_empty());
    let next = match (declared, current_state(cx.store, widget)) {
        (None, ResourceState::Empty) => return,
        (None, _) => {
            cx.loads.cancel_widget(widget);
            ResourceState::Empty
        }
        (Some(src), ResourceState::Pending { ticket, source }) if source == src => {
            match cx.loads.take_resolved(widget, ticket) {
                None => return,
                Some(LoadResult::Image { width, height }) => ResourceState::Loaded {
                    source,
                    width,
                    height,
                },
                Some(LoadResult::Failed) => ResourceState::Failed { source },
            }
        }
        (Some(src), state) if state.source() == Some(src) => return,
        (Some(src), _) => {
            let ticket = cx.loads.request(widget, component, PropertyKey::Source, src);
            ResourceState::Pending {
                ticket,
                source: src.into(),
            }
        }
    };
    let resized = matches!(next, ResourceState::Loaded { .. });
    view(cx.store, widget).state = next;
    if resized {
        cx.store.request_layout(widget);
    }
}

fn apply_media(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let state = common::text(cx.source, component, PropertyKey::Source)
        .filter(|s| !s.is_empty())
        .map_or(ResourceState::Empty, |source| ResourceState::Placeholder {
            source: source.into(),
        });
    view(cx.store, widget).state = state;
}

fn apply_scale(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let scale = common::typed(cx.source, component, PropertyKey::Scale, PropertyValue::as_scale)
        .unwrap_or_default();
    view(cx.store, widget).scale = scale;
}

fn apply_align(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let align = common::typed(cx.source, component, PropertyKey::Align, PropertyValue::as_align)
        .unwrap_or_default();
    view(cx.store, widget).align = align;
}

impl Adapter for ImageAdapter {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(self.kind);
        store.props_mut(widget).resource = Some(ResourceView::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_scale(cx, component, widget);
        apply_align(cx, component, widget);
        apply_source(cx, component, widget);
    }
}

impl Adapter for VideoAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Video
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::Video);
        store.props_mut(widget).resource = Some(ResourceView::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_scale(cx, component, widget);
        apply_align(cx, component, widget);
        apply_media(cx, component, widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::test_util::Harness;
    use crate::component::{DirtySet, Scale};

    fn state(h: &Harness, w: WidgetId) -> ResourceState {
        h.store.props(w).resource.clone().unwrap().state
    }

    #[test]
    fn source_goes_pending_then_loaded() {
        let mut h = Harness::new();
        let adapter = ImageAdapter::new(ComponentKind::Image);
        let c = h.tree.create(ComponentKind::Image);
        h.tree.set(c, PropertyKey::Source, "cat.png");
        let w = h.bind(&adapter, c);

        let ResourceState::Pending { ticket, .. } = state(&h, w) else {
            panic!("expected pending, got {:?}", state(&h, w));
        };
        let requests = h.loads.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ticket.id, ticket);

        h.loads.resolve(
            w,
            ticket,
            LoadResult::Image {
                width: 64,
                height: 32,
            },
        );
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Source]));
        assert_eq!(
            state(&h, w),
            ResourceState::Loaded {
                source: "cat.png".into(),
                width: 64,
                height: 32,
            }
        );
    }

    #[test]
    fn unchanged_source_does_not_refetch() {
        let mut h = Harness::new();
        let adapter = ImageAdapter::new(ComponentKind::VectorGraphic);
        let c = h.tree.create(ComponentKind::VectorGraphic);
        h.tree.set(c, PropertyKey::Source, "icon.svg");
        let w = h.bind(&adapter, c);
        adapter.full_bind(&mut h.cx(), c, w);
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Source]));
        assert_eq!(h.loads.take_requests().len(), 1);
    }

    #[test]
    fn failed_load_renders_empty_state() {
        let mut h = Harness::new();
        let adapter = ImageAdapter::new(ComponentKind::Image);
        let c = h.tree.create(ComponentKind::Image);
        h.tree.set(c, PropertyKey::Source, "missing.png");
        let w = h.bind(&adapter, c);
        let ticket = h.loads.take_requests()[0].ticket.id;
        h.loads.resolve(w, ticket, LoadResult::Failed);
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Source]));
        assert_eq!(
            state(&h, w),
            ResourceState::Failed {
                source: "missing.png".into()
            }
        );
    }

    #[test]
    fn clearing_source_cancels_request() {
        let mut h = Harness::new();
        let adapter = ImageAdapter::new(ComponentKind::Image);
        let c = h.tree.create(ComponentKind::Image);
        h.tree.set(c, PropertyKey::Source, "a.png");
        let w = h.bind(&adapter, c);
        h.tree.unset(c, PropertyKey::Source);
        h.refresh(&adapter, c, w, DirtySet::of(&[PropertyKey::Source]));
        assert_eq!(state(&h, w), ResourceState::Empty);
        assert_eq!(h.loads.pending_requests(), 0);
    }

    #[test]
    fn video_shows_placeholder() {
        let mut h = Harness::new();
        let adapter = VideoAdapter::new();
        let c = h.tree.create(ComponentKind::Video);
        h.tree.set(c, PropertyKey::Source, "clip.mp4");
        h.tree.set(c, PropertyKey::Scale, Scale::Fill);
        let w = h.bind(&adapter, c);
        let view = h.store.props(w).resource.clone().unwrap();
        assert_eq!(
            view.state,
            ResourceState::Placeholder {
                source: "clip.mp4".into()
            }
        );
        assert_eq!(view.scale, Scale::Fill);
        assert_eq!(h.loads.pending_requests(), 0);
    }

    #[test]
    #[should_panic(expected = "ImageAdapter cannot serve")]
    fn image_adapter_rejects_other_kinds() {
        let _ = ImageAdapter::new(ComponentKind::Text);
    }
}
