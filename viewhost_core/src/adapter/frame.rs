// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorated frame: background fill, border stroke, rounded corners.
//!
//! The frame widget owns one [`BackgroundLayers`] decoration, created with
//! the widget and reused across binds. Corner radius is written onto that
//! decoration and then mirrored into the widget clip, which is why the
//! radius is applied after the background.

use super::dispatch::DispatchTable;
use super::{Adapter, BindContext, common};
use crate::component::{Color, ComponentId, ComponentKind, PropertyKey, PropertyValue};
use crate::widget::{BackgroundLayers, WidgetId, WidgetStore};

/// Adapter for [`ComponentKind::Frame`].
#[derive(Debug)]
pub struct FrameAdapter {
    table: DispatchTable,
}

impl FrameAdapter {
    /// Creates the adapter and its dispatch table.
    #[must_use]
    pub fn new() -> Self {
        use PropertyKey as K;
        Self {
            table: common::builder()
                .on(&[K::BackgroundColor], "background", apply_background)
                .on(&[K::BorderColor, K::BorderWidth], "border", apply_border)
                .on(&[K::BorderRadius], "radius", apply_radius)
                .build(),
        }
    }
}

impl Default for FrameAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn layers(store: &mut WidgetStore, widget: WidgetId) -> &mut BackgroundLayers {
    store
        .props_mut(widget)
        .background
        .get_or_insert_with(BackgroundLayers::default)
}

fn apply_background(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let fill = common::typed(
        cx.source,
        component,
        PropertyKey::BackgroundColor,
        PropertyValue::as_color,
    )
    .unwrap_or(Color::TRANSPARENT);
    layers(cx.store, widget).fill = fill;
}

fn apply_border(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let stroke = common::typed(
        cx.source,
        component,
        PropertyKey::BorderColor,
        PropertyValue::as_color,
    )
    .unwrap_or(Color::TRANSPARENT);
    let width = common::dimension(cx.source, component, PropertyKey::BorderWidth).unwrap_or(0.0);
    let layers = layers(cx.store, widget);
    layers.stroke = stroke;
    layers.stroke_width = width;
}

fn apply_radius(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let radius = common::dimension(cx.source, component, PropertyKey::BorderRadius).unwrap_or(0.0);
    let props = cx.store.props_mut(widget);
    let layers = props
        .background
        .get_or_insert_with(BackgroundLayers::default);
    layers.corner_radius = radius;
    props.clip_radius = layers.corner_radius;
}

impl Adapter for FrameAdapter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Frame
    }

    fn dispatch(&self) -> &DispatchTable {
        &self.table
    }

    fn create_widget(&self, store: &mut WidgetStore) -> WidgetId {
        let widget = store.create_widget(ComponentKind::Frame);
        store.props_mut(widget).background = Some(BackgroundLayers::default());
        widget
    }

    fn bind_properties(&self, cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
        apply_background(cx, component, widget);
        apply_border(cx, component, widget);
        apply_radius(cx, component, widget);
    }
}
