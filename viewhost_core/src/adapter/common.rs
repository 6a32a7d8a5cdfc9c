// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties every adapter applies the same way.
//!
//! Full binds run these in a fixed order: bounds, padding, opacity,
//! display, disabled, accessibility, checked, focusable. The dispatch
//! entries returned by [`builder`] register the same functions in the same
//! order, so a refresh never runs them in a different sequence than a bind.
//! Padding is the exception: it belongs to the adapter, so
//! [`Adapter::refresh`](super::Adapter::refresh) reapplies it through
//! [`Adapter::apply_padding`](super::Adapter::apply_padding) whenever the
//! bounds change.
//!
//! Malformed values never abort a bind. A value of the wrong type is logged
//! at warn level and treated as absent; an out-of-range number is clamped.

use kurbo::{Insets, Rect};

use super::dispatch::{DispatchTable, DispatchTableBuilder};
use super::BindContext;
use crate::component::{
    ComponentId, ComponentSource, Display, LayoutMode, PropertyKey, PropertyValue, Role,
};
use crate::widget::{Visibility, WidgetId, WidgetStore};

/// Starts a dispatch table pre-populated with the common handlers.
#[must_use]
pub fn builder() -> DispatchTableBuilder {
    use PropertyKey as K;
    DispatchTable::builder()
        .on(&[K::Bounds, K::InnerBounds], "layout", apply_bounds)
        .on(&[K::Opacity], "opacity", apply_opacity)
        .on(&[K::Display], "display", apply_display)
        .on(&[K::Disabled], "disabled", apply_disabled)
        .on(&[K::AccessibilityLabel, K::Role], "accessibility", apply_accessibility)
        .on(&[K::Checked], "checked", apply_checked)
        .on(
            &[K::Disabled, K::Focusable, K::AccessibilityLabel, K::Role],
            "focusable",
            apply_focusable,
        )
}

/// Runs the common pipeline after bounds and padding.
pub fn bind_appearance(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    apply_opacity(cx, component, widget);
    apply_display(cx, component, widget);
    apply_disabled(cx, component, widget);
    apply_accessibility(cx, component, widget);
    apply_checked(cx, component, widget);
    apply_focusable(cx, component, widget);
}

// -- Typed reads --

/// Reads `key` through `get`, warning when it is declared with another type.
pub fn typed<T>(
    source: &dyn ComponentSource,
    component: ComponentId,
    key: PropertyKey,
    get: impl FnOnce(&PropertyValue) -> Option<T>,
) -> Option<T> {
    let value = source.property(component, key)?;
    let typed = get(value);
    if typed.is_none() {
        log::warn!("{component:?}: {key:?} has unexpected value {value:?}, using default");
    }
    typed
}

/// Reads `key` as a string, warning when it is declared with another type.
pub fn text<'s>(
    source: &'s dyn ComponentSource,
    component: ComponentId,
    key: PropertyKey,
) -> Option<&'s str> {
    let value = source.property(component, key)?;
    let text = value.as_text();
    if text.is_none() {
        log::warn!("{component:?}: {key:?} has unexpected value {value:?}, using default");
    }
    text
}

/// Reads `key` as a finite number, warning on the wrong type or NaN.
pub fn finite(
    source: &dyn ComponentSource,
    component: ComponentId,
    key: PropertyKey,
) -> Option<f64> {
    let n = typed(source, component, key, PropertyValue::as_number)?;
    if n.is_finite() {
        Some(n)
    } else {
        log::warn!("{component:?}: {key:?} is not finite ({n}), using default");
        None
    }
}

/// Reads `key` as a non-negative dimension; negative values clamp to zero.
pub fn dimension(
    source: &dyn ComponentSource,
    component: ComponentId,
    key: PropertyKey,
) -> Option<f64> {
    let n = finite(source, component, key)?;
    if n < 0.0 {
        log::warn!("{component:?}: {key:?} is negative ({n}), clamped to 0");
        return Some(0.0);
    }
    Some(n)
}

// -- Layout --

/// Normalizes a rectangle so `x0 <= x1` and `y0 <= y1`; non-finite edges become 0.
#[must_use]
pub fn sanitize_rect(rect: Rect) -> Rect {
    let f = |v: f64| if v.is_finite() { v } else { 0.0 };
    let (x0, x1) = (f(rect.x0), f(rect.x1));
    let (y0, y1) = (f(rect.y0), f(rect.y1));
    Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Per-edge inset of `inner` inside `bounds`, clamped to be non-negative.
#[must_use]
pub fn derive_padding(bounds: Rect, inner: Rect) -> Insets {
    let bounds = sanitize_rect(bounds);
    let inner = sanitize_rect(inner);
    Insets::new(
        (inner.x0 - bounds.x0).max(0.0),
        (inner.y0 - bounds.y0).max(0.0),
        (bounds.x1 - inner.x1).max(0.0),
        (bounds.y1 - inner.y1).max(0.0),
    )
}

/// Copies the component bounds into the widget frame and requests layout.
pub fn apply_bounds(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let frame = sanitize_rect(cx.source.bounds(component));
    cx.store.props_mut(widget).frame = frame;
    cx.store.request_layout(widget);
}

/// Applies padding for `mode`.
pub fn apply_padding(
    cx: &mut BindContext<'_>,
    component: ComponentId,
    widget: WidgetId,
    mode: LayoutMode,
) {
    match mode {
        LayoutMode::Absolute => apply_padding_absolute(cx, component, widget),
        LayoutMode::Box => apply_padding_box(cx, component, widget),
    }
}

/// Box layout: padding is `bounds - inner_bounds` per edge.
pub fn apply_padding_box(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let padding = derive_padding(
        cx.source.bounds(component),
        cx.source.inner_bounds(component),
    );
    cx.store.props_mut(widget).padding = padding;
}

/// Absolute layout: children are positioned from their own bounds, so the
/// widget never carries padding.
pub fn apply_padding_absolute(cx: &mut BindContext<'_>, _: ComponentId, widget: WidgetId) {
    cx.store.props_mut(widget).padding = Insets::ZERO;
}

// -- Appearance --

/// Applies the declared opacity, clamped into `[0, 1]`.
///
/// When the component does not declare an opacity the widget gets its
/// variant's default alpha. NaN is treated as fully opaque.
pub fn apply_opacity(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let default = cx.store.kind(widget).default_alpha();
    let alpha = match typed(cx.source, component, PropertyKey::Opacity, PropertyValue::as_number) {
        None => default,
        Some(n) if n.is_nan() => 1.0,
        Some(n) => unit_alpha(n),
    };
    cx.store.props_mut(widget).alpha = alpha;
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to [0, 1] before narrowing"
)]
fn unit_alpha(n: f64) -> f32 {
    n.clamp(0.0, 1.0) as f32
}

/// Effective visibility of `component`.
///
/// The layout-driven invisible override wins over the declared display.
#[must_use]
pub fn display_state(source: &dyn ComponentSource, component: ComponentId) -> Visibility {
    if source.invisible_override(component) {
        return Visibility::Invisible;
    }
    match typed(source, component, PropertyKey::Display, PropertyValue::as_display) {
        None | Some(Display::Normal) => Visibility::Visible,
        Some(Display::Invisible) => Visibility::Invisible,
        Some(Display::None) => Visibility::Gone,
    }
}

/// Applies [`display_state`].
pub fn apply_display(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let visibility = display_state(cx.source, component);
    cx.store.props_mut(widget).visibility = visibility;
}

fn is_disabled(source: &dyn ComponentSource, component: ComponentId) -> bool {
    typed(source, component, PropertyKey::Disabled, PropertyValue::as_bool).unwrap_or(false)
}

/// Enables or disables input.
pub fn apply_disabled(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let enabled = !is_disabled(cx.source, component);
    cx.store.props_mut(widget).enabled = enabled;
}

/// Applies the accessibility label and role.
pub fn apply_accessibility(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let label = text(cx.source, component, PropertyKey::AccessibilityLabel)
        .filter(|l| !l.is_empty())
        .map(String::from);
    let role = typed(cx.source, component, PropertyKey::Role, PropertyValue::as_role)
        .unwrap_or_default();
    let props = cx.store.props_mut(widget);
    props.content_description = label;
    props.role = role;
}

/// Applies the checked state.
pub fn apply_checked(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let checked =
        typed(cx.source, component, PropertyKey::Checked, PropertyValue::as_bool).unwrap_or(false);
    cx.store.props_mut(widget).checked = checked;
}

/// Whether assistive technology has something to announce for `component`.
#[must_use]
pub fn has_accessibility_content(source: &dyn ComponentSource, component: ComponentId) -> bool {
    let label = source
        .text_property(component, PropertyKey::AccessibilityLabel)
        .is_some_and(|l| !l.is_empty());
    let adjustable = source
        .property(component, PropertyKey::Role)
        .and_then(PropertyValue::as_role)
        == Some(Role::Adjustable);
    label || adjustable
}

/// The focus rule: focusable and enabled, or forced on for assistive
/// technology when there is something to announce.
#[must_use]
pub const fn focusable_state(
    is_focusable: bool,
    disabled: bool,
    screen_reader: bool,
    has_accessibility_content: bool,
) -> bool {
    (is_focusable && !disabled) || (screen_reader && has_accessibility_content)
}

/// Recomputes focusability from the current inputs.
pub fn apply_focusable(cx: &mut BindContext<'_>, component: ComponentId, widget: WidgetId) {
    let is_focusable = typed(cx.source, component, PropertyKey::Focusable, PropertyValue::as_bool)
        .unwrap_or_else(|| cx.store.kind(widget).default_focusable());
    let focusable = focusable_state(
        is_focusable,
        is_disabled(cx.source, component),
        cx.env.screen_reader_enabled,
        has_accessibility_content(cx.source, component),
    );
    cx.store.props_mut(widget).focusable = focusable;
}

/// Installs or removes the press handler, then sets clickability to match.
///
/// Installing a handler makes a platform widget clickable as a side effect,
/// so clickability is written last.
pub fn bind_click_handler(store: &mut WidgetStore, widget: WidgetId, present: bool) {
    store.props_mut(widget).click_handler = present;
    store.props_mut(widget).clickable = present;
}
