// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable widget state.
//!
//! [`WidgetProps`] is what a platform backend mirrors onto its native
//! objects. Adapters write it; nothing else does.

use kurbo::{Insets, Rect};

use crate::component::{
    Align, Color, ComponentKind, Navigation, Role, Scale, ScrollDirection, TextAlign,
};

/// Platform visibility of a widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Drawn and laid out.
    #[default]
    Visible,
    /// Laid out but not drawn.
    Invisible,
    /// Neither drawn nor laid out.
    Gone,
}

/// Layered background decoration owned by frame-like widgets.
///
/// Created with the widget and reused across binds. The corner radius lives
/// on the background so the widget clip can reuse the same shape.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundLayers {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width, never negative.
    pub stroke_width: f64,
    /// Corner radius, never negative.
    pub corner_radius: f64,
}

/// Text decoration owned by text-like widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct TextState {
    /// Displayed text.
    pub text: String,
    /// Text color.
    pub color: Color,
    /// Font size, always positive.
    pub font_size: f64,
    /// Maximum lines; `0` means unlimited.
    pub max_lines: u32,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Placeholder shown while `text` is empty.
    pub placeholder: String,
    /// Whether a submit handler is installed.
    pub submit_handler: bool,
}

impl TextState {
    /// Default font size used when none (or an invalid one) is declared.
    pub const DEFAULT_FONT_SIZE: f64 = 40.0;
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color::WHITE,
            font_size: Self::DEFAULT_FONT_SIZE,
            max_lines: 0,
            align: TextAlign::Auto,
            placeholder: String::new(),
            submit_handler: false,
        }
    }
}

/// Loading state of an asynchronously resolved resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResourceState {
    /// No source declared.
    #[default]
    Empty,
    /// A request is in flight; the widget renders its pending state.
    Pending {
        /// Ticket identifying the in-flight request.
        ticket: u64,
        /// Requested source.
        source: String,
    },
    /// The resource resolved.
    Loaded {
        /// Resolved source.
        source: String,
        /// Intrinsic width in pixels.
        width: u32,
        /// Intrinsic height in pixels.
        height: u32,
    },
    /// The request failed; the widget renders its empty state.
    Failed {
        /// Source that failed.
        source: String,
    },
    /// Content the host does not render itself (media); the widget shows a
    /// static placeholder for it.
    Placeholder {
        /// Declared source.
        source: String,
    },
}

impl ResourceState {
    /// The source this state refers to, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Pending { source, .. }
            | Self::Loaded { source, .. }
            | Self::Failed { source }
            | Self::Placeholder { source } => Some(source),
        }
    }
}

/// Resource decoration owned by image-like widgets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceView {
    /// Loading state.
    pub state: ResourceState,
    /// Scaling.
    pub scale: Scale,
    /// Alignment.
    pub align: Align,
}

/// Scroll decoration owned by scrollable widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Scroll offset along `direction`, never negative.
    pub position: f64,
    /// Scroll axis.
    pub direction: ScrollDirection,
}

/// Pager decoration owned by pager widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PagerState {
    /// Current page index.
    pub current: usize,
    /// Navigation policy.
    pub navigation: Navigation,
}

/// Every observable property of a widget.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetProps {
    /// Variant the widget was created for.
    pub kind: ComponentKind,
    /// Frame in parent coordinates.
    pub frame: Rect,
    /// Platform padding. Always zero for absolute-layout widgets.
    pub padding: Insets,
    /// Alpha in `[0, 1]`.
    pub alpha: f32,
    /// Visibility.
    pub visibility: Visibility,
    /// Whether the widget accepts input.
    pub enabled: bool,
    /// Whether the widget can take focus.
    pub focusable: bool,
    /// Whether the widget reacts to presses.
    pub clickable: bool,
    /// Whether a press handler is installed.
    pub click_handler: bool,
    /// Checked state.
    pub checked: bool,
    /// Accessibility description.
    pub content_description: Option<String>,
    /// Accessibility role.
    pub role: Role,
    /// Clip corner radius, shared with the background shape.
    pub clip_radius: f64,
    /// Background decoration.
    pub background: Option<BackgroundLayers>,
    /// Text decoration.
    pub text: Option<TextState>,
    /// Resource decoration.
    pub resource: Option<ResourceView>,
    /// Scroll decoration.
    pub scroll: Option<ScrollState>,
    /// Pager decoration.
    pub pager: Option<PagerState>,
    /// Number of full binds applied to this widget.
    pub bind_count: u32,
}

impl WidgetProps {
    /// Default properties for a freshly created widget of `kind`.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            frame: Rect::ZERO,
            padding: Insets::ZERO,
            alpha: kind.default_alpha(),
            visibility: Visibility::Visible,
            enabled: true,
            focusable: kind.default_focusable(),
            clickable: false,
            click_handler: false,
            checked: false,
            content_description: None,
            role: Role::None,
            clip_radius: 0.0,
            background: None,
            text: None,
            resource: None,
            scroll: None,
            pager: None,
            bind_count: 0,
        }
    }
}
