// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform widget model.
//!
//! Widgets are the retained, platform-side mirror of components. They live
//! in a struct-of-arrays [`WidgetStore`] and are addressed by generational
//! [`WidgetId`] handles, so a handle held past the widget's destruction is
//! detected rather than silently aliased to a recycled slot.

mod evaluate;
mod id;
mod props;
mod store;

pub use evaluate::WidgetChanges;
pub use id::{INVALID, WidgetId};
pub use props::{
    BackgroundLayers, PagerState, ResourceState, ResourceView, ScrollState, TextState,
    Visibility, WidgetProps,
};
pub use store::{Children, WidgetStore};
