// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary with the external component tree.
//!
//! A *component* is a node in the authoritative layout tree produced by an
//! engine outside this crate. Each component has:
//!
//! - A stable identity ([`ComponentId`]).
//! - A variant tag ([`ComponentKind`]) drawn from a closed set.
//! - Bounds and inner bounds, produced by layout.
//! - Typed properties keyed by [`PropertyKey`].
//! - A per-frame [`DirtySet`] of keys that changed since the last frame.
//!
//! The engine exposes all of this through [`ComponentSource`]. User input
//! flows back through [`UpdateSink`]. [`ComponentTree`] implements both and
//! serves as the reference engine for tests and demos.

mod key;
mod kind;
mod source;
mod tree;
mod value;

pub use key::{DirtySet, PropertyKey};
pub use kind::{ComponentKind, LayoutMode};
pub use source::{ComponentId, ComponentSource, UpdateKind, UpdateSink};
pub use tree::ComponentTree;
pub use value::{
    Align, Color, Display, Navigation, PropertyValue, Role, Scale, ScrollDirection, TextAlign,
};
