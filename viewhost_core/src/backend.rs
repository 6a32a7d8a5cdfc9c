// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The engine never touches native widgets directly. It writes into the
//! [`WidgetStore`], and a platform backend replays the evaluated changes
//! onto the native tree (Android views, `UIView`s, DOM elements, ...).
//!
//! # Crate boundaries
//!
//! `viewhost_core` owns the component boundary, the widget model, the
//! adapters, and the engine. Backend crates depend on `viewhost_core` and
//! implement [`WidgetBackend`]. Application code wires them together in a
//! frame loop.

use crate::widget::{WidgetChanges, WidgetStore};

/// Applies evaluated widget changes to a platform-native tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(engine: &mut SyncEngine, tree: &mut ComponentTree) {
///     // Apply results that arrived from loaders since the last frame.
///     engine.drain_completions(tree);
///
///     // Create, bind, refresh, and reconcile for this frame's dirty keys.
///     engine.sync_frame(tree);
///
///     // Hand new requests to the worker pool.
///     engine.dispatch_loads(&mut loader);
///
///     // Evaluate and replay the widget-side changes natively.
///     engine.present(&mut backend);
///
///     tree.end_frame();
/// }
/// ```
pub trait WidgetBackend {
    /// Applies the given [`WidgetChanges`] to the native tree, reading
    /// current property values from `store` as needed.
    fn apply(&mut self, store: &WidgetStore, changes: &WidgetChanges);
}

/// A [`WidgetBackend`] that records every batch it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    /// Every applied batch, oldest first.
    pub frames: Vec<WidgetChanges>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent batch.
    #[must_use]
    pub fn last(&self) -> Option<&WidgetChanges> {
        self.frames.last()
    }
}

impl WidgetBackend for RecordingBackend {
    fn apply(&mut self, _store: &WidgetStore, changes: &WidgetChanges) {
        self.frames.push(changes.clone());
    }
}
