// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the synchronization loop.
//!
//! This module provides a [`SyncTraceSink`] trait with per-event methods that
//! the engine calls as it creates, binds, refreshes, reconciles, and
//! destroys widgets. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn SyncTraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::component::{ComponentId, ComponentKind, DirtySet};
use crate::load::LoadTicket;
use crate::widget::WidgetId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the engine starts processing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBeginEvent {
    /// Frame index reported by the component source.
    pub frame_index: u64,
    /// Number of components with a non-empty dirty set.
    pub dirty_components: usize,
}

/// Emitted when the engine finishes processing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEndEvent {
    /// Frame index reported by the component source.
    pub frame_index: u64,
    /// Widgets refreshed through their dispatch table.
    pub refreshed: usize,
    /// Containers whose children were reconciled.
    pub reconciled: usize,
    /// Widgets created during the frame.
    pub created: usize,
    /// Widgets destroyed during the frame.
    pub destroyed: usize,
}

/// Emitted after a widget is created and bound to a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetCreatedEvent {
    /// The component the widget serves.
    pub component: ComponentId,
    /// The new widget.
    pub widget: WidgetId,
    /// Variant of the component.
    pub kind: ComponentKind,
}

/// Emitted just before a widget is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetDestroyedEvent {
    /// The component the widget was bound to, if any.
    pub component: Option<ComponentId>,
    /// The widget being destroyed.
    pub widget: WidgetId,
}

/// Emitted after a full bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullBindEvent {
    /// The bound component.
    pub component: ComponentId,
    /// The widget that received every property.
    pub widget: WidgetId,
}

/// Emitted after a dirty refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshEvent<'a> {
    /// The refreshed component.
    pub component: ComponentId,
    /// Its widget.
    pub widget: WidgetId,
    /// Keys that were handed to the dispatch table.
    pub dirty: DirtySet,
    /// Handlers that ran, in invocation order.
    pub handlers: &'a [&'static str],
    /// Dirty keys the adapter does not handle.
    pub unrecognized: DirtySet,
}

/// Emitted after a container's children are reconciled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileEvent {
    /// The container component.
    pub container: ComponentId,
    /// The container's widget.
    pub widget: WidgetId,
    /// Number of children attached after reconciliation.
    pub attached: usize,
    /// Children whose widget was created.
    pub created: usize,
    /// Children whose existing widget was reattached.
    pub reattached: usize,
    /// Widgets that left the window and were kept alive.
    pub kept_detached: usize,
    /// Widgets destroyed, including descendants.
    pub destroyed: usize,
}

/// Emitted when an asynchronous completion no longer matches its widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaleCompletionEvent {
    /// Ticket carried by the dropped completion.
    pub ticket: LoadTicket,
}

// ---------------------------------------------------------------------------
// SyncTraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the synchronization loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait SyncTraceSink {
    /// Called when a frame begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when a frame ends.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called after a widget is created.
    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        _ = e;
    }

    /// Called before a widget is destroyed.
    fn on_widget_destroyed(&mut self, e: &WidgetDestroyedEvent) {
        _ = e;
    }

    /// Called after a full bind.
    fn on_full_bind(&mut self, e: &FullBindEvent) {
        _ = e;
    }

    /// Called after a dirty refresh.
    fn on_refresh(&mut self, e: &RefreshEvent<'_>) {
        _ = e;
    }

    /// Called after children reconciliation.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called when a stale completion is dropped.
    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`SyncTraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl SyncTraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`SyncTraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn SyncTraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn SyncTraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn SyncTraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WidgetCreatedEvent`].
    #[inline]
    pub fn widget_created(&mut self, e: &WidgetCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_widget_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WidgetDestroyedEvent`].
    #[inline]
    pub fn widget_destroyed(&mut self, e: &WidgetDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_widget_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FullBindEvent`].
    #[inline]
    pub fn full_bind(&mut self, e: &FullBindEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_full_bind(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RefreshEvent`].
    #[inline]
    pub fn refresh(&mut self, e: &RefreshEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_refresh(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reconcile(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StaleCompletionEvent`].
    #[inline]
    pub fn stale_completion(&mut self, e: &StaleCompletionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stale_completion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
