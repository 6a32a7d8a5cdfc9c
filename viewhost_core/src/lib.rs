// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeps a platform widget tree synchronized with an external component tree.
//!
//! `viewhost_core` sits between a layout engine that owns an authoritative
//! tree of *components* and a platform that displays *widgets*. It
//! materializes components into widgets, applies per-frame property changes
//! with minimal work, and keeps virtualized containers' attached children
//! equal to the window the engine currently displays.
//!
//! # Architecture
//!
//! ```text
//!   ComponentSource (external engine)
//!       │  dirty components, dirty keys, displayed children
//!       ▼
//!   SyncEngine::sync_frame()
//!       │
//!       ├──► AdapterRegistry::resolve(kind) ──► Adapter
//!       │                                        │
//!       │         create_widget / full_bind ◄────┤
//!       │         refresh ──► DispatchTable ◄────┘
//!       │
//!       ├──► reconcile children (materialize)
//!       │
//!       ▼
//!   WidgetStore::evaluate() ──► WidgetChanges ──► WidgetBackend::apply()
//!
//!   Loader (worker pool) ──► CompletionSender ──► SyncEngine::drain_completions()
//! ```
//!
//! **[`component`]** — The boundary with the external engine:
//! [`ComponentSource`](component::ComponentSource) for reads,
//! [`UpdateSink`](component::UpdateSink) for user-originated writes, and
//! the in-memory [`ComponentTree`](component::ComponentTree).
//!
//! **[`widget`]** — Struct-of-arrays widget store with generational handles.
//!
//! **[`dirty`]** — Widget-side dirty channels via `understory_dirty`. Layout
//! requests propagate to ancestors.
//!
//! **[`adapter`]** — One [`Adapter`](adapter::Adapter) per component
//! variant, the shared property pipeline in [`adapter::common`], and the
//! dirty-key [`DispatchTable`](adapter::DispatchTable).
//!
//! **[`registry`]** — Exact-variant adapter lookup, built eagerly and
//! immutable afterwards.
//!
//! **[`materialize`]** — Children reconciliation and recycle policies.
//!
//! **[`presenter`]** — The single component-to-widget binding map.
//!
//! **[`load`]** — Message-passing asynchronous loads with identity-checked
//! completions.
//!
//! **[`engine`]** — [`SyncEngine`](engine::SyncEngine), which drives all of
//! the above once per frame.
//!
//! **[`backend`]** — The [`WidgetBackend`](backend::WidgetBackend) trait
//! platform integrations implement.
//!
//! **[`trace`]** — [`SyncTraceSink`](trace::SyncTraceSink) and the
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use viewhost_core::component::{ComponentKind, ComponentTree, PropertyKey};
//! use viewhost_core::config::SyncConfig;
//! use viewhost_core::engine::SyncEngine;
//! use viewhost_core::registry::AdapterRegistry;
//!
//! let mut tree = ComponentTree::new();
//! let root = tree.create(ComponentKind::Frame);
//! let label = tree.create(ComponentKind::Text);
//! tree.append_child(root, label);
//! tree.set(label, PropertyKey::Text, "Hello");
//!
//! let mut engine = SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new());
//! let widget = engine.inflate_hierarchy(&tree, root).unwrap();
//! assert_eq!(engine.store().child_count(widget), 1);
//! tree.end_frame();
//!
//! tree.set(label, PropertyKey::Opacity, 0.5);
//! let report = engine.sync_frame(&tree);
//! assert_eq!(report.refreshed, 1);
//! ```
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod adapter;
pub mod backend;
pub mod component;
pub mod config;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod load;
pub mod materialize;
pub mod presenter;
pub mod registry;
pub mod trace;
pub mod widget;
