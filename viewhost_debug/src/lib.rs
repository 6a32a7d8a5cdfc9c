// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and snapshot export for viewhost diagnostics.
//!
//! This crate provides [`SyncTraceSink`](viewhost_core::trace::SyncTraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`snapshot::to_json`]: a JSON dump of a widget subtree, for diffing the
//!   widget tree between frames. [`snapshot::engine_to_json`] dumps every
//!   root an engine inflated.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
