// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the widget store.
//!
//! The [`WidgetStore`](crate::widget::WidgetStore) uses multi-channel dirty
//! tracking (via [`understory_dirty`]) so that platform backends only touch
//! widgets that actually changed.
//!
//! # Propagation semantics
//!
//! - **Local** — [`PROPS`] is marked on the widget whose properties were
//!   written. Nothing propagates.
//!
//! - **Upward** — [`LAYOUT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges from
//!   parent to child. A layout request on a child marks every ancestor, since
//!   a child's measured size can change its parent's layout.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on the parent whenever a child
//!   is attached or detached, so backends can reorder that parent's native
//!   children in one pass.
//!
//! # Consumption
//!
//! [`WidgetStore::evaluate`](crate::widget::WidgetStore::evaluate) drains all
//! channels into [`WidgetChanges`](crate::widget::WidgetChanges), which
//! backends [consume](crate::backend::WidgetBackend::apply).

use understory_dirty::Channel;

/// Widget properties changed.
pub const PROPS: Channel = Channel::new(0);

/// Layout was requested; propagates to ancestors.
pub const LAYOUT: Channel = Channel::new(1);

/// Attached children changed.
pub const TOPOLOGY: Channel = Channel::new(2);
