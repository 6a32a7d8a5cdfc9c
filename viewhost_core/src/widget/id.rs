// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget identity.

use core::fmt;

/// Sentinel value indicating "no widget" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a widget in a [`WidgetStore`](super::WidgetStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a widget is destroyed and its slot is reused. An
/// async result addressed to a stale handle is therefore never applied to
/// the widget that now occupies the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl WidgetId {
    /// Returns the raw slot index (for diagnostics and `*_at` accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({}@gen{})", self.idx, self.generation)
    }
}
