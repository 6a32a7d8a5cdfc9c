// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`SyncTraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Widget handles are recorded as their raw index and generation, since a
//! [`WidgetId`] can only be minted by the store that owns it.

use viewhost_core::component::{ComponentId, ComponentKind, DirtySet, PropertyKey};
use viewhost_core::trace::{
    FrameBeginEvent, FrameEndEvent, FullBindEvent, ReconcileEvent, RefreshEvent,
    StaleCompletionEvent, SyncTraceSink, WidgetCreatedEvent, WidgetDestroyedEvent,
};
use viewhost_core::widget::WidgetId;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_FRAME_END: u8 = 2;
const TAG_WIDGET_CREATED: u8 = 3;
const TAG_WIDGET_DESTROYED: u8 = 4;
const TAG_FULL_BIND: u8 = 5;
const TAG_REFRESH: u8 = 6;
const TAG_RECONCILE: u8 = 7;
const TAG_STALE_COMPLETION: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`SyncTraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "counts capped at u32::MAX for recording"
        )]
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }

    fn write_widget(&mut self, w: WidgetId) {
        self.write_u32(w.index());
        self.write_u32(w.generation());
    }

    fn write_component(&mut self, c: ComponentId) {
        self.write_u64(c.0);
    }

    fn write_kind(&mut self, kind: ComponentKind) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "ComponentKind::COUNT fits in a byte"
        )]
        self.write_u8(kind.index() as u8);
    }

    fn write_key(&mut self, key: PropertyKey) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "PropertyKey::COUNT fits in a byte"
        )]
        self.write_u8(key.index() as u8);
    }

    /// Writes `s` with a `u16` length prefix, cut back to a character
    /// boundary if it does not fit.
    fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let mut len = bytes.len().min(usize::from(u16::MAX));
        while !s.is_char_boundary(len) {
            len -= 1;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length clamped to u16::MAX above"
        )]
        self.buf.extend_from_slice(&(len as u16).to_le_bytes());
        self.buf.extend_from_slice(&bytes[..len]);
    }
}

impl SyncTraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_count(e.dirty_components);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
        self.write_count(e.refreshed);
        self.write_count(e.reconciled);
        self.write_count(e.created);
        self.write_count(e.destroyed);
    }

    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        self.write_u8(TAG_WIDGET_CREATED);
        self.write_component(e.component);
        self.write_widget(e.widget);
        self.write_kind(e.kind);
    }

    fn on_widget_destroyed(&mut self, e: &WidgetDestroyedEvent) {
        self.write_u8(TAG_WIDGET_DESTROYED);
        match e.component {
            Some(c) => {
                self.write_u8(1);
                self.write_component(c);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
        self.write_widget(e.widget);
    }

    fn on_full_bind(&mut self, e: &FullBindEvent) {
        self.write_u8(TAG_FULL_BIND);
        self.write_component(e.component);
        self.write_widget(e.widget);
    }

    fn on_refresh(&mut self, e: &RefreshEvent<'_>) {
        self.write_u8(TAG_REFRESH);
        self.write_component(e.component);
        self.write_widget(e.widget);
        self.write_u64(e.dirty.bits());
        self.write_u64(e.unrecognized.bits());
        self.write_count(e.handlers.len());
        for name in e.handlers {
            self.write_str(name);
        }
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.write_u8(TAG_RECONCILE);
        self.write_component(e.container);
        self.write_widget(e.widget);
        self.write_count(e.attached);
        self.write_count(e.created);
        self.write_count(e.reattached);
        self.write_count(e.kept_detached);
        self.write_count(e.destroyed);
    }

    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        self.write_u8(TAG_STALE_COMPLETION);
        self.write_u64(e.ticket.id);
        self.write_component(e.ticket.component);
        self.write_widget(e.ticket.widget);
        self.write_key(e.ticket.key);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A recorded widget handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetRef {
    /// Slot index.
    pub index: u32,
    /// Generation of the slot when the event was recorded.
    pub generation: u32,
}

impl From<WidgetId> for WidgetRef {
    fn from(id: WidgetId) -> Self {
        Self {
            index: id.index(),
            generation: id.generation(),
        }
    }
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
    /// A [`WidgetCreatedEvent`].
    WidgetCreated {
        /// Bound component.
        component: ComponentId,
        /// New widget.
        widget: WidgetRef,
        /// Component variant.
        kind: ComponentKind,
    },
    /// A [`WidgetDestroyedEvent`].
    WidgetDestroyed {
        /// Component the widget was bound to, if any.
        component: Option<ComponentId>,
        /// Destroyed widget.
        widget: WidgetRef,
    },
    /// A [`FullBindEvent`].
    FullBind {
        /// Bound component.
        component: ComponentId,
        /// Bound widget.
        widget: WidgetRef,
    },
    /// A [`RefreshEvent`].
    Refresh {
        /// Refreshed component.
        component: ComponentId,
        /// Its widget.
        widget: WidgetRef,
        /// Keys handed to the dispatch table.
        dirty: DirtySet,
        /// Keys no handler claimed.
        unrecognized: DirtySet,
        /// Handler names, in invocation order.
        handlers: Vec<String>,
    },
    /// A [`ReconcileEvent`].
    Reconcile {
        /// Container component.
        container: ComponentId,
        /// Container widget.
        widget: WidgetRef,
        /// Children attached afterwards.
        attached: u32,
        /// Children created.
        created: u32,
        /// Children reattached.
        reattached: u32,
        /// Widgets kept detached.
        kept_detached: u32,
        /// Widgets destroyed.
        destroyed: u32,
    },
    /// A [`StaleCompletionEvent`].
    StaleCompletion {
        /// Ticket id.
        id: u64,
        /// Component named by the ticket.
        component: ComponentId,
        /// Widget named by the ticket.
        widget: WidgetRef,
        /// Property the load resolved.
        key: PropertyKey,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecodeIter<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let data = self.data;
        let end = self.pos.checked_add(n)?;
        let bytes = data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.take(2)?.try_into().ok()?))
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_component(&mut self) -> Option<ComponentId> {
        Some(ComponentId(self.read_u64()?))
    }

    fn read_widget(&mut self) -> Option<WidgetRef> {
        Some(WidgetRef {
            index: self.read_u32()?,
            generation: self.read_u32()?,
        })
    }

    fn read_kind(&mut self) -> Option<ComponentKind> {
        ComponentKind::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_key(&mut self) -> Option<PropertyKey> {
        PropertyKey::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_string(&mut self) -> Option<String> {
        let len = usize::from(self.read_u16()?);
        let bytes = self.take(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            dirty_components: self.read_count()?,
        }))
    }

    fn decode_frame_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameEnd(FrameEndEvent {
            frame_index: self.read_u64()?,
            refreshed: self.read_count()?,
            reconciled: self.read_count()?,
            created: self.read_count()?,
            destroyed: self.read_count()?,
        }))
    }

    fn decode_widget_created(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::WidgetCreated {
            component: self.read_component()?,
            widget: self.read_widget()?,
            kind: self.read_kind()?,
        })
    }

    fn decode_widget_destroyed(&mut self) -> Option<RecordedEvent> {
        let present = self.read_u8()?;
        let component = self.read_component()?;
        Some(RecordedEvent::WidgetDestroyed {
            component: (present != 0).then_some(component),
            widget: self.read_widget()?,
        })
    }

    fn decode_full_bind(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FullBind {
            component: self.read_component()?,
            widget: self.read_widget()?,
        })
    }

    fn decode_refresh(&mut self) -> Option<RecordedEvent> {
        let component = self.read_component()?;
        let widget = self.read_widget()?;
        let dirty = DirtySet::from_bits(self.read_u64()?);
        let unrecognized = DirtySet::from_bits(self.read_u64()?);
        let count = self.read_count()?;
        let handlers = (0..count)
            .map(|_| self.read_string())
            .collect::<Option<Vec<_>>>()?;
        Some(RecordedEvent::Refresh {
            component,
            widget,
            dirty,
            unrecognized,
            handlers,
        })
    }

    fn decode_reconcile(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reconcile {
            container: self.read_component()?,
            widget: self.read_widget()?,
            attached: self.read_u32()?,
            created: self.read_u32()?,
            reattached: self.read_u32()?,
            kept_detached: self.read_u32()?,
            destroyed: self.read_u32()?,
        })
    }

    fn decode_stale_completion(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StaleCompletion {
            id: self.read_u64()?,
            component: self.read_component()?,
            widget: self.read_widget()?,
            key: self.read_key()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_FRAME_END => self.decode_frame_end(),
            TAG_WIDGET_CREATED => self.decode_widget_created(),
            TAG_WIDGET_DESTROYED => self.decode_widget_destroyed(),
            TAG_FULL_BIND => self.decode_full_bind(),
            TAG_REFRESH => self.decode_refresh(),
            TAG_RECONCILE => self.decode_reconcile(),
            TAG_STALE_COMPLETION => self.decode_stale_completion(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
