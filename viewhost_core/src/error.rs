// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only configuration problems and references to components the source does
//! not know are errors. Malformed property values are clamped or defaulted
//! by the adapters and never surface here.

use crate::component::{ComponentId, ComponentKind};
use crate::widget::WidgetId;

/// A problem with the adapter registry.
///
/// These are configuration errors: they are expected at startup, when the
/// registry is built, and are fatal there.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two adapters were registered for the same variant.
    #[error("an adapter for {0:?} is already registered")]
    Duplicate(ComponentKind),
    /// No adapter is registered for the variant.
    #[error("no adapter is registered for {0:?}")]
    Unmapped(ComponentKind),
    /// The registry was built without adapters for required variants.
    #[error("required adapters are missing for {0:?}")]
    MissingRequired(Vec<ComponentKind>),
}

/// A problem encountered while synchronizing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The component source has no component with this id.
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),
    /// Adapter lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The widget handle no longer refers to a live widget.
    #[error("stale widget handle {0:?}")]
    StaleWidget(WidgetId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_convert() {
        let err: SyncError = RegistryError::Unmapped(ComponentKind::Pager).into();
        assert_eq!(
            err,
            SyncError::Registry(RegistryError::Unmapped(ComponentKind::Pager))
        );
        assert_eq!(err.to_string(), "no adapter is registered for Pager");
    }
}
