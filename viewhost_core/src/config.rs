// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use crate::component::ComponentKind;
use crate::materialize::RecyclePolicy;

/// Configuration for a [`SyncEngine`](crate::engine::SyncEngine).
///
/// Use one of the `const` presets and adjust fields as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Per-kind overrides of [`ComponentKind::default_recycle_policy`],
    /// indexed by [`ComponentKind::index`].
    pub recycle_overrides: [Option<RecyclePolicy>; ComponentKind::COUNT],
    /// Whether to check, after every reconciliation, that the attached
    /// widgets match the displayed children.
    pub verify_reconciliation: bool,
    /// Maximum number of detached widgets a single container keeps alive.
    /// The oldest are destroyed first. `None` keeps all of them.
    pub max_detached_per_container: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncConfig {
    /// Default configuration: per-kind recycle policies, verification in
    /// debug builds, and no cap on detached widgets.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recycle_overrides: [None; ComponentKind::COUNT],
            verify_reconciliation: cfg!(debug_assertions),
            max_detached_per_container: None,
        }
    }

    /// Configuration for memory-constrained hosts: each container keeps at
    /// most eight detached widgets.
    #[must_use]
    pub const fn low_memory() -> Self {
        Self {
            max_detached_per_container: Some(8),
            ..Self::new()
        }
    }

    /// Overrides the recycle policy for containers of `kind`.
    #[must_use]
    pub const fn with_recycle_policy(mut self, kind: ComponentKind, policy: RecyclePolicy) -> Self {
        self.recycle_overrides[kind.index()] = Some(policy);
        self
    }

    /// The effective recycle policy for containers of `kind`.
    #[must_use]
    pub const fn recycle_policy(&self, kind: ComponentKind) -> RecyclePolicy {
        match self.recycle_overrides[kind.index()] {
            Some(policy) => policy,
            None => kind.default_recycle_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence() {
        let config = SyncConfig::new()
            .with_recycle_policy(ComponentKind::Container, RecyclePolicy::KeepDetached)
            .with_recycle_policy(ComponentKind::Sequence, RecyclePolicy::Destroy);
        assert_eq!(
            config.recycle_policy(ComponentKind::Container),
            RecyclePolicy::KeepDetached
        );
        assert_eq!(
            config.recycle_policy(ComponentKind::Sequence),
            RecyclePolicy::Destroy
        );
        assert_eq!(
            config.recycle_policy(ComponentKind::Pager),
            RecyclePolicy::KeepDetached
        );
    }

    #[test]
    fn low_memory_caps_detached_widgets() {
        assert_eq!(SyncConfig::low_memory().max_detached_per_container, Some(8));
        assert_eq!(SyncConfig::new().max_detached_per_container, None);
    }
}
