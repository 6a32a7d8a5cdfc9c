// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact-variant adapter lookup.
//!
//! The registry maps every [`ComponentKind`] to exactly one [`Adapter`]. It
//! is built once, eagerly, and is immutable afterwards: there is no way to
//! add or replace an adapter on a built registry.
//!
//! ```
//! use viewhost_core::component::ComponentKind;
//! use viewhost_core::registry::AdapterRegistry;
//!
//! let registry = AdapterRegistry::standard();
//! let adapter = registry.resolve(ComponentKind::Pager).unwrap();
//! assert_eq!(adapter.kind(), ComponentKind::Pager);
//! ```

use core::fmt;

use crate::adapter::{self, Adapter};
use crate::component::ComponentKind;
use crate::error::RegistryError;

/// An immutable table of adapters indexed by component variant.
pub struct AdapterRegistry {
    adapters: [Option<Box<dyn Adapter>>; ComponentKind::COUNT],
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl AdapterRegistry {
    /// Returns a builder with no adapters registered.
    #[must_use]
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder {
            adapters: core::array::from_fn(|_| None),
            optional: [false; ComponentKind::COUNT],
        }
    }

    /// Builds a registry holding the built-in adapter for every variant.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            adapters: core::array::from_fn(|i| Some(adapter::builtin(ComponentKind::ALL[i]))),
        }
    }

    /// Returns the adapter for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unmapped`] if the registry was built with
    /// `kind` marked optional and no adapter was registered for it.
    pub fn resolve(&self, kind: ComponentKind) -> Result<&dyn Adapter, RegistryError> {
        self.adapters[kind.index()]
            .as_deref()
            .ok_or(RegistryError::Unmapped(kind))
    }

    /// Iterates the variants that have an adapter.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.adapters[kind.index()].is_some())
    }
}

/// Collects adapters for an [`AdapterRegistry`].
pub struct AdapterRegistryBuilder {
    adapters: [Option<Box<dyn Adapter>>; ComponentKind::COUNT],
    optional: [bool; ComponentKind::COUNT],
}

impl fmt::Debug for AdapterRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<_> = ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.adapters[kind.index()].is_some())
            .collect();
        f.debug_struct("AdapterRegistryBuilder")
            .field("registered", &registered)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl AdapterRegistryBuilder {
    /// Registers `adapter` for the variant it reports.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if that variant already has an
    /// adapter.
    pub fn register(&mut self, adapter: Box<dyn Adapter>) -> Result<&mut Self, RegistryError> {
        let kind = adapter.kind();
        let slot = &mut self.adapters[kind.index()];
        if slot.is_some() {
            return Err(RegistryError::Duplicate(kind));
        }
        *slot = Some(adapter);
        Ok(self)
    }

    /// Registers the built-in adapter for each of `kinds`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] on the first variant that already
    /// has an adapter.
    pub fn register_builtin(
        &mut self,
        kinds: &[ComponentKind],
    ) -> Result<&mut Self, RegistryError> {
        for &kind in kinds {
            self.register(adapter::builtin(kind))?;
        }
        Ok(self)
    }

    /// Lets [`build`](Self::build) succeed without an adapter for `kind`.
    ///
    /// Resolving such a variant later yields [`RegistryError::Unmapped`].
    pub fn allow_missing(&mut self, kind: ComponentKind) -> &mut Self {
        self.optional[kind.index()] = true;
        self
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingRequired`] listing every variant that
    /// has no adapter and was not marked optional.
    pub fn build(self) -> Result<AdapterRegistry, RegistryError> {
        let missing: Vec<_> = ComponentKind::ALL
            .into_iter()
            .filter(|kind| {
                self.adapters[kind.index()].is_none() && !self.optional[kind.index()]
            })
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::MissingRequired(missing));
        }
        Ok(AdapterRegistry {
            adapters: self.adapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ContainerAdapter, TextAdapter};

    #[test]
    fn standard_resolves_every_kind_exactly() {
        let registry = AdapterRegistry::standard();
        for kind in ComponentKind::ALL {
            let adapter = registry.resolve(kind).unwrap();
            assert_eq!(adapter.kind(), kind, "resolved by exact variant");
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut builder = AdapterRegistry::builder();
        builder.register(Box::new(TextAdapter::new())).unwrap();
        let err = builder.register(Box::new(TextAdapter::new())).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate(ComponentKind::Text));
    }

    #[test]
    fn build_reports_missing_kinds() {
        let mut builder = AdapterRegistry::builder();
        let kinds: Vec<_> = ComponentKind::ALL
            .into_iter()
            .filter(|k| !matches!(k, ComponentKind::Video | ComponentKind::Virtual))
            .collect();
        builder.register_builtin(&kinds).unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            RegistryError::MissingRequired(vec![ComponentKind::Video, ComponentKind::Virtual])
        );
    }

    #[test]
    fn optional_kinds_resolve_to_unmapped() {
        let mut builder = AdapterRegistry::builder();
        builder.register(Box::new(ContainerAdapter::new())).unwrap();
        for kind in ComponentKind::ALL {
            if kind != ComponentKind::Container {
                builder.allow_missing(kind);
            }
        }
        let registry = builder.build().unwrap();
        assert!(registry.resolve(ComponentKind::Container).is_ok());
        assert_eq!(
            registry.resolve(ComponentKind::Image).unwrap_err(),
            RegistryError::Unmapped(ComponentKind::Image)
        );
        assert_eq!(registry.kinds().count(), 1);
    }
}
