//! Plugin registry and chain executor.
//!
//! Plugins are registered explicitly, tagged with the capability they
//! provide. A chain runs every plugin of one capability whose `supports`
//! predicate accepts the pass's documentation type, in registration order.
//! The first failure aborts the chain.

use std::sync::Arc;

use tracing::trace;

use crate::context::{ApiListingContext, OperationContext};
use crate::error::{GenerationError, PluginError};
use crate::readers;
use crate::types::DocumentationType;

/// Which context a plugin enriches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Operation,
    ApiListing,
}

/// Enriches the builder of one operation.
pub trait OperationBuilderPlugin: Send + Sync {
    /// Stable name used in logs and errors.
    fn name(&self) -> &str;

    fn supports(&self, documentation_type: DocumentationType) -> bool;

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError>;
}

/// Enriches the builder of one resource group's listing.
pub trait ApiListingBuilderPlugin: Send + Sync {
    /// Stable name used in logs and errors.
    fn name(&self) -> &str;

    fn supports(&self, documentation_type: DocumentationType) -> bool;

    fn apply(&self, context: &mut ApiListingContext<'_>) -> Result<(), PluginError>;
}

#[derive(Clone)]
enum Entry {
    Operation(Arc<dyn OperationBuilderPlugin>),
    ApiListing(Arc<dyn ApiListingBuilderPlugin>),
}

impl Entry {
    fn capability(&self) -> Capability {
        match self {
            Entry::Operation(_) => Capability::Operation,
            Entry::ApiListing(_) => Capability::ApiListing,
        }
    }

    fn name(&self) -> &str {
        match self {
            Entry::Operation(p) => p.name(),
            Entry::ApiListing(p) => p.name(),
        }
    }
}

/// Ordered, tagged set of plugins.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    entries: Vec<Entry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_operation_plugin(&mut self, plugin: impl OperationBuilderPlugin + 'static) {
        self.entries.push(Entry::Operation(Arc::new(plugin)));
    }

    pub fn register_listing_plugin(&mut self, plugin: impl ApiListingBuilderPlugin + 'static) {
        self.entries.push(Entry::ApiListing(Arc::new(plugin)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the registered plugins of one capability, in registration order.
    pub fn names(&self, capability: Capability) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.capability() == capability)
            .map(Entry::name)
            .collect()
    }

    fn operation_plugins(
        &self,
        documentation_type: DocumentationType,
    ) -> impl Iterator<Item = &Arc<dyn OperationBuilderPlugin>> {
        self.entries.iter().filter_map(move |e| match e {
            Entry::Operation(p) if p.supports(documentation_type) => Some(p),
            _ => None,
        })
    }

    fn listing_plugins(
        &self,
        documentation_type: DocumentationType,
    ) -> impl Iterator<Item = &Arc<dyn ApiListingBuilderPlugin>> {
        self.entries.iter().filter_map(move |e| match e {
            Entry::ApiListing(p) if p.supports(documentation_type) => Some(p),
            _ => None,
        })
    }

    /// Run the operation chain over one context.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Plugin` naming the first plugin that failed.
    pub fn apply_operation_plugins(
        &self,
        context: &mut OperationContext<'_>,
    ) -> Result<(), GenerationError> {
        for plugin in self.operation_plugins(context.documentation_type()) {
            trace!(plugin = plugin.name(), context = %context.label(), "applying operation plugin");
            plugin
                .apply(context)
                .map_err(|source| GenerationError::Plugin {
                    plugin: plugin.name().to_string(),
                    target: context.label(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Run the listing chain over one context.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Plugin` naming the first plugin that failed.
    pub fn apply_listing_plugins(
        &self,
        context: &mut ApiListingContext<'_>,
    ) -> Result<(), GenerationError> {
        for plugin in self.listing_plugins(context.documentation_type()) {
            trace!(plugin = plugin.name(), context = %context.label(), "applying listing plugin");
            plugin
                .apply(context)
                .map_err(|source| GenerationError::Plugin {
                    plugin: plugin.name().to_string(),
                    target: context.label(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.capability(), e.name())))
            .finish()
    }
}

/// Registry holding the built-in readers.
pub fn default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    readers::register_all(&mut registry);
    registry
}
