//! One generation pass for one group.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::builders::{
    ApiDescriptionBuilder, ApiListingBuilder, DocumentationBuilder, ResourceListingBuilder,
};
use crate::context::{ApiListingContext, OperationContext};
use crate::discovery::{handler_order, DiscoveredApi, RequestHandler};
use crate::docket::Docket;
use crate::error::GenerationError;
use crate::model::{ApiListing, ApiListingReference, Documentation, Model, Operation};
use crate::ordering::{merge_authorizations, merge_listing_fragments, ListingFragment};
use crate::plugins::{default_registry, PluginRegistry};

/// Turns discovered handlers into [`Documentation`] by running the plugin chains.
#[derive(Debug, Clone)]
pub struct DocumentationScanner {
    registry: PluginRegistry,
}

impl Default for DocumentationScanner {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl DocumentationScanner {
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Scan every handler the docket selects.
    ///
    /// Handlers are visited in pattern order, ties broken by the whole handler
    /// value, so `unique_id` suffixes for duplicate handler names do not depend
    /// on discovery order.
    ///
    /// # Errors
    ///
    /// Returns the first plugin failure; nothing is produced in that case.
    pub fn scan(
        &self,
        docket: &Docket,
        api: &DiscoveredApi,
    ) -> Result<Documentation, GenerationError> {
        let mut handlers: Vec<&RequestHandler> = api
            .endpoints
            .iter()
            .filter(|h| docket.includes(&h.pattern))
            .filter(|h| !h.api.as_ref().is_some_and(|a| a.hidden))
            .collect();
        handlers.sort_by(|a, b| handler_order(a, b));

        let mut unique_ids: HashMap<String, usize> = HashMap::new();
        let mut fragments = Vec::with_capacity(handlers.len());
        for handler in &handlers {
            let fragment = self.scan_handler(docket, handler, &api.models, &mut unique_ids)?;
            if !fragment.descriptions.is_empty() {
                fragments.push(fragment);
            }
        }

        let merged = merge_listing_fragments(fragments);
        let mut api_listings = BTreeMap::new();
        let mut references = Vec::with_capacity(merged.len());
        for (resource_group, fragment) in &merged {
            let group_handlers: Vec<&RequestHandler> = handlers
                .iter()
                .copied()
                .filter(|h| &h.resource_group == resource_group)
                .collect();
            let listing = self.scan_listing(docket, resource_group, fragment, group_handlers)?;
            references.push(ApiListingReference::new(
                format!("/{}/{}", docket.group_name, resource_group),
                listing.description().map(str::to_string),
                listing.position(),
            ));
            api_listings.insert(resource_group.clone(), listing);
        }

        let resource_listing = ResourceListingBuilder::new()
            .api_version(docket.api_version.as_deref())
            .apis(references)
            .security_schemes(docket.security_schemes.clone())
            .info(Some(docket.info.clone()))
            .build();

        debug!(
            group = %docket.group_name,
            listings = api_listings.len(),
            "scanned documentation"
        );
        Ok(DocumentationBuilder::new()
            .group_name(&docket.group_name)
            .resource_listing(resource_listing)
            .api_listings(api_listings)
            .build())
    }

    fn scan_handler(
        &self,
        docket: &Docket,
        handler: &RequestHandler,
        known_models: &BTreeMap<String, Model>,
        unique_ids: &mut HashMap<String, usize>,
    ) -> Result<ListingFragment, GenerationError> {
        let mut fragment = ListingFragment {
            resource_group: handler.resource_group.clone(),
            ..Default::default()
        };

        let mut operations: Vec<Operation> = Vec::new();
        for method in handler.effective_methods() {
            let mut context = OperationContext::new(docket, handler, method, known_models);
            self.registry.apply_operation_plugins(&mut context)?;
            let (mut operation, models) = context.finish();
            if operation.is_hidden() {
                continue;
            }

            let seen = unique_ids.entry(operation.unique_id.clone()).or_insert(0);
            if *seen > 0 {
                operation.unique_id = format!("{}_{}", operation.unique_id, seen);
                // a nickname defaulted from the handler name follows the same suffix
                if operation.nickname.as_deref() == Some(handler.handler.as_str()) {
                    operation.nickname = Some(format!("{}_{}", handler.handler, seen));
                }
            }
            *seen += 1;

            fragment.produces.extend(operation.produces.iter().cloned());
            fragment.consumes.extend(operation.consumes.iter().cloned());
            fragment.protocols.extend(operation.protocols.iter().cloned());
            fragment.authorizations.extend(operation.authorizations.iter().cloned());
            fragment.models.extend(models);
            operations.push(operation);
        }

        if !operations.is_empty() {
            fragment.authorizations = merge_authorizations(std::mem::take(&mut fragment.authorizations));
            fragment.descriptions.push(
                ApiDescriptionBuilder::new()
                    .path(&handler.pattern)
                    .operations(operations)
                    .build(),
            );
        }
        Ok(fragment)
    }

    fn scan_listing(
        &self,
        docket: &Docket,
        resource_group: &str,
        fragment: &ListingFragment,
        handlers: Vec<&RequestHandler>,
    ) -> Result<ApiListing, GenerationError> {
        let mut builder = ApiListingBuilder::new(docket.description_ordering.clone());
        builder
            .api_version(docket.api_version.as_deref())
            .base_path(docket.base_path.as_deref())
            .resource_path(format!("/{resource_group}"))
            .produces(fragment.produces.iter().cloned())
            .consumes(fragment.consumes.iter().cloned())
            .protocols(fragment.protocols.iter().cloned())
            .authorizations(fragment.authorizations.clone())
            .apis(&fragment.descriptions)
            .models(fragment.models.clone());

        let mut context = ApiListingContext::new(docket, resource_group, handlers, builder);
        self.registry.apply_listing_plugins(&mut context)?;
        Ok(context.finish())
    }
}
