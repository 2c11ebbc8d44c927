//! Contexts passed through the plugin chains.
//!
//! A context wraps the builder being enriched together with read-only facts
//! about what is being documented. One context is created per (handler,
//! method) pair or per resource group and is only ever touched by one plugin
//! at a time.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::builders::{ApiListingBuilder, OperationBuilder};
use crate::discovery::{handler_order, RequestHandler};
use crate::docket::Docket;
use crate::error::ConfigError;
use crate::model::{ApiListing, Authorization, Model, Operation};
use crate::types::{DocumentationType, HttpMethod};

/// Source of path-scoped default authorizations.
pub trait AuthorizationContext: fmt::Debug + Send + Sync {
    /// Authorizations that apply to a handler pattern when the handler declares none.
    fn authorizations_for_path(&self, pattern: &str) -> Vec<Authorization>;
}

/// Authorization rules keyed by regular expressions over handler patterns.
///
/// Every matching rule contributes its authorizations, in rule order.
#[derive(Debug, Clone, Default)]
pub struct PathAuthorizations {
    rules: Vec<(Regex, Vec<Authorization>)>,
}

impl PathAuthorizations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(
        mut self,
        pattern: &str,
        authorizations: Vec<Authorization>,
    ) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPathPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.rules.push((regex, authorizations));
        Ok(self)
    }
}

impl AuthorizationContext for PathAuthorizations {
    fn authorizations_for_path(&self, pattern: &str) -> Vec<Authorization> {
        self.rules
            .iter()
            .filter(|(regex, _)| regex.is_match(pattern))
            .flat_map(|(_, authorizations)| authorizations.iter().cloned())
            .collect()
    }
}

/// Accumulator for one operation.
pub struct OperationContext<'a> {
    builder: OperationBuilder,
    method: HttpMethod,
    handler: &'a RequestHandler,
    docket: &'a Docket,
    known_models: &'a BTreeMap<String, Model>,
    models: BTreeMap<String, Model>,
}

impl<'a> OperationContext<'a> {
    pub fn new(
        docket: &'a Docket,
        handler: &'a RequestHandler,
        method: HttpMethod,
        known_models: &'a BTreeMap<String, Model>,
    ) -> Self {
        Self {
            builder: OperationBuilder::new(),
            method,
            handler,
            docket,
            known_models,
            models: BTreeMap::new(),
        }
    }

    pub fn operation_builder(&mut self) -> &mut OperationBuilder {
        &mut self.builder
    }

    pub fn http_method(&self) -> HttpMethod {
        self.method
    }

    pub fn handler(&self) -> &'a RequestHandler {
        self.handler
    }

    pub fn request_mapping_pattern(&self) -> &'a str {
        &self.handler.pattern
    }

    pub fn group_name(&self) -> &'a str {
        &self.docket.group_name
    }

    pub fn documentation_type(&self) -> DocumentationType {
        self.docket.documentation_type
    }

    pub fn docket(&self) -> &'a Docket {
        self.docket
    }

    pub fn authorization_context(&self) -> Option<&'a dyn AuthorizationContext> {
        self.docket.authorization_context()
    }

    /// Every model discovery reported, keyed by id.
    pub fn known_models(&self) -> &'a BTreeMap<String, Model> {
        self.known_models
    }

    /// Record a model the operation refers to.
    pub fn add_model(&mut self, model: Model) {
        self.models.insert(model.id.clone(), model);
    }

    pub fn models(&self) -> &BTreeMap<String, Model> {
        &self.models
    }

    /// `METHOD pattern`, for logs and errors.
    pub fn label(&self) -> String {
        self.handler.label(self.method)
    }

    /// Freeze the operation and hand back the models it referenced.
    pub fn finish(self) -> (Operation, BTreeMap<String, Model>) {
        (self.builder.build(), self.models)
    }
}

/// Accumulator for one resource group's listing.
pub struct ApiListingContext<'a> {
    builder: ApiListingBuilder,
    resource_group: &'a str,
    handlers: Vec<&'a RequestHandler>,
    docket: &'a Docket,
}

impl<'a> ApiListingContext<'a> {
    /// `handlers` are the resource group's handlers, sorted by pattern, then
    /// handler name, then the remaining metadata.
    pub fn new(
        docket: &'a Docket,
        resource_group: &'a str,
        mut handlers: Vec<&'a RequestHandler>,
        builder: ApiListingBuilder,
    ) -> Self {
        handlers.sort_by(|a, b| handler_order(a, b));
        Self {
            builder,
            resource_group,
            handlers,
            docket,
        }
    }

    pub fn listing_builder(&mut self) -> &mut ApiListingBuilder {
        &mut self.builder
    }

    pub fn resource_group(&self) -> &'a str {
        self.resource_group
    }

    pub fn handlers(&self) -> &[&'a RequestHandler] {
        &self.handlers
    }

    pub fn group_name(&self) -> &'a str {
        &self.docket.group_name
    }

    pub fn documentation_type(&self) -> DocumentationType {
        self.docket.documentation_type
    }

    pub fn docket(&self) -> &'a Docket {
        self.docket
    }

    /// `listing group/resource`, for logs and errors.
    pub fn label(&self) -> String {
        format!("listing {}/{}", self.docket.group_name, self.resource_group)
    }

    pub fn finish(self) -> ApiListing {
        self.builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::AuthorizationBuilder;
    use crate::ordering::DescriptionOrdering;

    fn authorization(kind: &str) -> Authorization {
        AuthorizationBuilder::new().kind(kind).build()
    }

    #[test]
    fn path_authorizations_concatenate_matching_rules() {
        let rules = PathAuthorizations::new()
            .rule("^/pets", vec![authorization("basic")])
            .unwrap()
            .rule("\\{id\\}$", vec![authorization("api_key")])
            .unwrap()
            .rule("^/stores", vec![authorization("oauth2")])
            .unwrap();

        let kinds: Vec<String> = rules
            .authorizations_for_path("/pets/{id}")
            .iter()
            .map(|a| a.kind().to_string())
            .collect();
        assert_eq!(kinds, vec!["basic", "api_key"]);
        assert!(rules.authorizations_for_path("/owners").is_empty());
    }

    #[test]
    fn operation_context_exposes_mapping_facts() {
        let docket = Docket::new("petstore");
        let handler = RequestHandler {
            pattern: "/pets/{id}".to_string(),
            resource_group: "pets".to_string(),
            handler: "getPet".to_string(),
            ..Default::default()
        };
        let models = BTreeMap::new();
        let mut ctx = OperationContext::new(&docket, &handler, HttpMethod::Get, &models);

        assert_eq!(ctx.request_mapping_pattern(), "/pets/{id}");
        assert_eq!(ctx.group_name(), "petstore");
        assert_eq!(ctx.label(), "GET /pets/{id}");
        assert!(ctx.authorization_context().is_none());

        ctx.operation_builder().summary("Find pet");
        ctx.add_model(Model {
            id: "Pet".to_string(),
            ..Default::default()
        });
        let (operation, models) = ctx.finish();
        assert_eq!(operation.summary(), Some("Find pet"));
        assert!(models.contains_key("Pet"));
    }

    #[test]
    fn listing_context_sorts_handlers() {
        let docket = Docket::default();
        let b = RequestHandler {
            pattern: "/pets/{id}".to_string(),
            handler: "getPet".to_string(),
            ..Default::default()
        };
        let a = RequestHandler {
            pattern: "/pets".to_string(),
            handler: "listPets".to_string(),
            ..Default::default()
        };
        let ctx = ApiListingContext::new(
            &docket,
            "pets",
            vec![&b, &a],
            ApiListingBuilder::new(DescriptionOrdering::default()),
        );
        assert_eq!(ctx.handlers()[0].pattern, "/pets");
        assert_eq!(ctx.label(), "listing default/pets");
    }
}
