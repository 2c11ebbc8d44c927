//! Accumulate-then-freeze builders for the documentation model.
//!
//! Scalar setters ignore absent input and keep whatever an earlier caller
//! staged, so several plugins can call the same setter without erasing each
//! other. Collection fields come in two flavours: the plain setter replaces the
//! staged collection, the `append_*` setter unions into it.
//!
//! `build()` never fails and never aliases staging state: every container is
//! copied into the produced value.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    ApiDescription, ApiInfo, ApiListing, ApiListingReference, Authorization, AuthorizationScope,
    Documentation, Model, Operation, Parameter, ResourceListing, ResponseMessage, SecurityScheme,
};
use crate::ordering::{operation_order, reference_order, DescriptionOrdering};
use crate::types::{HttpMethod, DEFAULT_GROUP};

/// A scalar value handed to a builder setter that may be absent.
///
/// Plain strings are always present; `None` is absent and leaves the staged
/// value untouched.
pub trait IntoStaged {
    fn into_staged(self) -> Option<String>;
}

impl IntoStaged for &str {
    fn into_staged(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoStaged for String {
    fn into_staged(self) -> Option<String> {
        Some(self)
    }
}

impl IntoStaged for &String {
    fn into_staged(self) -> Option<String> {
        Some(self.clone())
    }
}

impl IntoStaged for Option<&str> {
    fn into_staged(self) -> Option<String> {
        self.map(str::to_string)
    }
}

/// Keep `current` unless `incoming` carries a value.
fn default_if_absent(incoming: impl IntoStaged, current: &mut Option<String>) {
    if let Some(value) = incoming.into_staged() {
        *current = Some(value);
    }
}

fn to_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Builder for [`Operation`].
#[derive(Debug, Clone, Default)]
pub struct OperationBuilder {
    method: Option<HttpMethod>,
    summary: Option<String>,
    notes: Option<String>,
    nickname: Option<String>,
    response_model: Option<String>,
    position: i32,
    produces: BTreeSet<String>,
    consumes: BTreeSet<String>,
    protocols: BTreeSet<String>,
    authorizations: Vec<Authorization>,
    parameters: Vec<Parameter>,
    response_messages: BTreeMap<u16, ResponseMessage>,
    deprecated: bool,
    hidden: bool,
    unique_id: Option<String>,
}

impl OperationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = Some(method);
        self
    }

    pub fn summary(&mut self, summary: impl IntoStaged) -> &mut Self {
        default_if_absent(summary, &mut self.summary);
        self
    }

    pub fn notes(&mut self, notes: impl IntoStaged) -> &mut Self {
        default_if_absent(notes, &mut self.notes);
        self
    }

    pub fn nickname(&mut self, nickname: impl IntoStaged) -> &mut Self {
        default_if_absent(nickname, &mut self.nickname);
        self
    }

    pub fn response_model(&mut self, model: impl IntoStaged) -> &mut Self {
        default_if_absent(model, &mut self.response_model);
        self
    }

    pub fn unique_id(&mut self, unique_id: impl IntoStaged) -> &mut Self {
        default_if_absent(unique_id, &mut self.unique_id);
        self
    }

    pub fn position(&mut self, position: i32) -> &mut Self {
        self.position = position;
        self
    }

    /// Replace the staged produces set.
    pub fn produces<I, S>(&mut self, produces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = to_set(produces);
        self
    }

    /// Union into the staged produces set.
    pub fn append_produces<I, S>(&mut self, produces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces.extend(produces.into_iter().map(Into::into));
        self
    }

    /// Replace the staged consumes set.
    pub fn consumes<I, S>(&mut self, consumes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = to_set(consumes);
        self
    }

    /// Union into the staged consumes set.
    pub fn append_consumes<I, S>(&mut self, consumes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes.extend(consumes.into_iter().map(Into::into));
        self
    }

    /// Replace the staged protocol set.
    pub fn protocols<I, S>(&mut self, protocols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols = to_set(protocols);
        self
    }

    /// Union into the staged protocol set.
    pub fn append_protocols<I, S>(&mut self, protocols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols.extend(protocols.into_iter().map(Into::into));
        self
    }

    /// Replace the staged authorizations.
    pub fn authorizations(&mut self, authorizations: Vec<Authorization>) -> &mut Self {
        self.authorizations = authorizations;
        self
    }

    /// Replace the staged parameters.
    pub fn parameters(&mut self, parameters: Vec<Parameter>) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Add parameters; one with the same name and binding replaces the staged entry in place.
    pub fn append_parameters(&mut self, parameters: impl IntoIterator<Item = Parameter>) -> &mut Self {
        for param in parameters {
            match self
                .parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.param_type == param.param_type)
            {
                Some(existing) => *existing = param,
                None => self.parameters.push(param),
            }
        }
        self
    }

    /// Replace the staged response messages.
    pub fn response_messages(
        &mut self,
        messages: impl IntoIterator<Item = ResponseMessage>,
    ) -> &mut Self {
        self.response_messages = messages.into_iter().map(|m| (m.code, m)).collect();
        self
    }

    /// Overlay response messages by status code.
    pub fn append_response_messages(
        &mut self,
        messages: impl IntoIterator<Item = ResponseMessage>,
    ) -> &mut Self {
        self.response_messages
            .extend(messages.into_iter().map(|m| (m.code, m)));
        self
    }

    pub fn deprecated(&mut self, deprecated: bool) -> &mut Self {
        self.deprecated = deprecated;
        self
    }

    pub fn hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    /// Snapshot of the staged state.
    ///
    /// Plugins use this to read what upstream plugins contributed.
    pub fn build(&self) -> Operation {
        Operation {
            method: self.method.unwrap_or(HttpMethod::Get),
            summary: self.summary.clone(),
            notes: self.notes.clone(),
            nickname: self.nickname.clone(),
            response_model: self.response_model.clone(),
            position: self.position,
            produces: self.produces.clone(),
            consumes: self.consumes.clone(),
            protocols: self.protocols.clone(),
            authorizations: self.authorizations.clone(),
            parameters: self.parameters.clone(),
            response_messages: self.response_messages.values().cloned().collect(),
            deprecated: self.deprecated,
            hidden: self.hidden,
            unique_id: self.unique_id.clone().unwrap_or_default(),
        }
    }
}

/// Builder for [`AuthorizationScope`].
#[derive(Debug, Clone, Default)]
pub struct AuthorizationScopeBuilder {
    scope: Option<String>,
    description: Option<String>,
}

impl AuthorizationScopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&mut self, scope: impl IntoStaged) -> &mut Self {
        default_if_absent(scope, &mut self.scope);
        self
    }

    pub fn description(&mut self, description: impl IntoStaged) -> &mut Self {
        default_if_absent(description, &mut self.description);
        self
    }

    pub fn build(&self) -> AuthorizationScope {
        AuthorizationScope {
            scope: self.scope.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Builder for [`Authorization`].
#[derive(Debug, Clone, Default)]
pub struct AuthorizationBuilder {
    kind: Option<String>,
    scopes: Vec<AuthorizationScope>,
}

impl AuthorizationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme type the authorization refers to.
    pub fn kind(&mut self, kind: impl IntoStaged) -> &mut Self {
        default_if_absent(kind, &mut self.kind);
        self
    }

    /// Replace the staged scopes.
    pub fn scopes(&mut self, scopes: Vec<AuthorizationScope>) -> &mut Self {
        self.scopes = scopes;
        self
    }

    /// Blank scopes are sentinels for "no scope restriction" and are dropped.
    pub fn build(&self) -> Authorization {
        Authorization {
            kind: self.kind.clone().unwrap_or_default(),
            scopes: self
                .scopes
                .iter()
                .filter(|s| !s.scope.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// Builder for [`ApiDescription`].
#[derive(Debug, Clone, Default)]
pub struct ApiDescriptionBuilder {
    path: Option<String>,
    description: Option<String>,
    operations: Vec<Operation>,
    hidden: bool,
    position: Option<i32>,
}

impl ApiDescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&mut self, path: impl IntoStaged) -> &mut Self {
        default_if_absent(path, &mut self.path);
        self
    }

    pub fn description(&mut self, description: impl IntoStaged) -> &mut Self {
        default_if_absent(description, &mut self.description);
        self
    }

    /// Replace the staged operations.
    pub fn operations(&mut self, operations: Vec<Operation>) -> &mut Self {
        self.operations = operations;
        self
    }

    pub fn hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    /// Explicit display position. Defaults to the lowest operation position.
    pub fn position(&mut self, position: i32) -> &mut Self {
        self.position = Some(position);
        self
    }

    pub fn build(&self) -> ApiDescription {
        let mut operations = self.operations.clone();
        operations.sort_by(operation_order);
        let position = self
            .position
            .or_else(|| operations.iter().map(|o| o.position).min())
            .unwrap_or(0);
        ApiDescription {
            path: self.path.clone().unwrap_or_default(),
            description: self.description.clone(),
            operations,
            hidden: self.hidden,
            position,
        }
    }
}

/// Builder for [`ApiListing`].
///
/// Descriptions handed to [`ApiListingBuilder::apis`] are stored sorted by the
/// builder's ordering, never in caller order.
#[derive(Debug, Clone)]
pub struct ApiListingBuilder {
    description_ordering: DescriptionOrdering,
    api_version: Option<String>,
    base_path: Option<String>,
    resource_path: Option<String>,
    description: Option<String>,
    position: i32,
    produces: BTreeSet<String>,
    consumes: BTreeSet<String>,
    protocols: BTreeSet<String>,
    authorizations: Vec<Authorization>,
    apis: Vec<ApiDescription>,
    models: BTreeMap<String, Model>,
}

impl ApiListingBuilder {
    pub fn new(description_ordering: DescriptionOrdering) -> Self {
        Self {
            description_ordering,
            api_version: None,
            base_path: None,
            resource_path: None,
            description: None,
            position: 0,
            produces: BTreeSet::new(),
            consumes: BTreeSet::new(),
            protocols: BTreeSet::new(),
            authorizations: Vec::new(),
            apis: Vec::new(),
            models: BTreeMap::new(),
        }
    }

    pub fn api_version(&mut self, api_version: impl IntoStaged) -> &mut Self {
        default_if_absent(api_version, &mut self.api_version);
        self
    }

    pub fn base_path(&mut self, base_path: impl IntoStaged) -> &mut Self {
        default_if_absent(base_path, &mut self.base_path);
        self
    }

    pub fn resource_path(&mut self, resource_path: impl IntoStaged) -> &mut Self {
        default_if_absent(resource_path, &mut self.resource_path);
        self
    }

    pub fn description(&mut self, description: impl IntoStaged) -> &mut Self {
        default_if_absent(description, &mut self.description);
        self
    }

    pub fn position(&mut self, position: i32) -> &mut Self {
        self.position = position;
        self
    }

    /// Replace the staged produces set.
    pub fn produces<I, S>(&mut self, produces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = to_set(produces);
        self
    }

    /// Union into the staged produces set.
    pub fn append_produces<I, S>(&mut self, produces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces.extend(produces.into_iter().map(Into::into));
        self
    }

    /// Replace the staged consumes set.
    pub fn consumes<I, S>(&mut self, consumes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = to_set(consumes);
        self
    }

    /// Union into the staged consumes set.
    pub fn append_consumes<I, S>(&mut self, consumes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes.extend(consumes.into_iter().map(Into::into));
        self
    }

    /// Replace the staged protocol set.
    pub fn protocols<I, S>(&mut self, protocols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols = to_set(protocols);
        self
    }

    /// Union into the staged protocol set.
    pub fn append_protocols<I, S>(&mut self, protocols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols.extend(protocols.into_iter().map(Into::into));
        self
    }

    /// Replace the staged authorizations.
    pub fn authorizations(&mut self, authorizations: Vec<Authorization>) -> &mut Self {
        self.authorizations = authorizations;
        self
    }

    /// Replace the staged descriptions, sorted by the listing's ordering.
    pub fn apis(&mut self, apis: &[ApiDescription]) -> &mut Self {
        self.apis = self.description_ordering.sorted_copy(apis);
        self
    }

    /// Union models by name.
    pub fn models(&mut self, models: BTreeMap<String, Model>) -> &mut Self {
        self.models.extend(models);
        self
    }

    pub fn build(&self) -> ApiListing {
        ApiListing {
            api_version: self.api_version.clone(),
            base_path: self.base_path.clone(),
            resource_path: self.resource_path.clone(),
            produces: self.produces.clone(),
            consumes: self.consumes.clone(),
            protocols: self.protocols.clone(),
            authorizations: self.authorizations.clone(),
            apis: self.apis.clone(),
            models: self.models.clone(),
            description: self.description.clone(),
            position: self.position,
        }
    }
}

/// Builder for [`ResourceListing`].
#[derive(Debug, Clone, Default)]
pub struct ResourceListingBuilder {
    api_version: Option<String>,
    apis: Vec<ApiListingReference>,
    security_schemes: Vec<SecurityScheme>,
    info: Option<ApiInfo>,
}

impl ResourceListingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_version(&mut self, api_version: impl IntoStaged) -> &mut Self {
        default_if_absent(api_version, &mut self.api_version);
        self
    }

    /// Replace the staged references. Stored by position, then path.
    pub fn apis(&mut self, mut apis: Vec<ApiListingReference>) -> &mut Self {
        apis.sort_by(reference_order);
        self.apis = apis;
        self
    }

    pub fn security_schemes(&mut self, schemes: Vec<SecurityScheme>) -> &mut Self {
        self.security_schemes = schemes;
        self
    }

    pub fn info(&mut self, info: Option<ApiInfo>) -> &mut Self {
        if info.is_some() {
            self.info = info;
        }
        self
    }

    pub fn build(&self) -> ResourceListing {
        ResourceListing {
            api_version: self.api_version.clone(),
            apis: self.apis.clone(),
            security_schemes: self.security_schemes.clone(),
            info: self.info.clone().unwrap_or_default(),
        }
    }
}

/// Builder for [`Documentation`].
#[derive(Debug, Clone, Default)]
pub struct DocumentationBuilder {
    group_name: Option<String>,
    resource_listing: Option<ResourceListing>,
    api_listings: BTreeMap<String, ApiListing>,
}

impl DocumentationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_name(&mut self, name: impl IntoStaged) -> &mut Self {
        default_if_absent(name, &mut self.group_name);
        self
    }

    pub fn resource_listing(&mut self, listing: ResourceListing) -> &mut Self {
        self.resource_listing = Some(listing);
        self
    }

    /// Union listings by key.
    pub fn api_listings(&mut self, listings: BTreeMap<String, ApiListing>) -> &mut Self {
        self.api_listings.extend(listings);
        self
    }

    pub fn build(&self) -> Documentation {
        Documentation {
            group_name: self
                .group_name
                .clone()
                .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            resource_listing: self
                .resource_listing
                .clone()
                .unwrap_or_else(|| ResourceListingBuilder::new().build()),
            api_listings: self.api_listings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(scope: &str, description: &str) -> AuthorizationScope {
        AuthorizationScopeBuilder::new()
            .scope(scope)
            .description(description)
            .build()
    }

    fn description(path: &str, position: i32) -> ApiDescription {
        ApiDescriptionBuilder::new()
            .path(path)
            .position(position)
            .build()
    }

    #[test]
    fn absent_scalar_keeps_previous_value() {
        let operation = OperationBuilder::new()
            .summary("X")
            .summary(None)
            .notes("first")
            .notes(None)
            .build();
        assert_eq!(operation.summary(), Some("X"));
        assert_eq!(operation.notes(), Some("first"));
    }

    #[test]
    fn present_scalar_overwrites() {
        let operation = OperationBuilder::new().summary("X").summary("Y").build();
        assert_eq!(operation.summary(), Some("Y"));
    }

    #[test]
    fn replace_and_append_produces() {
        let mut builder = OperationBuilder::new();
        builder.produces(["application/json"]);
        builder.append_produces(["application/xml", "application/json"]);
        assert_eq!(builder.build().produces().len(), 2);

        builder.produces(["text/plain"]);
        let operation = builder.build();
        let produces: Vec<&str> = operation.produces().iter().map(String::as_str).collect();
        assert_eq!(produces, vec!["text/plain"]);
    }

    #[test]
    fn build_does_not_alias_staging_state() {
        let mut builder = OperationBuilder::new();
        builder.produces(["application/json"]);
        let first = builder.build();
        builder.append_produces(["application/xml"]);
        let second = builder.build();

        assert_eq!(first.produces().len(), 1);
        assert_eq!(second.produces().len(), 2);
    }

    #[test]
    fn response_messages_overlay_by_code() {
        let operation = OperationBuilder::new()
            .response_messages(vec![
                ResponseMessage::new(404, "Not Found"),
                ResponseMessage::new(200, "OK"),
            ])
            .append_response_messages(vec![ResponseMessage::new(404, "No such pet")])
            .build();
        let codes: Vec<u16> = operation.response_messages().iter().map(|m| m.code).collect();
        assert_eq!(codes, vec![200, 404]);
        assert_eq!(operation.response_messages()[1].message, "No such pet");
    }

    #[test]
    fn append_parameters_replaces_same_binding() {
        let id = Parameter {
            name: "id".to_string(),
            param_type: crate::model::ParameterType::Path,
            ..Default::default()
        };
        let refined = Parameter {
            description: Some("pet id".to_string()),
            required: true,
            ..id.clone()
        };
        let operation = OperationBuilder::new()
            .append_parameters(vec![id])
            .append_parameters(vec![refined])
            .build();
        assert_eq!(operation.parameters().len(), 1);
        assert!(operation.parameters()[0].required);
    }

    #[test]
    fn blank_scopes_are_dropped() {
        let authorization = AuthorizationBuilder::new()
            .kind("api_key")
            .scopes(vec![scope("", "sentinel"), scope("read", "read access"), scope("  ", "x")])
            .build();
        assert_eq!(authorization.kind(), "api_key");
        assert_eq!(authorization.scopes().len(), 1);
        assert_eq!(authorization.scopes()[0].scope(), "read");
    }

    #[test]
    fn description_position_defaults_to_lowest_operation() {
        let ops = vec![
            OperationBuilder::new().method(HttpMethod::Post).position(3).build(),
            OperationBuilder::new().method(HttpMethod::Get).position(1).build(),
        ];
        let description = ApiDescriptionBuilder::new()
            .path("/pets")
            .operations(ops)
            .build();
        assert_eq!(description.position(), 1);
        assert_eq!(description.operations()[0].method(), HttpMethod::Get);
    }

    #[test]
    fn listing_sorts_apis_by_ordering() {
        let listing = ApiListingBuilder::new(DescriptionOrdering::by_position())
            .apis(&[description("/pets", 1), description("/pets/{id}", 0)])
            .build();
        let paths: Vec<&str> = listing.apis().iter().map(|a| a.path()).collect();
        assert_eq!(paths, vec!["/pets/{id}", "/pets"]);
    }

    #[test]
    fn listing_models_union_by_name() {
        let model = |id: &str| Model {
            id: id.to_string(),
            ..Default::default()
        };
        let mut first = BTreeMap::new();
        first.insert("Pet".to_string(), model("Pet"));
        let mut second = BTreeMap::new();
        second.insert("Tag".to_string(), model("Tag"));

        let listing = ApiListingBuilder::new(DescriptionOrdering::default())
            .models(first)
            .models(second)
            .build();
        assert_eq!(listing.models().len(), 2);
    }

    #[test]
    fn documentation_defaults_group_name() {
        let documentation = DocumentationBuilder::new().build();
        assert_eq!(documentation.group_name(), DEFAULT_GROUP);
        assert!(documentation.api_listings().is_empty());
        assert_eq!(documentation.resource_listing().info(), &ApiInfo::default());
    }
}
