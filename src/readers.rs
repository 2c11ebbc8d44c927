//! Built-in readers.
//!
//! Each reader pulls one aspect of the discovered handler metadata into the
//! context's builder. Readers registered later see (and may refine) what the
//! earlier ones staged.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::builders::{AuthorizationBuilder, AuthorizationScopeBuilder};
use crate::context::{ApiListingContext, OperationContext};
use crate::error::PluginError;
use crate::model::{Authorization, Parameter, ParameterType, ResponseMessage};
use crate::plugins::{ApiListingBuilderPlugin, OperationBuilderPlugin, PluginRegistry};
use crate::types::{
    container_element, has_text, is_primitive, split_list, DocumentationType, HttpMethod,
};

/// Register every built-in reader, in chain order.
pub fn register_all(registry: &mut PluginRegistry) {
    registry.register_operation_plugin(OperationDefaults);
    registry.register_operation_plugin(OperationParameterReader);
    registry.register_operation_plugin(ResponseMessagesReader);
    registry.register_operation_plugin(ApiOperationReader);
    registry.register_operation_plugin(OperationAuthReader);
    registry.register_operation_plugin(OperationModelsReader);

    registry.register_listing_plugin(ApiListingDefaults);
    registry.register_listing_plugin(ApiMetadataReader);
}

/// Readers of documentation metadata only take part in Swagger passes.
fn swagger_only(documentation_type: DocumentationType) -> bool {
    documentation_type == DocumentationType::Swagger12
}

/// Identity, method and media types straight from the handler mapping.
pub struct OperationDefaults;

impl OperationBuilderPlugin for OperationDefaults {
    fn name(&self) -> &str {
        "operation-defaults"
    }

    fn supports(&self, _: DocumentationType) -> bool {
        true
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let handler = context.handler();
        let docket = context.docket();
        let method = context.http_method();

        let produces = if handler.produces.is_empty() {
            &docket.produces
        } else {
            &handler.produces
        };
        let consumes = if handler.consumes.is_empty() {
            &docket.consumes
        } else {
            &handler.consumes
        };

        context
            .operation_builder()
            .method(method)
            .unique_id(format!("{}Using{}", handler.handler, method))
            .nickname(&handler.handler)
            .summary(&handler.handler)
            .response_model(handler.response_model.as_deref())
            .produces(produces)
            .consumes(consumes)
            .protocols(&docket.protocols)
            .deprecated(handler.deprecated);
        Ok(())
    }
}

/// Declared parameters plus the path variables nobody declared.
pub struct OperationParameterReader;

impl OperationBuilderPlugin for OperationParameterReader {
    fn name(&self) -> &str {
        "operation-parameters"
    }

    fn supports(&self, _: DocumentationType) -> bool {
        true
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let handler = context.handler();

        let declared: BTreeSet<&str> = handler
            .parameters
            .iter()
            .map(|p| p.parameter.name.as_str())
            .collect();
        let visible = handler
            .parameters
            .iter()
            .filter(|p| !p.hidden)
            .map(|p| p.parameter.clone());
        let synthesized: Vec<Parameter> = handler
            .path_variables()
            .into_iter()
            .filter(|name| !declared.contains(name.as_str()))
            .map(|name| Parameter {
                name,
                required: true,
                data_type: "string".to_string(),
                param_type: ParameterType::Path,
                ..Default::default()
            })
            .collect();

        context
            .operation_builder()
            .append_parameters(visible)
            .append_parameters(synthesized);
        Ok(())
    }
}

/// Status codes every handler of a method can answer with.
fn default_response_messages(method: HttpMethod) -> Vec<ResponseMessage> {
    let mut messages = vec![ResponseMessage::new(200, "OK")];
    match method {
        HttpMethod::Get => {
            messages.push(ResponseMessage::new(404, "Not Found"));
        }
        HttpMethod::Post | HttpMethod::Put => {
            messages.push(ResponseMessage::new(201, "Created"));
            messages.push(ResponseMessage::new(404, "Not Found"));
        }
        _ => {
            messages.push(ResponseMessage::new(204, "No Content"));
        }
    }
    messages.push(ResponseMessage::new(401, "Unauthorized"));
    messages.push(ResponseMessage::new(403, "Forbidden"));
    messages
}

/// Defaults, then the docket's global messages, then declared responses.
pub struct ResponseMessagesReader;

impl OperationBuilderPlugin for ResponseMessagesReader {
    fn name(&self) -> &str {
        "response-messages"
    }

    fn supports(&self, _: DocumentationType) -> bool {
        true
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let method = context.http_method();
        let docket = context.docket();
        let handler = context.handler();

        let defaults = if docket.use_default_response_messages {
            default_response_messages(method)
        } else {
            vec![]
        };
        let global = docket
            .global_response_messages
            .get(&method)
            .cloned()
            .unwrap_or_default();
        let declared = handler.responses.iter().map(|r| ResponseMessage {
            code: r.code,
            message: r.message.clone(),
            response_model: r.response.clone().filter(|m| has_text(m)),
        });

        context
            .operation_builder()
            .response_messages(defaults)
            .append_response_messages(global)
            .append_response_messages(declared);
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value).filter(|v| has_text(v))
}

/// Operation-level documentation metadata.
pub struct ApiOperationReader;

impl OperationBuilderPlugin for ApiOperationReader {
    fn name(&self) -> &str {
        "api-operation"
    }

    fn supports(&self, documentation_type: DocumentationType) -> bool {
        swagger_only(documentation_type)
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let Some(metadata) = context.handler().operation.as_ref() else {
            return Ok(());
        };

        let builder = context.operation_builder();
        builder
            .summary(non_blank(&metadata.value))
            .notes(non_blank(&metadata.notes))
            .nickname(non_blank(&metadata.nickname))
            .response_model(metadata.response.as_deref().and_then(non_blank))
            .hidden(metadata.hidden);
        if metadata.position != 0 {
            builder.position(metadata.position);
        }

        let produces = split_list(&metadata.produces);
        if !produces.is_empty() {
            builder.produces(produces);
        }
        let consumes = split_list(&metadata.consumes);
        if !consumes.is_empty() {
            builder.consumes(consumes);
        }
        builder.append_protocols(split_list(&metadata.protocols));
        Ok(())
    }
}

/// Path-scoped default authorizations, replaced wholesale by declared ones.
///
/// Declared authorizations only take over when the first one names a scheme.
pub struct OperationAuthReader;

impl OperationBuilderPlugin for OperationAuthReader {
    fn name(&self) -> &str {
        "operation-auth"
    }

    fn supports(&self, documentation_type: DocumentationType) -> bool {
        swagger_only(documentation_type)
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let mut authorizations = context
            .authorization_context()
            .map(|ac| ac.authorizations_for_path(context.request_mapping_pattern()))
            .unwrap_or_default();

        let declared = context
            .handler()
            .operation
            .as_ref()
            .map(|m| m.authorizations.as_slice())
            .unwrap_or_default();
        if declared.first().is_some_and(|a| has_text(&a.value)) {
            authorizations = declared
                .iter()
                .map(|a| {
                    let scopes = a
                        .scopes
                        .iter()
                        .map(|s| {
                            AuthorizationScopeBuilder::new()
                                .scope(&s.scope)
                                .description(&s.description)
                                .build()
                        })
                        .collect();
                    AuthorizationBuilder::new()
                        .kind(&a.value)
                        .scopes(scopes)
                        .build()
                })
                .collect::<Vec<Authorization>>();
        }

        debug!(
            count = authorizations.len(),
            handler = %context.handler().handler,
            "authorization count"
        );
        context.operation_builder().authorizations(authorizations);
        Ok(())
    }
}

/// Strip a container wrapper such as `List[Pet]` down to its element type.
fn element_type(data_type: &str) -> &str {
    container_element(data_type).unwrap_or(data_type.trim())
}

/// Models reachable from the operation's signature.
///
/// A name discovery did not report stays an unresolved reference: the
/// operation still names it and the listing carries no model for it.
pub struct OperationModelsReader;

impl OperationBuilderPlugin for OperationModelsReader {
    fn name(&self) -> &str {
        "operation-models"
    }

    fn supports(&self, _: DocumentationType) -> bool {
        true
    }

    fn apply(&self, context: &mut OperationContext<'_>) -> Result<(), PluginError> {
        let operation = context.operation_builder().build();

        let mut pending: VecDeque<String> = operation
            .response_model()
            .into_iter()
            .chain(
                operation
                    .parameters()
                    .iter()
                    .filter(|p| p.param_type == ParameterType::Body)
                    .map(|p| p.data_type.as_str()),
            )
            .chain(
                operation
                    .response_messages()
                    .iter()
                    .filter_map(|m| m.response_model.as_deref()),
            )
            .map(|t| element_type(t).to_string())
            .collect();

        let known = context.known_models();
        let mut seen = BTreeSet::new();
        while let Some(name) = pending.pop_front() {
            if name.is_empty() || is_primitive(&name) || !seen.insert(name.clone()) {
                continue;
            }
            let Some(model) = known.get(&name) else {
                warn!(model = %name, operation = %context.label(), "unresolved model reference");
                continue;
            };
            pending.extend(model.referenced_types().map(|t| element_type(t).to_string()));
            context.add_model(model.clone());
        }
        Ok(())
    }
}

/// `pet-store_controller` reads as `Pet Store Controller`.
fn humanize(resource_group: &str) -> String {
    resource_group
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description derived from the resource group name.
pub struct ApiListingDefaults;

impl ApiListingBuilderPlugin for ApiListingDefaults {
    fn name(&self) -> &str {
        "listing-defaults"
    }

    fn supports(&self, _: DocumentationType) -> bool {
        true
    }

    fn apply(&self, context: &mut ApiListingContext<'_>) -> Result<(), PluginError> {
        let description = humanize(context.resource_group());
        context.listing_builder().description(description);
        Ok(())
    }
}

/// Controller-level documentation metadata.
pub struct ApiMetadataReader;

impl ApiListingBuilderPlugin for ApiMetadataReader {
    fn name(&self) -> &str {
        "api-metadata"
    }

    fn supports(&self, documentation_type: DocumentationType) -> bool {
        swagger_only(documentation_type)
    }

    fn apply(&self, context: &mut ApiListingContext<'_>) -> Result<(), PluginError> {
        let handlers = context.handlers().to_vec();
        let metadata: Vec<_> = handlers.iter().filter_map(|h| h.api.as_ref()).collect();

        let description = metadata
            .iter()
            .map(|m| m.description.as_str())
            .find(|d| has_text(d));
        let position = metadata.iter().map(|m| m.position).find(|p| *p != 0);

        let builder = context.listing_builder();
        builder.description(description);
        if let Some(position) = position {
            builder.position(position);
        }
        for m in &metadata {
            builder
                .append_produces(split_list(&m.produces))
                .append_consumes(split_list(&m.consumes))
                .append_protocols(split_list(&m.protocols));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::builders::ApiListingBuilder;
    use crate::context::PathAuthorizations;
    use crate::discovery::{
        ApiMetadata, AuthorizationMetadata, AuthorizationScopeMetadata, OperationMetadata,
        ParameterMetadata, RequestHandler, ResponseMetadata,
    };
    use crate::docket::Docket;
    use crate::model::{Model, ModelProperty, Operation};
    use crate::ordering::DescriptionOrdering;

    fn handler() -> RequestHandler {
        RequestHandler {
            pattern: "/pets/{id}".to_string(),
            methods: vec![HttpMethod::Get],
            resource_group: "pet-controller".to_string(),
            handler: "getPet".to_string(),
            ..Default::default()
        }
    }

    fn run(
        plugin: &dyn OperationBuilderPlugin,
        docket: &Docket,
        handler: &RequestHandler,
        models: &BTreeMap<String, Model>,
    ) -> Result<(Operation, BTreeMap<String, Model>), PluginError> {
        let mut ctx = OperationContext::new(docket, handler, HttpMethod::Get, models);
        plugin.apply(&mut ctx)?;
        Ok(ctx.finish())
    }

    fn declared_auth(value: &str, scopes: &[&str]) -> AuthorizationMetadata {
        AuthorizationMetadata {
            value: value.to_string(),
            scopes: scopes
                .iter()
                .map(|s| AuthorizationScopeMetadata {
                    scope: s.to_string(),
                    description: String::new(),
                })
                .collect(),
        }
    }

    fn docket_with_context() -> Docket {
        let rules = PathAuthorizations::new()
            .rule("^/pets", vec![AuthorizationBuilder::new().kind("basic").build()])
            .unwrap();
        Docket::default().with_authorization_context(Arc::new(rules))
    }

    #[test]
    fn defaults_derive_identity_and_media_types() {
        let mut docket = Docket::default();
        docket.produces = vec!["application/json".to_string()];
        let handler = RequestHandler {
            consumes: vec!["application/xml".to_string()],
            response_model: Some("Pet".to_string()),
            ..handler()
        };
        let (operation, _) = run(&OperationDefaults, &docket, &handler, &BTreeMap::new()).unwrap();

        assert_eq!(operation.unique_id(), "getPetUsingGET");
        assert_eq!(operation.method(), HttpMethod::Get);
        assert_eq!(operation.summary(), Some("getPet"));
        assert_eq!(operation.response_model(), Some("Pet"));
        assert!(operation.produces().contains("application/json"));
        assert!(operation.consumes().contains("application/xml"));
    }

    #[test]
    fn path_variables_without_metadata_are_synthesized() {
        let handler = RequestHandler {
            pattern: "/owners/{ownerId}/pets/{id}".to_string(),
            parameters: vec![
                ParameterMetadata {
                    parameter: Parameter {
                        name: "id".to_string(),
                        data_type: "long".to_string(),
                        param_type: ParameterType::Path,
                        required: true,
                        ..Default::default()
                    },
                    hidden: false,
                },
                ParameterMetadata {
                    parameter: Parameter {
                        name: "session".to_string(),
                        ..Default::default()
                    },
                    hidden: true,
                },
            ],
            ..handler()
        };
        let (operation, _) =
            run(&OperationParameterReader, &Docket::default(), &handler, &BTreeMap::new()).unwrap();

        let names: Vec<&str> = operation.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "ownerId"]);
        assert_eq!(operation.parameters()[0].data_type, "long");
        assert_eq!(operation.parameters()[1].param_type, ParameterType::Path);
        assert!(operation.parameters()[1].required);
    }

    #[test]
    fn response_messages_layer_by_code() {
        let mut docket = Docket::default();
        docket
            .global_response_messages
            .insert(HttpMethod::Get, vec![ResponseMessage::new(500, "Boom")]);
        let handler = RequestHandler {
            responses: vec![ResponseMetadata {
                code: 404,
                message: "No such pet".to_string(),
                response: None,
            }],
            ..handler()
        };
        let (operation, _) =
            run(&ResponseMessagesReader, &docket, &handler, &BTreeMap::new()).unwrap();

        let codes: Vec<u16> = operation.response_messages().iter().map(|m| m.code).collect();
        assert_eq!(codes, vec![200, 401, 403, 404, 500]);
        assert_eq!(operation.response_messages()[3].message, "No such pet");
    }

    #[test]
    fn default_response_messages_can_be_disabled() {
        let mut docket = Docket::default();
        docket.use_default_response_messages = false;
        let (operation, _) =
            run(&ResponseMessagesReader, &docket, &handler(), &BTreeMap::new()).unwrap();
        assert!(operation.response_messages().is_empty());
    }

    #[test]
    fn api_operation_keeps_staged_values_for_blank_metadata() {
        let handler = RequestHandler {
            operation: Some(OperationMetadata {
                notes: "Returns a single pet".to_string(),
                produces: "application/json, application/xml".to_string(),
                ..Default::default()
            }),
            ..handler()
        };
        let docket = Docket::default();
        let models = BTreeMap::new();
        let mut ctx = OperationContext::new(&docket, &handler, HttpMethod::Get, &models);
        OperationDefaults.apply(&mut ctx).unwrap();
        ApiOperationReader.apply(&mut ctx).unwrap();
        let (operation, _) = ctx.finish();

        assert_eq!(operation.summary(), Some("getPet"));
        assert_eq!(operation.notes(), Some("Returns a single pet"));
        assert_eq!(operation.produces().len(), 2);
    }

    #[test]
    fn auth_falls_back_to_path_context() {
        let (operation, _) =
            run(&OperationAuthReader, &docket_with_context(), &handler(), &BTreeMap::new())
                .unwrap();
        assert_eq!(operation.authorizations().len(), 1);
        assert_eq!(operation.authorizations()[0].kind(), "basic");
    }

    #[test]
    fn declared_auth_replaces_path_context() {
        let handler = RequestHandler {
            operation: Some(OperationMetadata {
                authorizations: vec![declared_auth("oauth2", &["", "write:pets"])],
                ..Default::default()
            }),
            ..handler()
        };
        let (operation, _) =
            run(&OperationAuthReader, &docket_with_context(), &handler, &BTreeMap::new()).unwrap();

        assert_eq!(operation.authorizations().len(), 1);
        let auth = &operation.authorizations()[0];
        assert_eq!(auth.kind(), "oauth2");
        let scopes: Vec<&str> = auth.scopes().iter().map(|s| s.scope()).collect();
        assert_eq!(scopes, vec!["write:pets"]);
    }

    #[test]
    fn blank_first_declared_auth_keeps_path_context() {
        let handler = RequestHandler {
            operation: Some(OperationMetadata {
                authorizations: vec![declared_auth("  ", &[]), declared_auth("oauth2", &[])],
                ..Default::default()
            }),
            ..handler()
        };
        let (operation, _) =
            run(&OperationAuthReader, &docket_with_context(), &handler, &BTreeMap::new()).unwrap();
        assert_eq!(operation.authorizations()[0].kind(), "basic");
    }

    #[test]
    fn api_key_with_only_blank_scope_has_no_scopes() {
        let handler = RequestHandler {
            operation: Some(OperationMetadata {
                authorizations: vec![declared_auth("api_key", &[""])],
                ..Default::default()
            }),
            ..handler()
        };
        let (operation, _) =
            run(&OperationAuthReader, &Docket::default(), &handler, &BTreeMap::new()).unwrap();
        assert_eq!(operation.authorizations()[0].kind(), "api_key");
        assert!(operation.authorizations()[0].scopes().is_empty());
    }

    fn model(id: &str, refs: &[&str]) -> Model {
        Model {
            id: id.to_string(),
            properties: refs
                .iter()
                .map(|r| {
                    (
                        r.to_lowercase(),
                        ModelProperty {
                            data_type: r.to_string(),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn models_are_collected_transitively() {
        let mut known = BTreeMap::new();
        known.insert("Pet".to_string(), model("Pet", &["Category", "string"]));
        known.insert("Category".to_string(), model("Category", &["long"]));
        known.insert("Order".to_string(), model("Order", &[]));

        let handler = RequestHandler {
            response_model: Some("List[Pet]".to_string()),
            ..handler()
        };
        let docket = Docket::default();
        let mut ctx = OperationContext::new(&docket, &handler, HttpMethod::Get, &known);
        OperationDefaults.apply(&mut ctx).unwrap();
        OperationModelsReader.apply(&mut ctx).unwrap();
        let (_, models) = ctx.finish();

        let ids: Vec<&str> = models.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["Category", "Pet"]);
    }

    #[test]
    fn unknown_model_stays_unresolved() {
        let handler = RequestHandler {
            response_model: Some("List[Ghost]".to_string()),
            ..handler()
        };
        let docket = Docket::default();
        let known = BTreeMap::new();
        let mut ctx = OperationContext::new(&docket, &handler, HttpMethod::Get, &known);
        OperationDefaults.apply(&mut ctx).unwrap();
        OperationModelsReader.apply(&mut ctx).unwrap();

        let (operation, models) = ctx.finish();
        assert_eq!(operation.response_model(), Some("List[Ghost]"));
        assert!(models.is_empty());
    }

    #[test]
    fn element_type_unwraps_containers() {
        assert_eq!(element_type("List[Pet]"), "Pet");
        assert_eq!(element_type("Pet"), "Pet");
        assert_eq!(element_type("broken]"), "broken]");
    }

    #[test]
    fn listing_description_defaults_then_metadata_wins() {
        let docket = Docket::default();
        let plain = handler();
        let mut ctx = ApiListingContext::new(
            &docket,
            "pet-controller",
            vec![&plain],
            ApiListingBuilder::new(DescriptionOrdering::default()),
        );
        ApiListingDefaults.apply(&mut ctx).unwrap();
        ApiMetadataReader.apply(&mut ctx).unwrap();
        assert_eq!(ctx.finish().description(), Some("Pet Controller"));

        let annotated = RequestHandler {
            api: Some(ApiMetadata {
                description: "Operations about pets".to_string(),
                position: 2,
                produces: "application/json".to_string(),
                ..Default::default()
            }),
            ..handler()
        };
        let mut ctx = ApiListingContext::new(
            &docket,
            "pet-controller",
            vec![&annotated],
            ApiListingBuilder::new(DescriptionOrdering::default()),
        );
        ApiListingDefaults.apply(&mut ctx).unwrap();
        ApiMetadataReader.apply(&mut ctx).unwrap();
        let listing = ctx.finish();
        assert_eq!(listing.description(), Some("Operations about pets"));
        assert_eq!(listing.position(), 2);
        assert!(listing.produces().contains("application/json"));
    }
}
