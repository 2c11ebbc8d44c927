//! Rendering of the documentation model as Swagger 1.2 documents.
//!
//! Mapping is pure: inputs are only read. Gaps in the model are filled with
//! the Swagger defaults (`apiVersion` "1.0", `basePath` "/", operation type
//! "void", nickname from the operation's unique id).

use std::collections::BTreeMap;

use crate::dto::{
    ApiDescriptionDto, ApiInfoDto, ApiListingDto, ApiListingReferenceDto, AuthorizationScopeDto,
    AuthorizationTypeDto, AuthorizationsDto, DataTypeDto, GrantTypesDto, ImplicitGrantDto,
    ItemsDto, LoginEndpointDto, ModelDto, ModelPropertyDto, OperationDto, ParameterDto,
    ResourceListingDto, ResponseMessageDto,
};
use crate::model::{
    ApiDescription, ApiInfo, ApiListing, Authorization, Documentation, Model, Operation,
    Parameter, ResourceListing, ResponseMessage, SecurityScheme,
};
use crate::types::{
    container_element, has_text, DEFAULT_API_VERSION, DEFAULT_BASE_PATH, SWAGGER_VERSION,
};

/// Swagger `type` / `format` of a primitive data type name.
fn primitive(data_type: &str) -> Option<(&'static str, Option<&'static str>)> {
    let mapped = match data_type.to_ascii_lowercase().as_str() {
        "int" | "integer" => ("integer", Some("int32")),
        "long" => ("integer", Some("int64")),
        "float" => ("number", Some("float")),
        "double" => ("number", Some("double")),
        "number" => ("number", None),
        "date" => ("string", Some("date")),
        "date-time" => ("string", Some("date-time")),
        "byte" => ("string", Some("byte")),
        "string" => ("string", None),
        "boolean" => ("boolean", None),
        "void" => ("void", None),
        "file" => ("File", None),
        "object" => ("object", None),
        _ => return None,
    };
    Some(mapped)
}

fn items(element: &str) -> ItemsDto {
    match primitive(element) {
        Some((data_type, format)) => ItemsDto {
            data_type: Some(data_type.to_string()),
            format: format.map(str::to_string),
            ..Default::default()
        },
        None => ItemsDto {
            reference: Some(element.to_string()),
            ..Default::default()
        },
    }
}

/// Type fields of one data type.
///
/// Operations and parameters name models in `type`; model properties use
/// `$ref` (`model_as_ref`). Array elements always use `$ref`.
fn data_type(name: &str, item_type: Option<&str>, model_as_ref: bool) -> DataTypeDto {
    let (name, item_type) = match container_element(name) {
        Some(element) => ("array", Some(element)),
        None => (name.trim(), item_type),
    };

    if name.eq_ignore_ascii_case("array") {
        return DataTypeDto {
            data_type: Some("array".to_string()),
            items: item_type.filter(|t| has_text(t)).map(items),
            ..Default::default()
        };
    }

    match primitive(name) {
        Some((data_type, format)) => DataTypeDto {
            data_type: Some(data_type.to_string()),
            format: format.map(str::to_string),
            ..Default::default()
        },
        None if model_as_ref => DataTypeDto {
            reference: Some(name.to_string()),
            ..Default::default()
        },
        None => DataTypeDto {
            data_type: Some(name.to_string()),
            ..Default::default()
        },
    }
}

fn authorizations(authorizations: &[Authorization]) -> AuthorizationsDto {
    let mut rendered = AuthorizationsDto::new();
    for authorization in authorizations {
        rendered
            .entry(authorization.kind().to_string())
            .or_default()
            .extend(authorization.scopes().iter().map(|s| AuthorizationScopeDto {
                scope: s.scope().to_string(),
                description: s.description().to_string(),
            }));
    }
    rendered
}

fn parameter(parameter: &Parameter) -> ParameterDto {
    ParameterDto {
        param_type: parameter.param_type.as_str().to_string(),
        name: parameter.name.clone(),
        description: parameter.description.clone(),
        default_value: parameter.default_value.clone(),
        required: parameter.required,
        allow_multiple: parameter.allow_multiple,
        data_type: data_type(&parameter.data_type, None, false),
        allowable_values: parameter.allowable_values.clone(),
    }
}

fn response_message(message: &ResponseMessage) -> ResponseMessageDto {
    ResponseMessageDto {
        code: message.code,
        message: message.message.clone(),
        response_model: message.response_model.clone(),
    }
}

fn operation(operation: &Operation) -> OperationDto {
    let nickname = operation
        .nickname()
        .filter(|n| has_text(n))
        .unwrap_or(operation.unique_id());
    let data_type = match operation.response_model().filter(|m| has_text(m)) {
        Some(model) => data_type(model, None, false),
        None => DataTypeDto {
            data_type: Some("void".to_string()),
            ..Default::default()
        },
    };

    OperationDto {
        method: operation.method().as_str().to_string(),
        summary: operation.summary().map(str::to_string),
        notes: operation.notes().map(str::to_string),
        nickname: nickname.to_string(),
        data_type,
        produces: operation.produces().iter().cloned().collect(),
        consumes: operation.consumes().iter().cloned().collect(),
        protocols: operation.protocols().iter().cloned().collect(),
        authorizations: authorizations(operation.authorizations()),
        parameters: operation.parameters().iter().map(parameter).collect(),
        response_messages: operation
            .response_messages()
            .iter()
            .map(response_message)
            .collect(),
        deprecated: operation.is_deprecated().then(|| "true".to_string()),
        position: operation.position(),
    }
}

fn description(description: &ApiDescription) -> ApiDescriptionDto {
    ApiDescriptionDto {
        path: description.path().to_string(),
        description: description.description().map(str::to_string),
        operations: description.operations().iter().map(operation).collect(),
    }
}

fn model(model: &Model) -> ModelDto {
    ModelDto {
        id: model.id.clone(),
        description: model.description.clone(),
        required: model
            .properties
            .iter()
            .filter(|(_, p)| p.required)
            .map(|(name, _)| name.clone())
            .collect(),
        properties: model
            .properties
            .iter()
            .map(|(name, p)| {
                let property = ModelPropertyDto {
                    data_type: data_type(&p.data_type, p.item_type.as_deref(), true),
                    description: p.description.clone(),
                    allowable_values: p.allowable_values.clone(),
                    position: p.position,
                };
                (name.clone(), property)
            })
            .collect(),
        sub_types: model.sub_types.clone(),
        discriminator: model.discriminator.clone(),
    }
}

fn info(info: &ApiInfo) -> ApiInfoDto {
    ApiInfoDto {
        title: info.title.clone(),
        description: info.description.clone(),
        terms_of_service_url: info.terms_of_service_url.clone(),
        contact: info.contact.clone(),
        license: info.license.clone(),
        license_url: info.license_url.clone(),
    }
}

fn authorization_type(scheme: &SecurityScheme) -> AuthorizationTypeDto {
    match scheme {
        SecurityScheme::ApiKey {
            key_name, pass_as, ..
        } => AuthorizationTypeDto::ApiKey {
            pass_as: pass_as.clone(),
            keyname: key_name.clone(),
        },
        SecurityScheme::BasicAuth { .. } => AuthorizationTypeDto::BasicAuth,
        SecurityScheme::OAuth {
            scopes,
            login_endpoint,
            token_name,
            ..
        } => AuthorizationTypeDto::OAuth2 {
            scopes: scopes
                .iter()
                .map(|s| AuthorizationScopeDto {
                    scope: s.scope.clone(),
                    description: s.description.clone(),
                })
                .collect(),
            grant_types: GrantTypesDto {
                implicit: ImplicitGrantDto {
                    login_endpoint: LoginEndpointDto {
                        url: login_endpoint.clone(),
                    },
                    token_name: token_name.clone(),
                },
            },
        },
    }
}

/// Render one resource group's listing as a Swagger 1.2 API declaration.
pub fn to_api_listing_dto(listing: &ApiListing) -> ApiListingDto {
    ApiListingDto {
        swagger_version: SWAGGER_VERSION.to_string(),
        api_version: listing
            .api_version()
            .filter(|v| has_text(v))
            .unwrap_or(DEFAULT_API_VERSION)
            .to_string(),
        base_path: listing
            .base_path()
            .filter(|p| has_text(p))
            .unwrap_or(DEFAULT_BASE_PATH)
            .to_string(),
        resource_path: listing.resource_path().map(str::to_string),
        produces: listing.produces().iter().cloned().collect(),
        consumes: listing.consumes().iter().cloned().collect(),
        protocols: listing.protocols().iter().cloned().collect(),
        authorizations: authorizations(listing.authorizations()),
        apis: listing.apis().iter().map(description).collect(),
        models: listing
            .models()
            .iter()
            .map(|(name, m)| (name.clone(), model(m)))
            .collect(),
        description: listing.description().map(str::to_string),
        position: listing.position(),
    }
}

/// Render the resource listing of one group.
pub fn to_resource_listing_dto(listing: &ResourceListing) -> ResourceListingDto {
    ResourceListingDto {
        swagger_version: SWAGGER_VERSION.to_string(),
        api_version: listing
            .api_version()
            .filter(|v| has_text(v))
            .unwrap_or(DEFAULT_API_VERSION)
            .to_string(),
        apis: listing
            .apis()
            .iter()
            .map(|r| ApiListingReferenceDto {
                path: r.path().to_string(),
                description: r.description().map(str::to_string),
                position: r.position(),
            })
            .collect(),
        authorizations: listing
            .security_schemes()
            .iter()
            .map(|s| (s.name().to_string(), authorization_type(s)))
            .collect(),
        info: Some(info(listing.info())),
    }
}

/// Render every listing of a group, keyed like [`Documentation::api_listings`].
pub fn to_api_listing_dtos(documentation: &Documentation) -> BTreeMap<String, ApiListingDto> {
    documentation
        .api_listings()
        .iter()
        .map(|(key, listing)| (key.clone(), to_api_listing_dto(listing)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::builders::{
        ApiDescriptionBuilder, ApiListingBuilder, AuthorizationBuilder, AuthorizationScopeBuilder,
        OperationBuilder, ResourceListingBuilder,
    };
    use crate::model::{ApiListingReference, ModelProperty, OAuthScope, ParameterType};
    use crate::ordering::DescriptionOrdering;
    use crate::types::HttpMethod;

    fn listing_with(operation: Operation) -> ApiListing {
        let api = ApiDescriptionBuilder::new()
            .path("/pets")
            .operations(vec![operation])
            .build();
        ApiListingBuilder::new(DescriptionOrdering::default())
            .apis(&[api])
            .build()
    }

    #[test]
    fn gaps_take_swagger_defaults() {
        let operation = OperationBuilder::new()
            .method(HttpMethod::Get)
            .unique_id("listPetsUsingGET")
            .build();
        let dto = to_api_listing_dto(&listing_with(operation));

        assert_eq!(dto.swagger_version, "1.2");
        assert_eq!(dto.api_version, "1.0");
        assert_eq!(dto.base_path, "/");
        let op = &dto.apis[0].operations[0];
        assert_eq!(op.nickname, "listPetsUsingGET");
        assert_eq!(op.data_type.data_type.as_deref(), Some("void"));
        assert_eq!(op.deprecated, None);
    }

    #[test]
    fn empty_fields_are_omitted() {
        let operation = OperationBuilder::new().unique_id("x").build();
        let value = serde_json::to_value(to_api_listing_dto(&listing_with(operation))).unwrap();

        assert!(value.get("produces").is_none());
        assert!(value.get("models").is_none());
        assert!(value.get("description").is_none());
        let op = &value["apis"][0]["operations"][0];
        assert!(op.get("authorizations").is_none());
        assert!(op.get("responseMessages").is_none());
        assert!(op.get("summary").is_none());
        assert_eq!(op["type"], "void");
    }

    #[test]
    fn operation_fields_render_camel_case() {
        let auth = AuthorizationBuilder::new()
            .kind("oauth2")
            .scopes(vec![AuthorizationScopeBuilder::new()
                .scope("read:pets")
                .description("read your pets")
                .build()])
            .build();
        let operation = OperationBuilder::new()
            .method(HttpMethod::Get)
            .unique_id("getPetUsingGET")
            .nickname("getPet")
            .response_model("Pet")
            .produces(["application/json"])
            .parameters(vec![Parameter {
                name: "id".to_string(),
                data_type: "long".to_string(),
                param_type: ParameterType::Path,
                required: true,
                ..Default::default()
            }])
            .response_messages(vec![ResponseMessage::new(404, "Pet not found")])
            .authorizations(vec![auth])
            .deprecated(true)
            .build();
        let value = serde_json::to_value(to_api_listing_dto(&listing_with(operation))).unwrap();
        let op = &value["apis"][0]["operations"][0];

        assert_eq!(op["method"], "GET");
        assert_eq!(op["nickname"], "getPet");
        assert_eq!(op["type"], "Pet");
        assert_eq!(op["deprecated"], "true");
        assert_eq!(
            op["parameters"][0],
            json!({
                "paramType": "path",
                "name": "id",
                "required": true,
                "allowMultiple": false,
                "type": "integer",
                "format": "int64"
            })
        );
        assert_eq!(op["responseMessages"][0], json!({"code": 404, "message": "Pet not found"}));
        assert_eq!(
            op["authorizations"],
            json!({"oauth2": [{"scope": "read:pets", "description": "read your pets"}]})
        );
    }

    #[test]
    fn primitive_types_map_to_type_and_format() {
        let cases = [
            ("int", "integer", Some("int32")),
            ("long", "integer", Some("int64")),
            ("float", "number", Some("float")),
            ("double", "number", Some("double")),
            ("date", "string", Some("date")),
            ("date-time", "string", Some("date-time")),
            ("byte", "string", Some("byte")),
            ("string", "string", None),
        ];
        for (name, expected_type, expected_format) in cases {
            let dto = data_type(name, None, true);
            assert_eq!(dto.data_type.as_deref(), Some(expected_type), "{name}");
            assert_eq!(dto.format.as_deref(), expected_format, "{name}");
            assert!(dto.reference.is_none());
        }
    }

    #[test]
    fn model_properties_reference_models() {
        let mut properties = BTreeMap::new();
        properties.insert(
            "category".to_string(),
            ModelProperty {
                data_type: "Category".to_string(),
                ..Default::default()
            },
        );
        properties.insert(
            "tags".to_string(),
            ModelProperty {
                data_type: "array".to_string(),
                item_type: Some("Tag".to_string()),
                ..Default::default()
            },
        );
        properties.insert(
            "name".to_string(),
            ModelProperty {
                data_type: "string".to_string(),
                required: true,
                ..Default::default()
            },
        );
        let pet = Model {
            id: "Pet".to_string(),
            properties,
            ..Default::default()
        };
        let value = serde_json::to_value(model(&pet)).unwrap();

        assert_eq!(value["required"], json!(["name"]));
        assert_eq!(value["properties"]["category"]["$ref"], "Category");
        assert_eq!(
            value["properties"]["tags"],
            json!({"type": "array", "items": {"$ref": "Tag"}, "position": 0})
        );
    }

    #[test]
    fn container_response_model_renders_array() {
        let dto = data_type("List[Pet]", None, false);
        assert_eq!(dto.data_type.as_deref(), Some("array"));
        assert_eq!(dto.items.unwrap().reference.as_deref(), Some("Pet"));
    }

    #[test]
    fn resource_listing_renders_schemes_and_info() {
        let listing = ResourceListingBuilder::new()
            .apis(vec![
                ApiListingReference::new("/default/stores", None, 1),
                ApiListingReference::new("/default/pets", Some("Pets".to_string()), 0),
            ])
            .security_schemes(vec![
                SecurityScheme::ApiKey {
                    name: "api_key".to_string(),
                    key_name: "X-Api-Key".to_string(),
                    pass_as: "header".to_string(),
                },
                SecurityScheme::OAuth {
                    name: "petstore_auth".to_string(),
                    scopes: vec![OAuthScope {
                        scope: "write:pets".to_string(),
                        description: String::new(),
                    }],
                    login_endpoint: "https://example.com/oauth/dialog".to_string(),
                    token_name: "access_token".to_string(),
                },
            ])
            .build();
        let value = serde_json::to_value(to_resource_listing_dto(&listing)).unwrap();

        assert_eq!(value["swaggerVersion"], "1.2");
        assert_eq!(value["apiVersion"], "1.0");
        assert_eq!(value["apis"][0]["path"], "/default/pets");
        assert_eq!(
            value["authorizations"]["api_key"],
            json!({"type": "apiKey", "passAs": "header", "keyname": "X-Api-Key"})
        );
        assert_eq!(
            value["authorizations"]["petstore_auth"]["grantTypes"]["implicit"]["loginEndpoint"]
                ["url"],
            "https://example.com/oauth/dialog"
        );
        assert_eq!(value["info"]["title"], "Api Documentation");
    }

    #[test]
    fn mapping_leaves_input_untouched() {
        let operation = OperationBuilder::new().unique_id("x").summary("s").build();
        let listing = listing_with(operation);
        let before = listing.clone();
        let first = to_api_listing_dto(&listing);
        let second = to_api_listing_dto(&listing);
        assert_eq!(listing, before);
        assert_eq!(first, second);
    }
}
