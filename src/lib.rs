//! API documentation model assembly
//!
//! Builds a machine-readable description of an HTTP service (resources,
//! operations, parameters, authorization requirements, data models) from
//! endpoint metadata reported by a discovery collaborator, and renders it as
//! Swagger 1.2 resource listings and API declarations.
//!
//! # Example
//!
//! ```
//! use apidoc_model::{
//!     DiscoveredApi, Docket, DocumentResponse, DocumentationService, HttpMethod, RequestHandler,
//! };
//!
//! let api = DiscoveredApi {
//!     endpoints: vec![RequestHandler {
//!         pattern: "/pets".to_string(),
//!         methods: vec![HttpMethod::Get],
//!         resource_group: "pets".to_string(),
//!         handler: "listPets".to_string(),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let service = DocumentationService::default();
//! service.generate(&Docket::default(), &api).unwrap();
//!
//! match service.api_listing(None, "pets") {
//!     DocumentResponse::Found(listing) => {
//!         assert_eq!(listing.apis[0].path, "/pets");
//!         assert_eq!(listing.apis[0].operations[0].nickname, "listPets");
//!     }
//!     DocumentResponse::NotFound => unreachable!(),
//! }
//! assert_eq!(service.resource_listing(Some("other")).status_code(), 404);
//! ```
//!
//! # Pipeline
//!
//! | Stage | Module | Produces |
//! |-------|--------|----------|
//! | per (handler, method) | [`plugins`] operation chain | `Operation` |
//! | per handler | [`scanner`] | `ListingFragment` |
//! | per resource group | [`ordering`] merge, listing chain | `ApiListing` |
//! | per group | [`scanner`] | `Documentation` |
//! | on request | `mapper` | Swagger 1.2 DTOs |
//!
//! # Extending
//!
//! Implement [`OperationBuilderPlugin`] or [`ApiListingBuilderPlugin`] and
//! register it on a [`PluginRegistry`]. Plugins run in registration order, after
//! the built-in readers when registered on [`default_registry`].

mod builders;
mod cache;
mod config;
mod context;
mod discovery;
mod docket;
mod dto;
mod error;
mod loader;
mod mapper;
mod model;
pub mod ordering;
pub mod plugins;
mod readers;
pub mod scanner;
mod service;
mod types;
mod validator;

pub use builders::{
    ApiDescriptionBuilder, ApiListingBuilder, AuthorizationBuilder, AuthorizationScopeBuilder,
    DocumentationBuilder, IntoStaged, OperationBuilder, ResourceListingBuilder,
};
pub use cache::DocumentationCache;
pub use config::{load_config, AuthorizationConfig, DocketConfig, SecurityContextConfig};
pub use context::{ApiListingContext, AuthorizationContext, OperationContext, PathAuthorizations};
pub use discovery::{
    ApiMetadata, AuthorizationMetadata, AuthorizationScopeMetadata, DiscoveredApi,
    OperationMetadata, ParameterMetadata, RequestHandler, ResponseMetadata,
};
pub use docket::Docket;
pub use dto::{
    ApiDescriptionDto, ApiInfoDto, ApiListingDto, ApiListingReferenceDto, AuthorizationScopeDto,
    AuthorizationTypeDto, DataTypeDto, ItemsDto, ModelDto, ModelPropertyDto, OperationDto,
    ParameterDto, ResourceListingDto, ResponseMessageDto, SwaggerResourceDto,
};
pub use error::{ConfigError, GenerationError, LoadError, PluginError, SchemaError, ValidateError};
pub use loader::{load_discovered_api, load_json};
pub use mapper::{to_api_listing_dto, to_api_listing_dtos, to_resource_listing_dto};
pub use model::{
    ApiDescription, ApiInfo, ApiListing, ApiListingReference, Authorization, AuthorizationScope,
    Documentation, Model, ModelProperty, OAuthScope, Operation, Parameter, ParameterType,
    ResourceListing, ResponseMessage, SecurityScheme,
};
pub use ordering::{DescriptionOrdering, ListingFragment, OrderingKind};
pub use plugins::{
    default_registry, ApiListingBuilderPlugin, Capability, OperationBuilderPlugin, PluginRegistry,
};
pub use readers::register_all;
pub use scanner::DocumentationScanner;
pub use service::{DocumentResponse, DocumentationService, DOCUMENTATION_BASE_PATH};
pub use types::{DocumentationType, HttpMethod, DEFAULT_GROUP, SWAGGER_VERSION};
pub use validator::{validate_against_schema, validate_api_listing, validate_resource_listing};
