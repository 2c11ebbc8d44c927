//! Internal documentation model.
//!
//! Aggregate entities (`Operation`, `ApiDescription`, `ApiListing`,
//! `ResourceListing`, `Documentation`, `Authorization`) are only produced by
//! the builders in [`crate::builders`] and are read-only afterwards. Plain
//! value types that arrive from the discovery collaborator (`Model`,
//! `Parameter`, `ResponseMessage`, ...) keep public fields.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::HttpMethod;

/// One property of a data model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ModelProperty {
    /// Data type name: a primitive (`string`, `long`, ...), `array`, or a model id.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Element type when `data_type` is `array`.
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub allowable_values: Vec<String>,
}

/// A data model referenced by operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qualified_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, ModelProperty>,
    #[serde(default)]
    pub base_model: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub sub_types: Vec<String>,
}

impl Model {
    /// Names of every type this model refers to directly.
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        self.properties
            .values()
            .flat_map(|p| std::iter::once(p.data_type.as_str()).chain(p.item_type.as_deref()))
            .chain(self.base_model.as_deref())
            .chain(self.sub_types.iter().map(String::as_str))
    }
}

/// Where a parameter is bound from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Path,
    #[default]
    Query,
    Body,
    Header,
    Form,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Path => "path",
            ParameterType::Query => "query",
            ParameterType::Body => "body",
            ParameterType::Header => "header",
            ParameterType::Form => "form",
        }
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub data_type: String,
    #[serde(default)]
    pub param_type: ParameterType,
    #[serde(default)]
    pub allowable_values: Vec<String>,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

/// A declared response for an operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub response_model: Option<String>,
}

impl ResponseMessage {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            response_model: None,
        }
    }
}

/// A named scope inside an authorization scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorizationScope {
    pub(crate) scope: String,
    pub(crate) description: String,
}

impl AuthorizationScope {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// An authorization requirement: a scheme type plus the scopes it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub(crate) kind: String,
    pub(crate) scopes: Vec<AuthorizationScope>,
}

impl Authorization {
    /// Scheme name, e.g. `oauth2` or `api_key`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Materialized scopes. Never contains a blank scope.
    pub fn scopes(&self) -> &[AuthorizationScope] {
        &self.scopes
    }
}

/// One HTTP method bound to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub(crate) method: HttpMethod,
    pub(crate) summary: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) nickname: Option<String>,
    pub(crate) response_model: Option<String>,
    pub(crate) position: i32,
    pub(crate) produces: BTreeSet<String>,
    pub(crate) consumes: BTreeSet<String>,
    pub(crate) protocols: BTreeSet<String>,
    pub(crate) authorizations: Vec<Authorization>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) response_messages: Vec<ResponseMessage>,
    pub(crate) deprecated: bool,
    pub(crate) hidden: bool,
    pub(crate) unique_id: String,
}

impl Operation {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn response_model(&self) -> Option<&str> {
        self.response_model.as_deref()
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn produces(&self) -> &BTreeSet<String> {
        &self.produces
    }

    pub fn consumes(&self) -> &BTreeSet<String> {
        &self.consumes
    }

    pub fn protocols(&self) -> &BTreeSet<String> {
        &self.protocols
    }

    pub fn authorizations(&self) -> &[Authorization] {
        &self.authorizations
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared responses, ordered by status code.
    pub fn response_messages(&self) -> &[ResponseMessage] {
        &self.response_messages
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Identity used to converge enrichments of the same operation.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

/// One endpoint path with its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDescription {
    pub(crate) path: String,
    pub(crate) description: Option<String>,
    pub(crate) operations: Vec<Operation>,
    pub(crate) hidden: bool,
    pub(crate) position: i32,
}

impl ApiDescription {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

/// One resource group's documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiListing {
    pub(crate) api_version: Option<String>,
    pub(crate) base_path: Option<String>,
    pub(crate) resource_path: Option<String>,
    pub(crate) produces: BTreeSet<String>,
    pub(crate) consumes: BTreeSet<String>,
    pub(crate) protocols: BTreeSet<String>,
    pub(crate) authorizations: Vec<Authorization>,
    pub(crate) apis: Vec<ApiDescription>,
    pub(crate) models: BTreeMap<String, Model>,
    pub(crate) description: Option<String>,
    pub(crate) position: i32,
}

impl ApiListing {
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn resource_path(&self) -> Option<&str> {
        self.resource_path.as_deref()
    }

    pub fn produces(&self) -> &BTreeSet<String> {
        &self.produces
    }

    pub fn consumes(&self) -> &BTreeSet<String> {
        &self.consumes
    }

    pub fn protocols(&self) -> &BTreeSet<String> {
        &self.protocols
    }

    pub fn authorizations(&self) -> &[Authorization] {
        &self.authorizations
    }

    /// Descriptions in the order of the listing's description ordering.
    pub fn apis(&self) -> &[ApiDescription] {
        &self.apis
    }

    pub fn models(&self) -> &BTreeMap<String, Model> {
        &self.models
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Entry of the resource listing pointing at one API listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiListingReference {
    pub(crate) path: String,
    pub(crate) description: Option<String>,
    pub(crate) position: i32,
}

impl ApiListingReference {
    pub fn new(path: impl Into<String>, description: Option<String>, position: i32) -> Self {
        Self {
            path: path.into(),
            description,
            position,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Descriptive metadata rendered in the resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub terms_of_service_url: String,
    pub contact: String,
    pub license: String,
    pub license_url: String,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Api Documentation".to_string(),
            description: "Api Documentation".to_string(),
            terms_of_service_url: "urn:tos".to_string(),
            contact: "Contact Email".to_string(),
            license: "Apache 2.0".to_string(),
            license_url: "http://www.apache.org/licenses/LICENSE-2.0".to_string(),
        }
    }
}

/// Security scheme advertised in the resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecurityScheme {
    ApiKey {
        name: String,
        key_name: String,
        #[serde(default = "default_pass_as")]
        pass_as: String,
    },
    BasicAuth {
        name: String,
    },
    #[serde(rename = "oauth2")]
    OAuth {
        name: String,
        #[serde(default)]
        scopes: Vec<OAuthScope>,
        login_endpoint: String,
        #[serde(default = "default_token_name")]
        token_name: String,
    },
}

/// Scope offered by an OAuth scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthScope {
    pub scope: String,
    #[serde(default)]
    pub description: String,
}

fn default_pass_as() -> String {
    "header".to_string()
}

fn default_token_name() -> String {
    "access_token".to_string()
}

impl SecurityScheme {
    /// Name under which the scheme is referenced by authorizations.
    pub fn name(&self) -> &str {
        match self {
            SecurityScheme::ApiKey { name, .. }
            | SecurityScheme::BasicAuth { name }
            | SecurityScheme::OAuth { name, .. } => name,
        }
    }
}

/// Index of resource groupings for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListing {
    pub(crate) api_version: Option<String>,
    pub(crate) apis: Vec<ApiListingReference>,
    pub(crate) security_schemes: Vec<SecurityScheme>,
    pub(crate) info: ApiInfo,
}

impl ResourceListing {
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn apis(&self) -> &[ApiListingReference] {
        &self.apis
    }

    pub fn security_schemes(&self) -> &[SecurityScheme] {
        &self.security_schemes
    }

    pub fn info(&self) -> &ApiInfo {
        &self.info
    }
}

/// Full generation result for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documentation {
    pub(crate) group_name: String,
    pub(crate) resource_listing: ResourceListing,
    pub(crate) api_listings: BTreeMap<String, ApiListing>,
}

impl Documentation {
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn resource_listing(&self) -> &ResourceListing {
        &self.resource_listing
    }

    /// Listings keyed by resource group.
    pub fn api_listings(&self) -> &BTreeMap<String, ApiListing> {
        &self.api_listings
    }
}
