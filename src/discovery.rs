//! Endpoint metadata handed over by the discovery collaborator.
//!
//! The host framework finds request handlers and reflects their declared
//! metadata; this module only fixes the shape in which that information
//! reaches the pipeline. Every field that a host may not know is optional or
//! defaults to empty.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Model, Parameter};
use crate::types::HttpMethod;

/// Everything discovered for one application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveredApi {
    #[serde(default)]
    pub endpoints: Vec<RequestHandler>,
    /// Models reachable from handler signatures, keyed by model id.
    #[serde(default)]
    pub models: BTreeMap<String, Model>,
}

/// One request handler bound to a path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestHandler {
    /// Path template, e.g. `/pets/{id}`.
    pub pattern: String,
    /// Methods the handler answers. Empty means every method.
    #[serde(default)]
    pub methods: Vec<HttpMethod>,
    /// Grouping key of the handler; one API listing per resource group.
    pub resource_group: String,
    /// Name of the handler method.
    pub handler: String,
    #[serde(default)]
    pub produces: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterMetadata>,
    /// Model id or primitive type the handler returns.
    #[serde(default)]
    pub response_model: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    /// Operation-level documentation metadata.
    #[serde(default)]
    pub operation: Option<OperationMetadata>,
    /// Controller-level documentation metadata.
    #[serde(default)]
    pub api: Option<ApiMetadata>,
    /// Explicitly declared responses.
    #[serde(default)]
    pub responses: Vec<ResponseMetadata>,
}

impl RequestHandler {
    /// Methods to document for this handler, sorted and deduplicated.
    pub fn effective_methods(&self) -> Vec<HttpMethod> {
        let mut methods = if self.methods.is_empty() {
            HttpMethod::ALL.to_vec()
        } else {
            self.methods.clone()
        };
        methods.sort();
        methods.dedup();
        methods
    }

    /// Names of the `{variables}` in the path pattern, in order.
    pub fn path_variables(&self) -> Vec<String> {
        let mut variables = Vec::new();
        let mut rest = self.pattern.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let inner = &rest[start + 1..start + len];
            // `{id:[0-9]+}` carries a regex after the colon
            let name = inner.split(':').next().unwrap_or(inner).trim();
            if !name.is_empty() {
                variables.push(name.to_string());
            }
            rest = &rest[start + len + 1..];
        }
        variables
    }

    /// Human-readable `METHOD pattern` label used in logs and errors.
    pub fn label(&self, method: HttpMethod) -> String {
        format!("{} {}", method, self.pattern)
    }
}

/// Total order over handlers: pattern, handler name, resource group, then the
/// rest of the metadata. Only identical handlers compare equal.
pub fn handler_order(a: &RequestHandler, b: &RequestHandler) -> Ordering {
    (&a.pattern, &a.handler, &a.resource_group)
        .cmp(&(&b.pattern, &b.handler, &b.resource_group))
        .then_with(|| a.cmp(b))
}

/// Declared metadata of one handler parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterMetadata {
    #[serde(flatten)]
    pub parameter: Parameter,
    #[serde(default)]
    pub hidden: bool,
}

/// Operation-level documentation metadata.
///
/// Fields mirror what documentation annotations usually carry; blank strings
/// mean "not declared".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationMetadata {
    /// Short summary.
    pub value: String,
    pub notes: String,
    pub nickname: String,
    pub position: i32,
    /// Comma-separated media types.
    pub produces: String,
    /// Comma-separated media types.
    pub consumes: String,
    /// Comma-separated protocols.
    pub protocols: String,
    pub response: Option<String>,
    pub hidden: bool,
    pub authorizations: Vec<AuthorizationMetadata>,
}

/// One declared authorization requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationMetadata {
    /// Name of the authorization scheme.
    pub value: String,
    /// Defaults to one blank scope, the "no scope restriction" sentinel.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<AuthorizationScopeMetadata>,
}

fn default_scopes() -> Vec<AuthorizationScopeMetadata> {
    vec![AuthorizationScopeMetadata::default()]
}

/// One declared scope of an authorization requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationScopeMetadata {
    pub scope: String,
    pub description: String,
}

/// Controller-level documentation metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiMetadata {
    pub description: String,
    pub position: i32,
    /// Comma-separated media types.
    pub produces: String,
    /// Comma-separated media types.
    pub consumes: String,
    /// Comma-separated protocols.
    pub protocols: String,
    pub hidden: bool,
}

/// A response declared on the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub response: Option<String>,
}
