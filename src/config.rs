//! Docket configuration files.
//!
//! A docket configures the generation pass of one documentation group. Every
//! field has a default so an empty JSON object is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discovery::AuthorizationScopeMetadata;
use crate::error::ConfigError;
use crate::loader::load_json;
use crate::model::{ApiInfo, ResponseMessage, SecurityScheme};
use crate::ordering::OrderingKind;
use crate::types::{DocumentationType, HttpMethod, DEFAULT_GROUP};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocketConfig {
    pub group_name: String,
    pub documentation_type: DocumentationType,
    pub api_version: Option<String>,
    pub base_path: Option<String>,
    pub info: Option<ApiInfo>,
    /// Regular expressions selecting the handler patterns to document. Empty selects all.
    pub paths: Vec<String>,
    pub description_ordering: OrderingKind,
    /// Media types for handlers that declare none.
    pub produces: Vec<String>,
    /// Media types for handlers that declare none.
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    pub security_schemes: Vec<SecurityScheme>,
    pub security_contexts: Vec<SecurityContextConfig>,
    pub use_default_response_messages: bool,
    pub global_response_messages: BTreeMap<HttpMethod, Vec<ResponseMessage>>,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP.to_string(),
            documentation_type: DocumentationType::default(),
            api_version: None,
            base_path: None,
            info: None,
            paths: vec![],
            description_ordering: OrderingKind::default(),
            produces: vec![],
            consumes: vec![],
            protocols: vec![],
            security_schemes: vec![],
            security_contexts: vec![],
            use_default_response_messages: true,
            global_response_messages: BTreeMap::new(),
        }
    }
}

/// Path-scoped default authorizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContextConfig {
    /// Regular expression matched against handler patterns.
    pub path_pattern: String,
    #[serde(default)]
    pub authorizations: Vec<AuthorizationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub scopes: Vec<AuthorizationScopeMetadata>,
}

/// Load one docket configuration file.
pub fn load_config(path: &Path) -> Result<DocketConfig, ConfigError> {
    let config: DocketConfig = load_json(path)?;
    if config.group_name.trim().is_empty() {
        return Err(ConfigError::BlankGroupName);
    }
    Ok(config)
}
