//! Runtime configuration of one documentation group.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;

use crate::builders::{AuthorizationBuilder, AuthorizationScopeBuilder};
use crate::config::DocketConfig;
use crate::context::{AuthorizationContext, PathAuthorizations};
use crate::error::ConfigError;
use crate::model::{ApiInfo, Authorization, ResponseMessage, SecurityScheme};
use crate::ordering::DescriptionOrdering;
use crate::types::{DocumentationType, HttpMethod, DEFAULT_GROUP};

/// Settings of one group's generation pass.
#[derive(Debug, Clone)]
pub struct Docket {
    pub group_name: String,
    pub documentation_type: DocumentationType,
    pub api_version: Option<String>,
    pub base_path: Option<String>,
    pub info: ApiInfo,
    pub description_ordering: DescriptionOrdering,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    pub security_schemes: Vec<SecurityScheme>,
    pub use_default_response_messages: bool,
    pub global_response_messages: BTreeMap<HttpMethod, Vec<ResponseMessage>>,
    path_selectors: Vec<Regex>,
    authorization_context: Option<Arc<dyn AuthorizationContext>>,
}

impl Default for Docket {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP)
    }
}

impl Docket {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            documentation_type: DocumentationType::default(),
            api_version: None,
            base_path: None,
            info: ApiInfo::default(),
            description_ordering: DescriptionOrdering::default(),
            produces: vec![],
            consumes: vec![],
            protocols: vec![],
            security_schemes: vec![],
            use_default_response_messages: true,
            global_response_messages: BTreeMap::new(),
            path_selectors: vec![],
            authorization_context: None,
        }
    }

    /// Compile a configuration file into a docket.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BlankGroupName` for a blank group and
    /// `ConfigError::InvalidPathPattern` for a path or security context
    /// pattern that is not a valid regular expression.
    pub fn from_config(config: &DocketConfig) -> Result<Self, ConfigError> {
        if config.group_name.trim().is_empty() {
            return Err(ConfigError::BlankGroupName);
        }

        let mut docket = Docket::new(config.group_name.trim())
            .with_documentation_type(config.documentation_type)
            .with_paths(&config.paths)?;
        docket.api_version = config.api_version.clone();
        docket.base_path = config.base_path.clone();
        docket.info = config.info.clone().unwrap_or_default();
        docket.description_ordering = config.description_ordering.into();
        docket.produces = config.produces.clone();
        docket.consumes = config.consumes.clone();
        docket.protocols = config.protocols.clone();
        docket.security_schemes = config.security_schemes.clone();
        docket.use_default_response_messages = config.use_default_response_messages;
        docket.global_response_messages = config.global_response_messages.clone();

        if !config.security_contexts.is_empty() {
            let mut rules = PathAuthorizations::new();
            for context in &config.security_contexts {
                let authorizations: Vec<Authorization> = context
                    .authorizations
                    .iter()
                    .map(|a| {
                        AuthorizationBuilder::new()
                            .kind(&a.kind)
                            .scopes(
                                a.scopes
                                    .iter()
                                    .map(|s| {
                                        AuthorizationScopeBuilder::new()
                                            .scope(&s.scope)
                                            .description(&s.description)
                                            .build()
                                    })
                                    .collect(),
                            )
                            .build()
                    })
                    .collect();
                rules = rules.rule(&context.path_pattern, authorizations)?;
            }
            docket = docket.with_authorization_context(Arc::new(rules));
        }

        Ok(docket)
    }

    pub fn with_documentation_type(mut self, documentation_type: DocumentationType) -> Self {
        self.documentation_type = documentation_type;
        self
    }

    pub fn with_description_ordering(mut self, ordering: DescriptionOrdering) -> Self {
        self.description_ordering = ordering;
        self
    }

    pub fn with_authorization_context(mut self, context: Arc<dyn AuthorizationContext>) -> Self {
        self.authorization_context = Some(context);
        self
    }

    /// Restrict the docket to handler patterns matching any of `patterns`.
    pub fn with_paths<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, ConfigError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPathPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.path_selectors.push(regex);
        }
        Ok(self)
    }

    /// Whether a handler pattern belongs to this docket.
    pub fn includes(&self, pattern: &str) -> bool {
        self.path_selectors.is_empty() || self.path_selectors.iter().any(|r| r.is_match(pattern))
    }

    pub fn authorization_context(&self) -> Option<&dyn AuthorizationContext> {
        self.authorization_context.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthorizationConfig, SecurityContextConfig};

    #[test]
    fn path_selection() {
        let docket = Docket::default().with_paths(&["^/pets.*"]).unwrap();
        assert!(docket.includes("/pets/{id}"));
        assert!(!docket.includes("/stores"));
        assert!(Docket::default().includes("/anything"));
    }

    #[test]
    fn invalid_path_pattern() {
        let result = Docket::default().with_paths(&["("]);
        assert!(matches!(result, Err(ConfigError::InvalidPathPattern { .. })));
    }

    #[test]
    fn from_config_builds_authorization_context() {
        let config = DocketConfig {
            group_name: "admin".to_string(),
            security_contexts: vec![SecurityContextConfig {
                path_pattern: "^/admin".to_string(),
                authorizations: vec![AuthorizationConfig {
                    kind: "basic".to_string(),
                    scopes: vec![],
                }],
            }],
            ..Default::default()
        };
        let docket = Docket::from_config(&config).unwrap();
        assert_eq!(docket.group_name, "admin");

        let context = docket.authorization_context().unwrap();
        assert_eq!(context.authorizations_for_path("/admin/users")[0].kind(), "basic");
        assert!(context.authorizations_for_path("/public").is_empty());
    }

    #[test]
    fn from_config_rejects_blank_group() {
        let config = DocketConfig {
            group_name: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            Docket::from_config(&config),
            Err(ConfigError::BlankGroupName)
        ));
    }
}
