//! Generation with publish-on-success, and the read side served to viewers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::DocumentationCache;
use crate::discovery::DiscoveredApi;
use crate::docket::Docket;
use crate::dto::{ApiListingDto, ResourceListingDto, SwaggerResourceDto};
use crate::error::GenerationError;
use crate::mapper::{to_api_listing_dto, to_resource_listing_dto};
use crate::model::Documentation;
use crate::scanner::DocumentationScanner;
use crate::types::{DEFAULT_GROUP, SWAGGER_VERSION};

/// Path the resource listings are served under.
pub const DOCUMENTATION_BASE_PATH: &str = "/api-docs";

/// Outcome of a documentation lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentResponse<T> {
    Found(T),
    NotFound,
}

impl<T> DocumentResponse<T> {
    /// HTTP status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            DocumentResponse::Found(_) => 200,
            DocumentResponse::NotFound => 404,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, DocumentResponse::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            DocumentResponse::Found(value) => Some(value),
            DocumentResponse::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for DocumentResponse<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(DocumentResponse::NotFound, DocumentResponse::Found)
    }
}

/// Owns the scanner and the cache of published documentation.
#[derive(Debug, Default)]
pub struct DocumentationService {
    scanner: DocumentationScanner,
    cache: DocumentationCache,
}

impl DocumentationService {
    pub fn new(scanner: DocumentationScanner) -> Self {
        Self {
            scanner,
            cache: DocumentationCache::new(),
        }
    }

    /// Generate the docket's group and publish it.
    ///
    /// # Errors
    ///
    /// Returns the plugin failure that aborted the pass. The previously
    /// published documentation of the group stays in place.
    pub fn generate(
        &self,
        docket: &Docket,
        api: &DiscoveredApi,
    ) -> Result<Arc<Documentation>, GenerationError> {
        match self.scanner.scan(docket, api) {
            Ok(documentation) => {
                info!(
                    group = %docket.group_name,
                    documentation_type = %docket.documentation_type,
                    listings = documentation.api_listings().len(),
                    "generated documentation"
                );
                let documentation = Arc::new(documentation);
                self.cache
                    .insert(docket.group_name.clone(), Arc::clone(&documentation));
                Ok(documentation)
            }
            Err(err) => {
                warn!(group = %docket.group_name, error = %err, "documentation generation failed");
                Err(err)
            }
        }
    }

    pub fn documentation_by_group(&self, group: &str) -> Option<Arc<Documentation>> {
        self.cache.get(group)
    }

    pub fn cache(&self) -> &DocumentationCache {
        &self.cache
    }

    /// Resource listing of a group; no group means the default one.
    pub fn resource_listing(&self, group: Option<&str>) -> DocumentResponse<ResourceListingDto> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        self.documentation_by_group(group)
            .map(|d| to_resource_listing_dto(d.resource_listing()))
            .into()
    }

    /// API declaration `key` of a group; no group means the default one.
    pub fn api_listing(&self, group: Option<&str>, key: &str) -> DocumentResponse<ApiListingDto> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        self.documentation_by_group(group)
            .and_then(|d| d.api_listings().get(key).map(to_api_listing_dto))
            .into()
    }

    /// Index of every published group.
    pub fn resources(&self) -> Vec<SwaggerResourceDto> {
        self.cache
            .group_names()
            .into_iter()
            .map(|name| SwaggerResourceDto {
                location: format!("{DOCUMENTATION_BASE_PATH}?group={name}"),
                name,
                swagger_version: SWAGGER_VERSION.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OperationContext;
    use crate::discovery::RequestHandler;
    use crate::error::PluginError;
    use crate::plugins::{default_registry, OperationBuilderPlugin};
    use crate::types::{DocumentationType, HttpMethod};

    fn api() -> DiscoveredApi {
        DiscoveredApi {
            endpoints: vec![RequestHandler {
                pattern: "/pets".to_string(),
                methods: vec![HttpMethod::Get],
                resource_group: "pets".to_string(),
                handler: "listPets".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn unknown_group_is_not_found() {
        let service = DocumentationService::default();
        let response = service.resource_listing(Some("nope"));
        assert_eq!(response, DocumentResponse::NotFound);
        assert_eq!(response.status_code(), 404);
        assert_eq!(service.api_listing(None, "pets").status_code(), 404);
    }

    #[test]
    fn generated_group_is_served() {
        let service = DocumentationService::default();
        service.generate(&Docket::default(), &api()).unwrap();

        let listing = service.resource_listing(None);
        assert_eq!(listing.status_code(), 200);
        assert_eq!(listing.into_option().unwrap().apis[0].path, "/default/pets");

        assert!(service.api_listing(Some("default"), "pets").is_found());
        assert!(!service.api_listing(Some("default"), "stores").is_found());
    }

    #[test]
    fn resources_index_every_group() {
        let service = DocumentationService::default();
        service.generate(&Docket::new("v2"), &api()).unwrap();
        service.generate(&Docket::default(), &api()).unwrap();

        let resources = service.resources();
        let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["default", "v2"]);
        assert_eq!(resources[1].location, "/api-docs?group=v2");
        assert_eq!(resources[1].swagger_version, "1.2");
    }

    struct Explode;

    impl OperationBuilderPlugin for Explode {
        fn name(&self) -> &str {
            "explode"
        }

        fn supports(&self, documentation_type: DocumentationType) -> bool {
            documentation_type == DocumentationType::SpringWeb
        }

        fn apply(&self, _: &mut OperationContext<'_>) -> Result<(), PluginError> {
            Err(PluginError::rejected("boom"))
        }
    }

    #[test]
    fn failed_generation_keeps_previous_documentation() {
        let mut registry = default_registry();
        registry.register_operation_plugin(Explode);
        let service = DocumentationService::new(DocumentationScanner::new(registry));

        let published = service.generate(&Docket::default(), &api()).unwrap();
        let failing = Docket::default().with_documentation_type(DocumentationType::SpringWeb);
        assert!(service.generate(&failing, &api()).is_err());

        let current = service.documentation_by_group("default").unwrap();
        assert!(Arc::ptr_eq(&published, &current));
    }
}
