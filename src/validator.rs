//! Validation of rendered documents against the bundled Swagger 1.2 schemas.

use serde::Serialize;
use serde_json::Value;

use crate::dto::{ApiListingDto, ResourceListingDto};
use crate::error::{SchemaError, ValidateError};

const RESOURCE_LISTING_SCHEMA: &str = include_str!("../schemas/resource-listing.json");
const API_DECLARATION_SCHEMA: &str = include_str!("../schemas/api-declaration.json");

fn bundled(source: &str) -> Result<Value, ValidateError> {
    serde_json::from_str(source).map_err(|e| ValidateError::InvalidSchema {
        message: e.to_string(),
    })
}

fn validate_rendered<T: Serialize>(schema: &str, document: &T) -> Result<(), ValidateError> {
    let schema = bundled(schema)?;
    let document = serde_json::to_value(document)?;
    validate_against_schema(&schema, &document)
}

/// Validate a rendered resource listing.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found.
pub fn validate_resource_listing(listing: &ResourceListingDto) -> Result<(), ValidateError> {
    validate_rendered(RESOURCE_LISTING_SCHEMA, listing)
}

/// Validate a rendered API declaration.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found.
pub fn validate_api_listing(listing: &ApiListingDto) -> Result<(), ValidateError> {
    validate_rendered(API_DECLARATION_SCHEMA, listing)
}

/// Validate a JSON document against a schema.
pub fn validate_against_schema(schema: &Value, document: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
        message: e.to_string(),
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(document)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
