//! Core types shared across the documentation pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Group name used when a caller does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Swagger specification version emitted by the mapper.
pub const SWAGGER_VERSION: &str = "1.2";

/// API version rendered when a listing carries none.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Base path rendered when a listing carries none.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Scalar data types that never resolve to a model.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string",
    "int",
    "integer",
    "long",
    "float",
    "double",
    "number",
    "boolean",
    "byte",
    "date",
    "date-time",
    "void",
    "object",
    "array",
    "file",
];

/// Returns true if `data_type` is a primitive rather than a model name.
pub fn is_primitive(data_type: &str) -> bool {
    PRIMITIVE_TYPES.contains(&data_type.to_ascii_lowercase().as_str())
}

/// Documentation dialect a generation pass renders for.
///
/// Plugins declare which dialects they participate in; a pass only runs the
/// plugins whose `supports` predicate accepts its dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentationType {
    /// Swagger 1.2 resource listing / API declaration documents.
    #[default]
    #[serde(rename = "swagger-1.2", alias = "swagger")]
    Swagger12,
    /// Plain model without any dialect-specific enrichment.
    #[serde(rename = "spring-web")]
    SpringWeb,
}

impl DocumentationType {
    /// Dialect name.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentationType::Swagger12 => "swagger",
            DocumentationType::SpringWeb => "spring-web",
        }
    }

    /// Dialect version.
    pub fn version(&self) -> &'static str {
        match self {
            DocumentationType::Swagger12 => SWAGGER_VERSION,
            DocumentationType::SpringWeb => "1.0",
        }
    }
}

impl fmt::Display for DocumentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name(), self.version())
    }
}

/// HTTP method of an operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Every method, used when a handler does not restrict its methods.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Parse a method name, case-insensitively.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if the string holds at least one non-whitespace character.
pub fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Split a comma-separated media type or protocol declaration.
///
/// Blank entries are dropped and the rest trimmed.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Element type of a container type such as `List[Pet]`.
pub fn container_element(data_type: &str) -> Option<&str> {
    let open = data_type.find('[')?;
    let inner = data_type.strip_suffix(']')?;
    Some(inner[open + 1..].trim())
}
