//! Deterministic ordering and merging of per-endpoint fragments.
//!
//! Endpoint discovery hands fragments over in no particular order. Everything
//! here is arranged so that the result depends only on the configured
//! ordering and the tie-break keys:
//!
//! - descriptions with the same path merge into one description
//! - operations with the same `unique_id` merge field-wise
//! - fragments with the same resource group merge into one listing fragment
//!
//! Every merge is associative and commutative, so any permutation of the
//! input yields the same output.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{
    ApiDescription, ApiListingReference, Authorization, AuthorizationScope, Model, Operation,
};

/// Comparator over descriptions supplied by a caller.
pub type DescriptionComparator = dyn Fn(&ApiDescription, &ApiDescription) -> Ordering + Send + Sync;

/// Named orderings selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKind {
    #[default]
    Position,
    Path,
}

#[derive(Clone)]
enum Primary {
    Position,
    Path,
    Custom(Arc<DescriptionComparator>),
}

/// Total ordering over [`ApiDescription`]s.
///
/// The primary comparator decides first; ties fall back to position, then
/// path, then the operation identities.
#[derive(Clone)]
pub struct DescriptionOrdering {
    primary: Primary,
}

impl DescriptionOrdering {
    /// Ascending display position.
    pub fn by_position() -> Self {
        Self {
            primary: Primary::Position,
        }
    }

    /// Lexical path order.
    pub fn by_path() -> Self {
        Self {
            primary: Primary::Path,
        }
    }

    /// Caller-supplied primary comparator.
    pub fn custom<F>(comparator: F) -> Self
    where
        F: Fn(&ApiDescription, &ApiDescription) -> Ordering + Send + Sync + 'static,
    {
        Self {
            primary: Primary::Custom(Arc::new(comparator)),
        }
    }

    pub fn compare(&self, a: &ApiDescription, b: &ApiDescription) -> Ordering {
        let primary = match &self.primary {
            Primary::Position => a.position.cmp(&b.position),
            Primary::Path => a.path.cmp(&b.path),
            Primary::Custom(comparator) => comparator(a, b),
        };
        primary
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| {
                let ids = |d: &ApiDescription| {
                    d.operations
                        .iter()
                        .map(|o| o.unique_id.clone())
                        .collect::<Vec<_>>()
                };
                ids(a).cmp(&ids(b))
            })
    }

    /// Sorted copy of `apis`; the input slice is left as is.
    pub fn sorted_copy(&self, apis: &[ApiDescription]) -> Vec<ApiDescription> {
        let mut sorted = apis.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

impl Default for DescriptionOrdering {
    fn default() -> Self {
        Self::by_position()
    }
}

impl From<OrderingKind> for DescriptionOrdering {
    fn from(kind: OrderingKind) -> Self {
        match kind {
            OrderingKind::Position => Self::by_position(),
            OrderingKind::Path => Self::by_path(),
        }
    }
}

impl fmt::Debug for DescriptionOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.primary {
            Primary::Position => "position",
            Primary::Path => "path",
            Primary::Custom(_) => "custom",
        };
        f.debug_struct("DescriptionOrdering")
            .field("primary", &name)
            .finish()
    }
}

/// Operations inside a description: position, then method, then `unique_id`.
pub fn operation_order(a: &Operation, b: &Operation) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.method.cmp(&b.method))
        .then_with(|| a.unique_id.cmp(&b.unique_id))
}

/// Resource listing entries: position, then path.
pub fn reference_order(a: &ApiListingReference, b: &ApiListingReference) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.path.cmp(&b.path))
}

/// Lexically smallest of two optional values; a present value beats an absent one.
fn min_present<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Merge two fragments describing the same operation.
pub fn merge_operation(a: Operation, b: Operation) -> Operation {
    let mut parameters: BTreeMap<_, _> = BTreeMap::new();
    for param in a.parameters.into_iter().chain(b.parameters) {
        let key = (param.param_type, param.name.clone());
        let merged = match parameters.remove(&key) {
            Some(existing) => std::cmp::min(existing, param),
            None => param,
        };
        parameters.insert(key, merged);
    }

    let mut responses = BTreeMap::new();
    for message in a.response_messages.into_iter().chain(b.response_messages) {
        let merged = match responses.remove(&message.code) {
            Some(existing) => std::cmp::min(existing, message),
            None => message,
        };
        responses.insert(merged.code, merged);
    }

    Operation {
        method: a.method.min(b.method),
        summary: min_present(a.summary, b.summary),
        notes: min_present(a.notes, b.notes),
        nickname: min_present(a.nickname, b.nickname),
        response_model: min_present(a.response_model, b.response_model),
        position: a.position.min(b.position),
        produces: a.produces.into_iter().chain(b.produces).collect(),
        consumes: a.consumes.into_iter().chain(b.consumes).collect(),
        protocols: a.protocols.into_iter().chain(b.protocols).collect(),
        authorizations: merge_authorizations(a.authorizations.into_iter().chain(b.authorizations)),
        parameters: parameters.into_values().collect(),
        response_messages: responses.into_values().collect(),
        deprecated: a.deprecated || b.deprecated,
        hidden: a.hidden || b.hidden,
        unique_id: a.unique_id.min(b.unique_id),
    }
}

/// Union authorizations by type; scopes of the same type union by scope name.
///
/// The result is ordered by type, then scope.
pub fn merge_authorizations(authorizations: impl IntoIterator<Item = Authorization>) -> Vec<Authorization> {
    let mut by_kind: BTreeMap<String, BTreeMap<String, AuthorizationScope>> = BTreeMap::new();
    for authorization in authorizations {
        let scopes = by_kind.entry(authorization.kind).or_default();
        for scope in authorization.scopes {
            let merged = match scopes.remove(&scope.scope) {
                Some(existing) => existing.min(scope),
                None => scope,
            };
            scopes.insert(merged.scope.clone(), merged);
        }
    }
    by_kind
        .into_iter()
        .map(|(kind, scopes)| Authorization {
            kind,
            scopes: scopes.into_values().collect(),
        })
        .collect()
}

fn merge_description(a: ApiDescription, b: ApiDescription) -> ApiDescription {
    let mut operations: BTreeMap<String, Operation> = BTreeMap::new();
    for operation in a.operations.into_iter().chain(b.operations) {
        let merged = match operations.remove(&operation.unique_id) {
            Some(existing) => merge_operation(existing, operation),
            None => operation,
        };
        operations.insert(merged.unique_id.clone(), merged);
    }
    let mut operations: Vec<Operation> = operations.into_values().collect();
    operations.sort_by(operation_order);

    ApiDescription {
        path: a.path,
        description: min_present(a.description, b.description),
        operations,
        hidden: a.hidden && b.hidden,
        position: a.position.min(b.position),
    }
}

/// Merge descriptions sharing a path. The result is ordered by path.
pub fn merge_descriptions(fragments: impl IntoIterator<Item = ApiDescription>) -> Vec<ApiDescription> {
    let mut by_path: BTreeMap<String, ApiDescription> = BTreeMap::new();
    for fragment in fragments {
        let merged = match by_path.remove(&fragment.path) {
            Some(existing) => merge_description(existing, fragment),
            None => fragment,
        };
        by_path.insert(merged.path.clone(), merged);
    }
    by_path.into_values().collect()
}

/// Everything one endpoint contributes to its resource group's listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFragment {
    pub resource_group: String,
    pub descriptions: Vec<ApiDescription>,
    pub produces: BTreeSet<String>,
    pub consumes: BTreeSet<String>,
    pub protocols: BTreeSet<String>,
    pub authorizations: Vec<Authorization>,
    pub models: BTreeMap<String, Model>,
}

impl ListingFragment {
    /// Combine two fragments of the same resource group.
    pub fn merge(self, other: ListingFragment) -> ListingFragment {
        let mut models = self.models;
        for (name, model) in other.models {
            let merged = match models.remove(&name) {
                Some(existing) => existing.min(model),
                None => model,
            };
            models.insert(name, merged);
        }

        ListingFragment {
            resource_group: self.resource_group,
            descriptions: merge_descriptions(self.descriptions.into_iter().chain(other.descriptions)),
            produces: self.produces.into_iter().chain(other.produces).collect(),
            consumes: self.consumes.into_iter().chain(other.consumes).collect(),
            protocols: self.protocols.into_iter().chain(other.protocols).collect(),
            authorizations: merge_authorizations(
                self.authorizations.into_iter().chain(other.authorizations),
            ),
            models,
        }
    }
}

/// Group fragments by resource group, merging those that share one.
pub fn merge_listing_fragments(
    fragments: impl IntoIterator<Item = ListingFragment>,
) -> BTreeMap<String, ListingFragment> {
    let mut grouped: BTreeMap<String, ListingFragment> = BTreeMap::new();
    for fragment in fragments {
        let key = fragment.resource_group.clone();
        let merged = match grouped.remove(&key) {
            Some(existing) => existing.merge(fragment),
            None => ListingFragment {
                descriptions: merge_descriptions(fragment.descriptions),
                authorizations: merge_authorizations(fragment.authorizations),
                ..fragment
            },
        };
        grouped.insert(key, merged);
    }
    grouped
}
