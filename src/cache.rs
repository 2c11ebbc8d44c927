//! Generated documentation keyed by group name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::Documentation;

/// Published documentation of every group.
///
/// Readers get an `Arc` of the published value; a `put` swaps the whole value
/// so a reader never sees a partially generated group.
#[derive(Debug, Default)]
pub struct DocumentationCache {
    inner: RwLock<HashMap<String, Arc<Documentation>>>,
}

impl DocumentationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `documentation` under `group`, returning what it replaced.
    pub fn put(
        &self,
        group: impl Into<String>,
        documentation: Documentation,
    ) -> Option<Arc<Documentation>> {
        self.insert(group, Arc::new(documentation))
    }

    /// Publish an already shared value.
    pub fn insert(
        &self,
        group: impl Into<String>,
        documentation: Arc<Documentation>,
    ) -> Option<Arc<Documentation>> {
        self.inner.write().insert(group.into(), documentation)
    }

    pub fn get(&self, group: &str) -> Option<Arc<Documentation>> {
        self.inner.read().get(group).cloned()
    }

    /// Published group names, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, group: &str) -> Option<Arc<Documentation>> {
        self.inner.write().remove(group)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::DocumentationBuilder;

    fn documentation(group: &str) -> Documentation {
        DocumentationBuilder::new().group_name(group).build()
    }

    #[test]
    fn unknown_group_is_none() {
        let cache = DocumentationCache::new();
        assert!(cache.get("default").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces_whole_value() {
        let cache = DocumentationCache::new();
        assert!(cache.put("default", documentation("default")).is_none());
        let first = cache.get("default").unwrap();

        let replaced = cache.put("default", documentation("default")).unwrap();
        assert!(Arc::ptr_eq(&first, &replaced));
        assert!(!Arc::ptr_eq(&first, &cache.get("default").unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn group_names_sorted_and_remove() {
        let cache = DocumentationCache::new();
        cache.put("zoo", documentation("zoo"));
        cache.put("admin", documentation("admin"));
        assert_eq!(cache.group_names(), vec!["admin", "zoo"]);

        assert!(cache.remove("zoo").is_some());
        assert!(cache.remove("zoo").is_none());
        assert_eq!(cache.group_names(), vec!["admin"]);
    }

    #[test]
    fn concurrent_readers_see_published_values() {
        let cache = Arc::new(DocumentationCache::new());
        cache.put("default", documentation("default"));

        let readers: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        cache.put("default", documentation("default"));
                    }
                    cache.get("default").map(|d| d.group_name().to_string())
                })
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.join().unwrap().as_deref(), Some("default"));
        }
    }
}
