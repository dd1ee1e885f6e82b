//! Prepared-template cache keyed on template text.

use std::sync::Arc;

use dashmap::DashMap;

use super::error::TemplateResult;
use super::prepared::{prepare, PreparedTemplate};
use super::PlaceholderContext;

/// Memoises prepared templates for one [`PlaceholderContext`].
///
/// Safe to share across threads. Preparation runs outside the map's shard
/// lock, so two threads racing on a new text may both prepare it; the
/// first insert wins and both get the same `Arc`. Errors are not cached.
#[derive(Debug)]
pub struct TemplateCache {
    context: PlaceholderContext,
    entries: DashMap<String, Arc<PreparedTemplate>>,
}

impl TemplateCache {
    pub fn new(context: PlaceholderContext) -> Self {
        Self {
            context,
            entries: DashMap::new(),
        }
    }

    pub fn context(&self) -> &PlaceholderContext {
        &self.context
    }

    pub fn get_or_prepare(&self, text: &str) -> TemplateResult<Arc<PreparedTemplate>> {
        if let Some(hit) = self.entries.get(text) {
            return Ok(Arc::clone(hit.value()));
        }

        let prepared = Arc::new(prepare(text, &self.context)?);
        let entry = self.entries.entry(text.to_string()).or_insert(prepared);
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnCatalog, ColumnMetadata};
    use crate::sql::dialect::Dialect;
    use crate::sql::types::DataType;
    use crate::template::TemplateError;

    fn cache() -> TemplateCache {
        let catalog = ColumnCatalog::new(
            "users",
            vec![
                ColumnMetadata::new("Id", DataType::Int64),
                ColumnMetadata::new("Email", DataType::String),
            ],
        )
        .unwrap();
        TemplateCache::new(PlaceholderContext::new(Dialect::MySql, Arc::new(catalog)))
    }

    #[test]
    fn test_same_text_shares_instance() {
        let cache = cache();
        let a = cache.get_or_prepare("SELECT {{columns}} FROM {{table}}").unwrap();
        let b = cache.get_or_prepare("SELECT {{columns}} FROM {{table}}").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.sql(), "SELECT `id`, `email` FROM `users`");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = cache();
        assert!(matches!(
            cache.get_or_prepare("SELECT {{colums}}"),
            Err(TemplateError::UnknownPlaceholder { .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = cache();
        cache.get_or_prepare("SELECT 1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
