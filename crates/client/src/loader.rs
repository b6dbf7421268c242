//! Dependent option loading
//!
//! Pickers draw their options from other entity types' collections. Before a
//! form opens, every distinct source is listed in parallel; if any one fetch
//! fails the whole load fails and the form opens with empty pickers.

use crate::error::{ClientError, ClientResult};
use crate::remote::CollectionSource;
use futures::future::try_join_all;
use gridkeeper_core::EntityRecord;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Option records keyed by source
pub type OptionSets = BTreeMap<String, Vec<EntityRecord>>;

/// Registry of the collections pickers can draw from
#[derive(Clone, Default)]
pub struct OptionLoader {
    sources: BTreeMap<String, Arc<dyn CollectionSource>>,
}

impl std::fmt::Debug for OptionLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionLoader")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl OptionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source collection
    pub fn with_source(
        mut self,
        key: impl Into<String>,
        source: Arc<dyn CollectionSource>,
    ) -> Self {
        self.register(key, source);
        self
    }

    /// Register a source collection in place
    pub fn register(&mut self, key: impl Into<String>, source: Arc<dyn CollectionSource>) {
        self.sources.insert(key.into(), source);
    }

    /// Whether a source is registered
    pub fn has_source(&self, key: &str) -> bool {
        self.sources.contains_key(key)
    }

    /// List every requested source in parallel
    ///
    /// Fails on the first failing fetch; partial results are discarded.
    pub async fn load(&self, keys: &[&str]) -> ClientResult<OptionSets> {
        if keys.is_empty() {
            return Ok(OptionSets::new());
        }

        let sources = keys
            .iter()
            .map(|key| {
                self.sources
                    .get(*key)
                    .cloned()
                    .map(|source| (key.to_string(), source))
                    .ok_or_else(|| ClientError::UnknownSource(key.to_string()))
            })
            .collect::<ClientResult<Vec<_>>>()?;

        let fetches = sources.into_iter().map(|(key, source)| async move {
            let records = source.list().await?;
            Ok::<_, ClientError>((key, records))
        });

        let loaded = try_join_all(fetches).await.inspect_err(|e| {
            tracing::error!("Failed to load picker options: {}", e);
        })?;
        tracing::debug!("Loaded options from {} source(s)", loaded.len());
        Ok(loaded.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gridkeeper_core::Identifier;
    use pretty_assertions::assert_eq;

    struct Fixed(ClientResult<Vec<EntityRecord>>);

    #[async_trait]
    impl CollectionSource for Fixed {
        async fn list(&self) -> ClientResult<Vec<EntityRecord>> {
            match &self.0 {
                Ok(records) => Ok(records.clone()),
                Err(e) => Err(ClientError::rejected(e.status().unwrap_or(500), "down")),
            }
        }
        async fn create(&self, _payload: &EntityRecord) -> ClientResult<EntityRecord> {
            unimplemented!()
        }
        async fn update(
            &self,
            _id: &Identifier,
            _payload: &EntityRecord,
        ) -> ClientResult<EntityRecord> {
            unimplemented!()
        }
        async fn delete(&self, _id: &Identifier) -> ClientResult<()> {
            unimplemented!()
        }
    }

    fn codes(codes: &[&str]) -> Arc<dyn CollectionSource> {
        Arc::new(Fixed(Ok(codes
            .iter()
            .map(|c| EntityRecord::new().with("code", *c))
            .collect())))
    }

    #[tokio::test]
    async fn test_load_all_sources() {
        let loader = OptionLoader::new()
            .with_source("divisions", codes(&["D1", "D2"]))
            .with_source("locations", codes(&["L1"]));
        let sets = loader.load(&["divisions", "locations"]).await.unwrap();
        assert_eq!(sets.get("divisions").map(Vec::len), Some(2));
        assert_eq!(sets.get("locations").map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_load() {
        let loader = OptionLoader::new()
            .with_source("divisions", codes(&["D1"]))
            .with_source("locations", Arc::new(Fixed(Err(ClientError::rejected(503, "")))));
        let err = loader.load(&["divisions", "locations"]).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let loader = OptionLoader::new();
        assert!(loader.load(&[]).await.unwrap().is_empty());
        let err = loader.load(&["ghosts"]).await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownSource(_)));
    }
}
