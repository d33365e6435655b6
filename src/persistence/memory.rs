// ABOUTME: In-memory key-value store for tests and ephemeral runs
// ABOUTME: Multi-key writes apply under a single write lock so they are atomic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use super::KeyValueStore;
use crate::errors::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local key-value store
///
/// Cloning shares the underlying map, so a test can keep a handle to
/// inspect what a controller wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    store: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`
    #[must_use]
    pub fn with_entries<K: Into<String>, V: Into<String>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            store: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let mut store = self.store.write().await;
        for (key, value) in entries {
            store.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }
}
