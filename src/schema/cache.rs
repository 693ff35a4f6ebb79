// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Process-wide cache of resolved top-level message types.
//!
//! Uses RwLock for concurrent read access with exclusive write access. A miss is resolved
//! while holding the write lock, so a concurrent caller sees either nothing or a fully
//! resolved type, never a half-built one.
//!
//! Entries are keyed by the requested name and the [`CodecConfig`] the type was resolved
//! with. Resolvers with different configs sharing one cache each get a graph built with
//! their own header mapping and decode limit.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::core::{CodecConfig, SchemaError};
use crate::schema::message_type::MessageType;

static GLOBAL_CACHE: OnceLock<Arc<SchemaCache>> = OnceLock::new();

/// Resolved variants of one name, at most one per config.
type Entries = HashMap<String, Vec<MessageType>>;

/// Thread-safe cache of resolved message types.
#[derive(Default)]
pub struct SchemaCache {
    inner: RwLock<Entries>,
}

fn find<'e>(variants: &'e [MessageType], config: &CodecConfig) -> Option<&'e MessageType> {
    variants.iter().find(|ty| ty.config() == config)
}

impl SchemaCache {
    /// Create an empty, isolated cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide cache, creating it on first use.
    pub fn global() -> Arc<SchemaCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(SchemaCache::new())))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, SchemaError> {
        self.inner.read().map_err(|_| SchemaError::CachePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, SchemaError> {
        self.inner.write().map_err(|_| SchemaError::CachePoisoned)
    }

    /// Get the type cached for a name under a config.
    pub fn get(&self, name: &str, config: &CodecConfig) -> Result<Option<MessageType>, SchemaError> {
        Ok(self
            .read()?
            .get(name)
            .and_then(|variants| find(variants, config))
            .cloned())
    }

    /// Register a resolved type under its own name and config, replacing any previous entry.
    pub fn register(&self, msg_type: MessageType) -> Result<(), SchemaError> {
        let mut inner = self.write()?;
        let variants = inner.entry(msg_type.name().to_string()).or_default();
        variants.retain(|ty| ty.config() != msg_type.config());
        variants.push(msg_type);
        Ok(())
    }

    /// Get a cached type, or build and publish it under the exclusive lock.
    ///
    /// `build` runs at most once per miss; on error nothing is cached.
    pub fn get_or_try_insert_with<F>(
        &self,
        name: &str,
        config: &CodecConfig,
        build: F,
    ) -> Result<MessageType, SchemaError>
    where
        F: FnOnce() -> Result<MessageType, SchemaError>,
    {
        let mut inner = self.write()?;
        if let Some(variants) = inner.get(name) {
            if let Some(existing) = find(variants, config) {
                trace!(type_name = name, "schema cache hit after lock");
                return Ok(existing.clone());
            }
            debug!(
                type_name = name,
                cached_variants = variants.len(),
                "type cached under a different config, resolving again"
            );
        }
        let msg_type = build()?;
        inner
            .entry(name.to_string())
            .or_default()
            .push(msg_type.clone());
        debug!(type_name = name, "published message type to schema cache");
        Ok(msg_type)
    }

    /// Check if a type is cached under any config.
    pub fn contains(&self, name: &str) -> Result<bool, SchemaError> {
        Ok(self.read()?.contains_key(name))
    }

    /// Get all cached type names.
    pub fn names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    /// Remove every cached variant of one type.
    pub fn remove(&self, name: &str) -> Result<bool, SchemaError> {
        Ok(self.write()?.remove(name).is_some())
    }

    /// Clear all cached types.
    pub fn clear(&self) -> Result<(), SchemaError> {
        let mut inner = self.write()?;
        debug!(entries = inner.len(), "clearing schema cache");
        inner.clear();
        Ok(())
    }

    /// Get the number of cached entries, counting each config variant.
    pub fn len(&self) -> Result<usize, SchemaError> {
        Ok(self.read()?.values().map(Vec::len).sum())
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> Result<bool, SchemaError> {
        Ok(self.read()?.is_empty())
    }
}
