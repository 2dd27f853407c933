//! The shared mapper registry (the runtime's configuration).
//!
//! One registry per logical runtime, shared by every session and binding
//! that runtime serves. Read-mostly after start-up: the only writer
//! operation is [`MapperRegistry::add_mapper`], which registers a
//! not-yet-known mapper type.
//!
//! Register-once discipline: membership check, statement parsing, and
//! insertion all happen under a single write lock. Concurrent attempts to
//! register the same type serialize here, the loser observing the
//! winner's entry and backing off without error. A parse failure inserts
//! nothing, so the registry never holds a partial entry.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::errors::StatementError;
use crate::mapper::{MapperDescriptor, MapperMetadata};

/// The runtime's table of known mapper types and their dispatch tables.
#[derive(Debug, Default)]
pub struct MapperRegistry {
    mappers: RwLock<HashMap<TypeId, Arc<MapperMetadata>>>,
}

impl MapperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mapper type is already registered.
    pub fn has_mapper(&self, type_id: TypeId) -> bool {
        self.mappers.read().contains_key(&type_id)
    }

    /// Register a mapper if it is not already known.
    ///
    /// Returns `Ok(true)` when this call registered the mapper and
    /// `Ok(false)` when it was already present (the existing entry is
    /// never overwritten). On a parse failure nothing is inserted.
    ///
    /// The whole operation holds the write lock, so a concurrent caller
    /// cannot act on a stale membership result. Lock hold time includes
    /// parsing, which is acceptable for a start-up-only write path.
    pub fn add_mapper(&self, descriptor: &MapperDescriptor) -> Result<bool, StatementError> {
        let mut mappers = self.mappers.write();
        if mappers.contains_key(&descriptor.type_id()) {
            return Ok(false);
        }

        let metadata = MapperMetadata::build(descriptor)?;
        debug!(
            mapper = descriptor.name(),
            statements = metadata.len(),
            "registered mapper"
        );
        mappers.insert(descriptor.type_id(), Arc::new(metadata));
        Ok(true)
    }

    /// Get the dispatch table for a registered mapper.
    pub fn metadata(&self, type_id: TypeId) -> Option<Arc<MapperMetadata>> {
        self.mappers.read().get(&type_id).cloned()
    }

    /// Names of every registered mapper (unordered).
    pub fn mapper_names(&self) -> Vec<&'static str> {
        self.mappers.read().values().map(|m| m.name()).collect()
    }

    /// Number of registered mappers.
    pub fn len(&self) -> usize {
        self.mappers.read().len()
    }

    /// Whether no mapper is registered.
    pub fn is_empty(&self) -> bool {
        self.mappers.read().is_empty()
    }
}
