// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Store handle with typed operations.
//!
//! The service only issues point lookups, inserts, updates, and deletes by
//! primary key or unique secondary key (`email`, provider id,
//! `(user_id, lesson_key[, language])`); this handle exposes exactly that
//! surface. The in-memory backend serves tests and single-node deployments.
//! `new_offline()` returns a handle whose operations fail, for exercising
//! store-failure paths.

use crate::error::AppError;
use crate::models::{CacheEntry, ContentVariant, Identity, Provider};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Key for one cached transformation.
type EntryKey = (Uuid, Uuid, ContentVariant, Option<String>);

#[derive(Default)]
struct Collections {
    identities: DashMap<Uuid, Identity>,
    cache_entries: DashMap<EntryKey, CacheEntry>,
}

/// Store client.
#[derive(Clone)]
pub struct Store {
    collections: Option<Arc<Collections>>,
    read_only: bool,
}

impl Store {
    /// Create an in-memory store.
    pub fn in_memory() -> Self {
        Self {
            collections: Some(Arc::new(Collections::default())),
            read_only: false,
        }
    }

    /// Create a disconnected store for testing failure paths.
    ///
    /// All operations will return an error if called.
    pub fn new_offline() -> Self {
        Self {
            collections: None,
            read_only: false,
        }
    }

    /// Create a store that serves reads but fails every write, for testing
    /// degraded-store behavior.
    pub fn new_read_only() -> Self {
        Self {
            collections: Some(Arc::new(Collections::default())),
            read_only: true,
        }
    }

    /// Helper to get the collections or return an error if offline.
    fn collections(&self) -> Result<&Collections, AppError> {
        self.collections
            .as_deref()
            .ok_or_else(|| AppError::Database("store not connected (offline mode)".to_string()))
    }

    /// Helper to get the collections for a write operation.
    fn collections_mut(&self) -> Result<&Collections, AppError> {
        if self.read_only {
            return Err(AppError::Database(
                "store is in read-only mode".to_string(),
            ));
        }
        self.collections()
    }

    // ─── Identity Operations ─────────────────────────────────────

    /// Get an identity by its primary key.
    pub async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>, AppError> {
        Ok(self
            .collections()?
            .identities
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    /// Look up an identity by its unique email.
    pub async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, AppError> {
        Ok(self
            .collections()?
            .identities
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    /// Look up an identity by a provider's user id.
    pub async fn find_identity_by_provider(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<Option<Identity>, AppError> {
        Ok(self
            .collections()?
            .identities
            .iter()
            .find(|entry| entry.value().provider_id(provider) == Some(provider_id))
            .map(|entry| entry.value().clone()))
    }

    /// Insert a new identity. Enforces the unique-email constraint.
    pub async fn insert_identity(&self, identity: &Identity) -> Result<(), AppError> {
        let collections = self.collections_mut()?;
        if collections
            .identities
            .iter()
            .any(|entry| entry.value().email == identity.email)
        {
            return Err(AppError::Database(format!(
                "unique constraint violation on email for identity {}",
                identity.id
            )));
        }
        collections
            .identities
            .insert(identity.id, identity.clone());
        Ok(())
    }

    /// Update an existing identity in place.
    pub async fn update_identity(&self, identity: &Identity) -> Result<(), AppError> {
        let collections = self.collections_mut()?;
        if !collections.identities.contains_key(&identity.id) {
            return Err(AppError::Database(format!(
                "identity {} does not exist",
                identity.id
            )));
        }
        collections
            .identities
            .insert(identity.id, identity.clone());
        Ok(())
    }

    // ─── Cache-Entry Operations ──────────────────────────────────

    /// Get a cached transformation for `(user, lesson, variant[, language])`.
    pub async fn get_cache_entry(
        &self,
        user_id: Uuid,
        lesson_key: Uuid,
        variant: ContentVariant,
        language: Option<&str>,
    ) -> Result<Option<CacheEntry>, AppError> {
        let key = (user_id, lesson_key, variant, language.map(str::to_string));
        Ok(self
            .collections()?
            .cache_entries
            .get(&key)
            .map(|entry| entry.value().clone()))
    }

    /// Write a cached transformation. Racing writers for the same key
    /// converge on a single row; the last write wins.
    pub async fn upsert_cache_entry(&self, entry: &CacheEntry) -> Result<(), AppError> {
        let key = (
            entry.user_id,
            entry.lesson_key,
            entry.variant,
            entry.target_language.clone(),
        );
        self.collections_mut()?.cache_entries.insert(key, entry.clone());
        Ok(())
    }

    /// Delete a cached transformation. Deleting a missing entry is not an
    /// error.
    pub async fn delete_cache_entry(
        &self,
        user_id: Uuid,
        lesson_key: Uuid,
        variant: ContentVariant,
        language: Option<&str>,
    ) -> Result<(), AppError> {
        let key = (user_id, lesson_key, variant, language.map(str::to_string));
        self.collections_mut()?.cache_entries.remove(&key);
        Ok(())
    }
}
