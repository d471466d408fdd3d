// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory contact repository.
//!
//! Keeps the full change log and extended properties in memory. Used by
//! tests and by callers that bring their own persistence. Supports simple
//! fault injection so failure paths can be exercised.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    ChangeKind, ChangeRecord, ContactRepository, RepositoryError, RepositoryResult,
    StoredContact,
};

#[derive(Default)]
struct MemoryState {
    contacts: BTreeMap<u64, StoredContact>,
    changes: Vec<ChangeRecord>,
    extended: HashMap<String, String>,
    revision: u64,
    next_id: u64,
    saves: usize,
    fail_saves_after: Option<usize>,
    fail_deletes: bool,
    fail_property_writes: bool,
}

impl MemoryState {
    fn record(&mut self, kind: ChangeKind, id: u64, remote_id: Option<String>) {
        self.revision += 1;
        self.changes.push(ChangeRecord {
            kind,
            id: id.to_string(),
            remote_id,
            revision: self.revision,
        });
    }
}

/// A [`ContactRepository`] held entirely in memory.
#[derive(Default)]
pub struct InMemoryContactRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryContactRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every save after the first `count` successful ones fail.
    pub fn fail_saves_after(&self, count: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_saves_after = Some(count);
        }
    }

    /// Makes every delete fail while set.
    pub fn set_fail_deletes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_deletes = fail;
        }
    }

    /// Makes every extended-property write fail while set.
    pub fn set_fail_property_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_property_writes = fail;
        }
    }

    /// Returns all live contacts ordered by local id.
    pub fn contacts(&self) -> Vec<StoredContact> {
        self.state
            .lock()
            .map(|state| state.contacts.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of live contacts.
    pub fn contact_count(&self) -> usize {
        self.state.lock().map(|s| s.contacts.len()).unwrap_or(0)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".into()))
    }
}

fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn get_changes_since(&self, revision: u64) -> RepositoryResult<Vec<ChangeRecord>> {
        let state = self.lock()?;
        Ok(state
            .changes
            .iter()
            .filter(|c| c.revision > revision)
            .cloned()
            .collect())
    }

    async fn find_contact_by_id(&self, id: &str) -> RepositoryResult<Option<StoredContact>> {
        let state = self.lock()?;
        Ok(parse_id(id).and_then(|key| state.contacts.get(&key).cloned()))
    }

    async fn delete_contact(&self, id: &str) -> RepositoryResult<bool> {
        let mut state = self.lock()?;
        if state.fail_deletes {
            return Err(RepositoryError::DeleteRejected(id.to_string()));
        }

        let Some(key) = parse_id(id) else {
            return Ok(false);
        };
        match state.contacts.remove(&key) {
            Some(removed) => {
                state.record(ChangeKind::Delete, key, removed.remote_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_contact(&self, contact: &StoredContact) -> RepositoryResult<String> {
        let mut state = self.lock()?;
        if let Some(limit) = state.fail_saves_after {
            if state.saves >= limit {
                return Err(RepositoryError::SaveRejected(format!(
                    "save limit of {} reached",
                    limit
                )));
            }
        }

        let (key, kind) = match contact.id.as_deref() {
            Some(id) => {
                let key = parse_id(id)
                    .filter(|k| state.contacts.contains_key(k))
                    .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
                (key, ChangeKind::Update)
            }
            None => {
                state.next_id += 1;
                (state.next_id, ChangeKind::Insert)
            }
        };

        let mut stored = contact.clone();
        stored.id = Some(key.to_string());
        let remote_id = stored.remote_id.clone();
        state.contacts.insert(key, stored);
        state.record(kind, key, remote_id);
        state.saves += 1;

        Ok(key.to_string())
    }

    async fn load_extended_properties(&self) -> RepositoryResult<HashMap<String, String>> {
        Ok(self.lock()?.extended.clone())
    }

    async fn save_extended_property(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut state = self.lock()?;
        if state.fail_property_writes {
            return Err(RepositoryError::SaveRejected(format!("property {}", key)));
        }
        state.extended.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn current_revision(&self) -> RepositoryResult<u64> {
        Ok(self.lock()?.revision)
    }
}
