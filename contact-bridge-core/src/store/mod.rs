// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Repository Module
//!
//! The local contact repository is an external capability. This module
//! defines the surface the bridge consumes, plus two implementations: an
//! in-memory repository and a SQLite-backed one.

mod error;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use error::RepositoryError;
pub use memory::InMemoryContactRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteContactRepository;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::contact::ContactProperties;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Kind of mutation recorded in the change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    /// Stable lowercase name, used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }

    /// Parses a name produced by [`ChangeKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(ChangeKind::Insert),
            "update" => Some(ChangeKind::Update),
            "delete" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the repository's change log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    /// Local id of the affected contact.
    pub id: String,
    /// Remote identity of the contact at the time of the change. Tagged when
    /// it comes out of a repository, untagged once it has passed through the
    /// change enumerator.
    pub remote_id: Option<String>,
    /// Revision assigned to this change. Strictly increasing.
    pub revision: u64,
}

/// A contact as held by the repository.
///
/// `id` is `None` until the contact has been saved once. `remote_id` holds
/// the tagged value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredContact {
    pub id: Option<String>,
    pub remote_id: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub display_name: String,
    pub properties: ContactProperties,
}

/// Asynchronous contact repository capability.
///
/// Implementations must record a change for every successful save (insert
/// or update) and delete, with revisions strictly increasing across the
/// repository's lifetime.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Returns all change records with a revision greater than `revision`,
    /// ordered by ascending revision.
    async fn get_changes_since(&self, revision: u64) -> RepositoryResult<Vec<ChangeRecord>>;

    /// Looks up a contact by local id.
    async fn find_contact_by_id(&self, id: &str) -> RepositoryResult<Option<StoredContact>>;

    /// Deletes a contact by local id. Returns false if it did not exist.
    async fn delete_contact(&self, id: &str) -> RepositoryResult<bool>;

    /// Inserts (when `contact.id` is `None`) or updates a contact and returns
    /// its local id.
    async fn save_contact(&self, contact: &StoredContact) -> RepositoryResult<String>;

    /// Loads the repository-scoped extended properties.
    async fn load_extended_properties(&self) -> RepositoryResult<HashMap<String, String>>;

    /// Stores one extended property, replacing any previous value.
    async fn save_extended_property(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// Returns the highest revision assigned so far (0 for a fresh repository).
    async fn current_revision(&self) -> RepositoryResult<u64>;
}
