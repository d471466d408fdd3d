// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Change Enumeration
//!
//! Walks the repository's change log from a checkpoint and resolves each
//! insert/update into the contact's current snapshot.

use std::vec::IntoIter;

use tracing::debug;

use crate::contact::ContactSnapshot;
use crate::error::BridgeResult;
use crate::identity::IdentityMapper;
use crate::store::{ChangeKind, ChangeRecord, ContactRepository, StoredContact};

/// A change record together with the contact it resolved to.
///
/// `snapshot` is `None` for deletes, and for inserts/updates whose contact
/// no longer exists. All remote identities are untagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChange {
    pub record: ChangeRecord,
    pub snapshot: Option<ContactSnapshot>,
}

/// Lazy, one-shot sequence of changes since a checkpoint.
///
/// The change list is fetched on the first call to [`next`](Self::next);
/// each snapshot is looked up on the call that yields it. Records come out
/// in the order the repository returns them.
pub struct ChangeEnumerator<'a, R: ContactRepository + ?Sized> {
    repository: &'a R,
    mapper: &'a mut IdentityMapper,
    checkpoint: u64,
    pending: Option<IntoIter<ChangeRecord>>,
}

impl<'a, R: ContactRepository + ?Sized> ChangeEnumerator<'a, R> {
    /// Creates an enumerator over changes with a revision above `checkpoint`.
    pub fn new(repository: &'a R, mapper: &'a mut IdentityMapper, checkpoint: u64) -> Self {
        ChangeEnumerator {
            repository,
            mapper,
            checkpoint,
            pending: None,
        }
    }

    /// Returns the checkpoint this enumerator started from.
    pub fn checkpoint(&self) -> u64 {
        self.checkpoint
    }

    /// Yields the next change, or `None` once the sequence is exhausted.
    pub async fn next(&mut self) -> BridgeResult<Option<ResolvedChange>> {
        if self.pending.is_none() {
            debug!("Getting changes since revision: {}", self.checkpoint);
            let changes = self.repository.get_changes_since(self.checkpoint).await?;
            self.pending = Some(changes.into_iter());
        }

        loop {
            let Some(mut record) = self.pending.as_mut().and_then(Iterator::next) else {
                return Ok(None);
            };
            if record.revision <= self.checkpoint {
                debug!(
                    "Ignoring change at revision {} (checkpoint {})",
                    record.revision, self.checkpoint
                );
                continue;
            }

            if let Some(tagged) = record.remote_id.take() {
                record.remote_id = Some(self.mapper.untag(self.repository, &tagged).await?);
            }
            debug!(
                "Change type: {}, local id: {}, remote id: {}, revision: {}",
                record.kind,
                record.id,
                record.remote_id.as_deref().unwrap_or("-"),
                record.revision
            );

            let snapshot = match record.kind {
                ChangeKind::Delete => None,
                ChangeKind::Insert | ChangeKind::Update => {
                    match self.repository.find_contact_by_id(&record.id).await? {
                        Some(stored) => Some(self.snapshot(&record, stored).await?),
                        None => {
                            debug!("Contact {} no longer exists", record.id);
                            None
                        }
                    }
                }
            };

            return Ok(Some(ResolvedChange { record, snapshot }));
        }
    }

    /// Drains the remaining changes into a vector.
    pub async fn collect_all(mut self) -> BridgeResult<Vec<ResolvedChange>> {
        let mut changes = Vec::new();
        while let Some(change) = self.next().await? {
            changes.push(change);
        }
        Ok(changes)
    }

    async fn snapshot(
        &mut self,
        record: &ChangeRecord,
        stored: StoredContact,
    ) -> BridgeResult<ContactSnapshot> {
        let remote_id = match stored.remote_id {
            Some(tagged) => Some(self.mapper.untag(self.repository, &tagged).await?),
            None => None,
        };

        Ok(ContactSnapshot {
            id: stored.id.unwrap_or_else(|| record.id.clone()),
            remote_id,
            given_name: stored.given_name,
            family_name: stored.family_name,
            display_name: stored.display_name,
            properties: stored.properties,
        })
    }
}
