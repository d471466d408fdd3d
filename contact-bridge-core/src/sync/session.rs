// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync Session
//!
//! Drives full-collection export and import against one repository.
//!
//! Export walks the change log since the stored checkpoint and encodes every
//! contact that still exists. It returns the highest revision it saw; the
//! checkpoint is only advanced once the caller has written the document out
//! ([`SyncSession::commit_checkpoint`], or [`SyncSession::export_to`] which
//! does both).
//!
//! Import replaces rather than merges: every contact with history since the
//! checkpoint is deleted, then each record in the document is created as a
//! new contact with a fresh synthetic remote identity. The first failure
//! stops the import; contacts already written stay written.

use tracing::{debug, error, info};

use super::changes::ChangeEnumerator;
use super::transfer::{DocumentSink, DocumentSource};
use crate::contact::ContactDraft;
use crate::document::{codec, ContactDocument, DEFAULT_ROOT_ELEMENT};
use crate::error::{BridgeError, BridgeResult};
use crate::identity::IdentityMapper;
use crate::store::{ChangeKind, ContactRepository, RepositoryError, StoredContact};

/// Extended-property key holding the last synchronized revision.
pub const CHECKPOINT_KEY: &str = "LastSyncRevision";

/// Default seed for synthetic sequence ids. The first imported contact gets
/// `seed + 1`.
pub const DEFAULT_SEQUENCE_SEED: u64 = 0xDEAD_BEEF;

/// Sync configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Counter value before the first synthetic sequence id. Ids are
    /// `seed + 1`, `seed + 2`, ...; an import whose ids would overflow `u64`
    /// is rejected before anything is written.
    pub sequence_seed: u64,
    /// Root element name for exported documents.
    pub root_element: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            sequence_seed: DEFAULT_SEQUENCE_SEED,
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
        }
    }
}

impl SyncConfig {
    /// Sets the synthetic sequence seed.
    pub fn with_sequence_seed(mut self, seed: u64) -> Self {
        self.sequence_seed = seed;
        self
    }

    /// Sets the export root element name.
    pub fn with_root_element(mut self, root: &str) -> Self {
        self.root_element = root.to_string();
        self
    }
}

/// Where a session is in its current flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// Export: walking the change log.
    Enumerating,
    /// Export: serializing the document.
    Encoding,
    /// Import: deleting contacts with history since the checkpoint.
    Purging,
    /// Import: creating contacts from the document.
    Importing,
    Done,
    Failed {
        /// Error description.
        error: String,
    },
}

/// Result of an export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// The exported records.
    pub document: ContactDocument,
    /// The document in its serialized form.
    pub xml: String,
    /// Checkpoint the export started from.
    pub checkpoint: u64,
    /// Highest revision seen; the checkpoint to commit after a successful write.
    pub highest_revision: u64,
    /// Change records that produced no document entry (deletes and
    /// contacts that no longer exist).
    pub skipped: usize,
}

/// Result of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Number of local contacts deleted by the purge.
    pub purged: usize,
    /// Local ids of the created contacts, in document order.
    pub created: Vec<String>,
    /// Raw remote identities assigned, in document order.
    pub remote_ids: Vec<String>,
    /// Repository revision after the import.
    pub revision: u64,
}

/// A synchronization session bound to one repository.
///
/// Flows take `&mut self`, so one session runs one flow at a time. All
/// repository calls are awaited one after another.
pub struct SyncSession<R: ContactRepository> {
    repository: R,
    mapper: IdentityMapper,
    config: SyncConfig,
    phase: SyncPhase,
}

impl<R: ContactRepository> SyncSession<R> {
    /// Opens a session with the default configuration.
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, SyncConfig::default())
    }

    /// Opens a session with a custom configuration.
    pub fn with_config(repository: R, config: SyncConfig) -> Self {
        SyncSession {
            repository,
            mapper: IdentityMapper::new(),
            config,
            phase: SyncPhase::Idle,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn phase(&self) -> &SyncPhase {
        &self.phase
    }

    /// Returns the repository instance id used for tagging, creating it if needed.
    pub async fn instance_id(&mut self) -> BridgeResult<String> {
        Ok(self
            .mapper
            .ensure_instance_id(&self.repository)
            .await?
            .to_string())
    }

    // === Checkpoint ===

    /// Reads the stored checkpoint (0 when none has been committed).
    pub async fn load_checkpoint(&self) -> BridgeResult<u64> {
        let properties = self.repository.load_extended_properties().await?;
        match properties.get(CHECKPOINT_KEY) {
            Some(value) => value.parse().map_err(|_| {
                BridgeError::Repository(RepositoryError::Serialization(format!(
                    "invalid checkpoint '{}'",
                    value
                )))
            }),
            None => Ok(0),
        }
    }

    /// Advances the stored checkpoint. A revision at or below the stored one
    /// leaves it unchanged; a revision above the repository head is capped
    /// to the head.
    pub async fn commit_checkpoint(&self, revision: u64) -> BridgeResult<()> {
        let head = self.repository.current_revision().await?;
        let revision = revision.min(head);
        let current = self.load_checkpoint().await?;
        if revision <= current {
            debug!("Checkpoint {} not advanced to {}", current, revision);
            return Ok(());
        }
        self.repository
            .save_extended_property(CHECKPOINT_KEY, &revision.to_string())
            .await?;
        info!("Checkpoint advanced from {} to {}", current, revision);
        Ok(())
    }

    /// Resets the stored checkpoint to 0 ("from the beginning").
    pub async fn reset_checkpoint(&self) -> BridgeResult<()> {
        self.repository
            .save_extended_property(CHECKPOINT_KEY, "0")
            .await?;
        Ok(())
    }

    /// Enumerates changes since `checkpoint`, with untagged identities.
    pub fn changes_since(&mut self, checkpoint: u64) -> ChangeEnumerator<'_, R> {
        ChangeEnumerator::new(&self.repository, &mut self.mapper, checkpoint)
    }

    // === Export ===

    /// Exports changes since the stored checkpoint.
    pub async fn export(&mut self) -> BridgeResult<ExportOutcome> {
        let checkpoint = self.load_checkpoint().await?;
        self.export_since(checkpoint).await
    }

    /// Exports changes since an explicit checkpoint.
    pub async fn export_since(&mut self, checkpoint: u64) -> BridgeResult<ExportOutcome> {
        let result = self.run_export(checkpoint).await;
        self.finish(result)
    }

    /// Exports changes since the stored checkpoint, writes the document to
    /// `sink`, then commits the new checkpoint.
    pub async fn export_to<S>(&mut self, sink: &S) -> BridgeResult<ExportOutcome>
    where
        S: DocumentSink + ?Sized,
    {
        let outcome = self.export().await?;
        let result = self.deliver(sink, &outcome).await;
        self.finish(result.map(|()| outcome))
    }

    /// Writes an exported document, then commits its checkpoint.
    async fn deliver<S>(&self, sink: &S, outcome: &ExportOutcome) -> BridgeResult<()>
    where
        S: DocumentSink + ?Sized,
    {
        sink.write_document(&outcome.xml).await?;
        self.commit_checkpoint(outcome.highest_revision).await
    }

    async fn run_export(&mut self, checkpoint: u64) -> BridgeResult<ExportOutcome> {
        self.phase = SyncPhase::Enumerating;
        info!("Exporting changes since revision {}", checkpoint);

        // A checkpoint past the head must not be reported back as observed.
        let head = self.repository.current_revision().await?;
        let mut document = ContactDocument::new();
        let mut highest_revision = checkpoint.min(head);
        let mut skipped = 0;

        let mut changes = ChangeEnumerator::new(&self.repository, &mut self.mapper, checkpoint);
        while let Some(change) = changes.next().await? {
            highest_revision = highest_revision.max(change.record.revision);
            match change.snapshot {
                Some(snapshot) => document.push(codec::encode(&snapshot)),
                None => {
                    skipped += 1;
                    debug!(
                        "No entry for {} of contact {} at revision {}",
                        change.record.kind, change.record.id, change.record.revision
                    );
                }
            }
        }

        self.phase = SyncPhase::Encoding;
        let xml = crate::document::xml::write_document(&document, &self.config.root_element)?;
        info!(
            "Exported {} contacts ({} changes skipped), highest revision {}",
            document.len(),
            skipped,
            highest_revision
        );

        Ok(ExportOutcome {
            document,
            xml,
            checkpoint,
            highest_revision,
            skipped,
        })
    }

    // === Import ===

    /// Replaces local contacts with the contents of an XML document.
    pub async fn import(&mut self, input: &str) -> BridgeResult<ImportOutcome> {
        let result = self.run_import(input).await;
        self.finish(result)
    }

    /// Reads a document from `source` and imports it.
    pub async fn import_from<S>(&mut self, source: &S) -> BridgeResult<ImportOutcome>
    where
        S: DocumentSource + ?Sized,
    {
        let bytes = source.read_document().await?;
        match String::from_utf8(bytes) {
            Ok(input) => self.import(&input).await,
            Err(e) => self.finish(Err(BridgeError::DocumentParse(e.to_string()))),
        }
    }

    /// Creates a single contact outside of an import. The raw remote
    /// identity is tagged like an imported one.
    pub async fn add_contact(&mut self, draft: ContactDraft) -> BridgeResult<String> {
        self.create_contact(draft).await
    }

    async fn run_import(&mut self, input: &str) -> BridgeResult<ImportOutcome> {
        let document = ContactDocument::from_xml(input)?;
        info!("Read {} contact records", document.len());

        // Every record is decoded before anything is deleted or written, so a
        // malformed document leaves the repository untouched.
        let mut sequence_id = self.config.sequence_seed;
        let mut drafts = Vec::with_capacity(document.len());
        for record in document.records() {
            sequence_id = sequence_id.checked_add(1).ok_or_else(|| {
                BridgeError::Configuration(format!(
                    "sequence seed {} leaves no room for {} records",
                    self.config.sequence_seed,
                    document.len()
                ))
            })?;
            drafts.push(codec::decode(record, sequence_id)?);
        }

        self.phase = SyncPhase::Purging;
        let checkpoint = self.load_checkpoint().await?;
        let purged = self.purge(checkpoint).await?;

        self.phase = SyncPhase::Importing;
        let mut outcome = ImportOutcome {
            purged,
            ..Default::default()
        };
        for draft in drafts {
            let remote_id = draft.remote_id.clone();
            let id = self.create_contact(draft).await?;
            outcome.created.push(id);
            outcome.remote_ids.push(remote_id);
        }

        outcome.revision = self.repository.current_revision().await?;
        info!(
            "Imported {} contacts after removing {}",
            outcome.created.len(),
            outcome.purged
        );
        Ok(outcome)
    }

    /// Deletes every contact with an insert or update since `checkpoint`.
    async fn purge(&mut self, checkpoint: u64) -> BridgeResult<usize> {
        info!("Removing contacts changed since revision {}", checkpoint);
        let changes = self.repository.get_changes_since(checkpoint).await?;

        let mut purged = 0;
        for change in changes {
            if change.kind == ChangeKind::Delete {
                continue;
            }
            if self.repository.delete_contact(&change.id).await? {
                debug!("Deleted contact {} (revision {})", change.id, change.revision);
                purged += 1;
            }
        }
        Ok(purged)
    }

    /// Tags the draft's identity and saves it as a new contact.
    async fn create_contact(&mut self, draft: ContactDraft) -> BridgeResult<String> {
        let tagged = self.mapper.tag(&self.repository, &draft.remote_id).await?;
        let contact = StoredContact {
            id: None,
            remote_id: Some(tagged),
            given_name: draft.given_name,
            family_name: draft.family_name,
            display_name: draft.display_name,
            properties: draft.properties,
        };

        let id = self.repository.save_contact(&contact).await?;
        debug!("Created contact {} for remote id {}", id, draft.remote_id);
        Ok(id)
    }

    fn finish<T>(&mut self, result: BridgeResult<T>) -> BridgeResult<T> {
        match &result {
            Ok(_) => self.phase = SyncPhase::Done,
            Err(e) => {
                error!("Sync flow failed: {}", e);
                self.phase = SyncPhase::Failed {
                    error: e.to_string(),
                };
            }
        }
        result
    }
}
