// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Bridge Core Library
//!
//! Checkpointed export and import of local contacts through a flat XML
//! document. The local contact repository is consumed through the
//! [`ContactRepository`] trait; everything else lives here.

pub mod contact;
pub mod document;
pub mod error;
pub mod identity;
pub mod store;
pub mod sync;

pub use contact::{
    ContactDraft, ContactProperties, ContactSnapshot, KnownProperty, PropertyKind, PropertyValue,
};
pub use document::{ContactDocument, ContactRecord, DocumentError};
pub use error::{BridgeError, BridgeResult};
pub use identity::{IdentityError, IdentityMapper};
#[cfg(feature = "sqlite")]
pub use store::SqliteContactRepository;
pub use store::{
    ChangeKind, ChangeRecord, ContactRepository, InMemoryContactRepository, RepositoryError,
    StoredContact,
};
pub use sync::{
    ChangeEnumerator, DocumentSink, DocumentSource, ExportOutcome, FileDocument, ImportOutcome,
    ResolvedChange, SyncConfig, SyncPhase, SyncSession,
};
