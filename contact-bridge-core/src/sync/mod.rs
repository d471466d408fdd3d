// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync Module
//!
//! Change enumeration, the import/export session, and the document
//! sink/source seam.

pub mod changes;
pub mod session;
pub mod transfer;

pub use changes::{ChangeEnumerator, ResolvedChange};
pub use session::{
    ExportOutcome, ImportOutcome, SyncConfig, SyncPhase, SyncSession, CHECKPOINT_KEY,
    DEFAULT_SEQUENCE_SEED,
};
pub use transfer::{DocumentSink, DocumentSource, FileDocument};
