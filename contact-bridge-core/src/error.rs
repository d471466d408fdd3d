// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bridge Error Types
//!
//! Unified error type reported to callers of the import and export flows.

use thiserror::Error;

use crate::document::DocumentError;
use crate::identity::IdentityError;
use crate::store::RepositoryError;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Unified error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A stored remote identity was not produced by this repository's tagging.
    #[error("identity format error: {0}")]
    IdentityFormat(String),

    /// A contact record is missing a mandatory field or has an unusable value.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The input document is not well-formed.
    #[error("document parse error: {0}")]
    DocumentParse(String),

    /// The contact repository failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The output document could not be produced.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The session configuration cannot be applied.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Reading or writing the external document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IdentityError> for BridgeError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Format(value) => BridgeError::IdentityFormat(value),
            IdentityError::Repository(e) => BridgeError::Repository(e),
        }
    }
}

impl From<DocumentError> for BridgeError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Parse(msg) => BridgeError::DocumentParse(msg),
            DocumentError::MalformedRecord(msg) => BridgeError::MalformedRecord(msg),
            DocumentError::Write(msg) => BridgeError::Serialization(msg),
        }
    }
}
