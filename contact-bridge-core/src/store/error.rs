// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository error types.

use thiserror::Error;

/// Errors surfaced by a contact repository.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Save rejected: {0}")]
    SaveRejected(String),

    #[error("Delete rejected: {0}")]
    DeleteRejected(String),
}
