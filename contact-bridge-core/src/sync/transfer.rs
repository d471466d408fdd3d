// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Document Sink and Source
//!
//! Whole-document transfer to and from wherever the external side lives.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Accepts a complete serialized document.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn write_document(&self, contents: &str) -> io::Result<()>;
}

/// Supplies a complete serialized document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn read_document(&self) -> io::Result<Vec<u8>>;
}

/// A document stored in a local file.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileDocument {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSink for FileDocument {
    async fn write_document(&self, contents: &str) -> io::Result<()> {
        tokio::fs::write(&self.path, contents).await
    }
}

#[async_trait]
impl DocumentSource for FileDocument {
    async fn read_document(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
