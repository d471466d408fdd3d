//! CLI Configuration

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use contact_bridge_core::{SqliteContactRepository, SyncSession};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for storage.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Returns the default data directory (`~/.contact-bridge`).
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".contact-bridge")
    }

    /// Returns the contact database path.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("contacts.db")
    }

    /// Returns true if the contact database exists.
    pub fn is_initialized(&self) -> bool {
        self.storage_path().exists()
    }

    /// Opens a sync session over the contact database, creating the data
    /// directory and database on first use.
    pub fn open_session(&self) -> Result<SyncSession<SqliteContactRepository>> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {:?}", self.data_dir)
        })?;
        let repository = SqliteContactRepository::open(self.storage_path())
            .with_context(|| format!("Failed to open {:?}", self.storage_path()))?;
        Ok(SyncSession::new(repository))
    }
}
