// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! SQLite-backed contact repository.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    ChangeKind, ChangeRecord, ContactRepository, RepositoryError, RepositoryResult,
    StoredContact,
};
use crate::contact::ContactProperties;

/// Schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    remote_id       TEXT,
    given_name      TEXT NOT NULL,
    family_name     TEXT NOT NULL,
    display_name    TEXT NOT NULL,
    properties_json TEXT NOT NULL DEFAULT '{}'
);

-- Append-only change log. Rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS changes (
    revision   INTEGER PRIMARY KEY AUTOINCREMENT,
    kind       TEXT NOT NULL,   -- 'insert' | 'update' | 'delete'
    contact_id INTEGER NOT NULL,
    remote_id  TEXT
);

CREATE TABLE IF NOT EXISTS extended_properties (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Internal struct for database row data.
struct ContactRow {
    id: i64,
    remote_id: Option<String>,
    given_name: String,
    family_name: String,
    display_name: String,
    properties_json: String,
}

impl ContactRow {
    fn into_contact(self) -> RepositoryResult<StoredContact> {
        let properties: ContactProperties = serde_json::from_str(&self.properties_json)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(StoredContact {
            id: Some(self.id.to_string()),
            remote_id: self.remote_id,
            given_name: self.given_name,
            family_name: self.family_name,
            display_name: self.display_name,
            properties,
        })
    }
}

/// A [`ContactRepository`] stored in a SQLite database.
pub struct SqliteContactRepository {
    conn: Mutex<Connection>,
}

impl SqliteContactRepository {
    /// Opens or creates a repository database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Creates an in-memory repository (for testing).
    pub fn in_memory() -> RepositoryResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> RepositoryResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteContactRepository {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection lock poisoned".into()))
    }
}

fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

/// Converts a stored revision back to the trait's unsigned form.
fn revision_from_db(revision: i64) -> RepositoryResult<u64> {
    u64::try_from(revision)
        .map_err(|_| RepositoryError::Serialization(format!("negative revision {}", revision)))
}

fn record_change(
    conn: &Connection,
    kind: ChangeKind,
    contact_id: i64,
    remote_id: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO changes (kind, contact_id, remote_id) VALUES (?1, ?2, ?3)",
        params![kind.as_str(), contact_id, remote_id],
    )?;
    Ok(())
}

#[async_trait]
impl ContactRepository for SqliteContactRepository {
    async fn get_changes_since(&self, revision: u64) -> RepositoryResult<Vec<ChangeRecord>> {
        // SQLite revisions are i64, so nothing lies above a larger watermark.
        let Ok(revision) = i64::try_from(revision) else {
            return Ok(Vec::new());
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT revision, kind, contact_id, remote_id
             FROM changes WHERE revision > ?1 ORDER BY revision",
        )?;

        let rows = stmt.query_map(params![revision], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut changes = Vec::new();
        for row_result in rows {
            let (revision, kind, contact_id, remote_id) = row_result?;
            let kind = ChangeKind::parse(&kind).ok_or_else(|| {
                RepositoryError::Serialization(format!("unknown change kind '{}'", kind))
            })?;
            changes.push(ChangeRecord {
                kind,
                id: contact_id.to_string(),
                remote_id,
                revision: revision_from_db(revision)?,
            });
        }

        Ok(changes)
    }

    async fn find_contact_by_id(&self, id: &str) -> RepositoryResult<Option<StoredContact>> {
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };

        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, remote_id, given_name, family_name, display_name, properties_json
                 FROM contacts WHERE id = ?1",
                params![key],
                |row| {
                    Ok(ContactRow {
                        id: row.get(0)?,
                        remote_id: row.get(1)?,
                        given_name: row.get(2)?,
                        family_name: row.get(3)?,
                        display_name: row.get(4)?,
                        properties_json: row.get(5)?,
                    })
                },
            )
            .optional()?;

        row.map(ContactRow::into_contact).transpose()
    }

    async fn delete_contact(&self, id: &str) -> RepositoryResult<bool> {
        let Some(key) = parse_id(id) else {
            return Ok(false);
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let remote_id: Option<Option<String>> = tx
            .query_row(
                "SELECT remote_id FROM contacts WHERE id = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(remote_id) = remote_id else {
            return Ok(false);
        };

        tx.execute("DELETE FROM contacts WHERE id = ?1", params![key])?;
        record_change(&tx, ChangeKind::Delete, key, remote_id.as_deref())?;
        tx.commit()?;
        Ok(true)
    }

    async fn save_contact(&self, contact: &StoredContact) -> RepositoryResult<String> {
        let properties_json = serde_json::to_string(&contact.properties)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let key = match contact.id.as_deref() {
            Some(id) => {
                let key = parse_id(id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
                let rows_affected = tx.execute(
                    "UPDATE contacts
                     SET remote_id = ?1, given_name = ?2, family_name = ?3,
                         display_name = ?4, properties_json = ?5
                     WHERE id = ?6",
                    params![
                        contact.remote_id,
                        contact.given_name,
                        contact.family_name,
                        contact.display_name,
                        properties_json,
                        key,
                    ],
                )?;
                if rows_affected == 0 {
                    return Err(RepositoryError::NotFound(id.to_string()));
                }
                record_change(&tx, ChangeKind::Update, key, contact.remote_id.as_deref())?;
                key
            }
            None => {
                tx.execute(
                    "INSERT INTO contacts
                     (remote_id, given_name, family_name, display_name, properties_json)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        contact.remote_id,
                        contact.given_name,
                        contact.family_name,
                        contact.display_name,
                        properties_json,
                    ],
                )?;
                let key = tx.last_insert_rowid();
                record_change(&tx, ChangeKind::Insert, key, contact.remote_id.as_deref())?;
                key
            }
        };

        tx.commit()?;
        Ok(key.to_string())
    }

    async fn load_extended_properties(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM extended_properties")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut properties = HashMap::new();
        for row_result in rows {
            let (key, value): (String, String) = row_result?;
            properties.insert(key, value);
        }
        Ok(properties)
    }

    async fn save_extended_property(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO extended_properties (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    async fn current_revision(&self) -> RepositoryResult<u64> {
        let revision: i64 = self.lock()?.query_row(
            "SELECT COALESCE(MAX(revision), 0) FROM changes",
            [],
            |row| row.get(0),
        )?;
        revision_from_db(revision)
    }
}
