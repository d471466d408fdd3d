// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote Identity Mapping
//!
//! The repository exposes a single generic remote-id slot per contact. To keep
//! our remote identities apart from anything else that may write that slot,
//! every value we store is prefixed with a per-repository instance id:
//!
//! ```text
//! tag("42")      -> "6f1c...-...-..._42"
//! untag("6f1c...-...-..._42") -> "42"
//! ```
//!
//! The instance id is a UUID generated the first time a repository is used
//! and kept in its extended properties, so tags are stable across restarts.
//! Because every tag starts with the same fixed prefix, `tag` is injective and
//! `untag(tag(x)) == x` for every non-empty `x`. Local ids are integers and can
//! never carry the prefix.

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::store::{ContactRepository, RepositoryError};

/// Extended-property key holding the repository instance id.
pub const INSTANCE_ID_KEY: &str = "LocalInstanceId";

/// Separator between the instance id and the raw identity.
const SEPARATOR: char = '_';

/// Identity mapping errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The value was not produced by [`IdentityMapper::tag`] for this repository.
    #[error("Invalid remote identity: {0}")]
    Format(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Tags and untags remote identities for one repository.
///
/// The instance id is loaded (or created) on first use and cached for the
/// lifetime of the mapper.
#[derive(Debug, Default)]
pub struct IdentityMapper {
    instance_id: Option<String>,
}

impl IdentityMapper {
    /// Creates a mapper with nothing cached yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance id, if set up.
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// Loads the repository's instance id, creating and persisting one if
    /// the repository has none yet.
    pub async fn ensure_instance_id<R>(&mut self, repository: &R) -> Result<&str, IdentityError>
    where
        R: ContactRepository + ?Sized,
    {
        if self.instance_id.is_none() {
            let properties = repository.load_extended_properties().await?;
            let instance_id = match properties.get(INSTANCE_ID_KEY) {
                Some(existing) => existing.clone(),
                None => {
                    let generated = Uuid::new_v4().to_string();
                    repository
                        .save_extended_property(INSTANCE_ID_KEY, &generated)
                        .await?;
                    debug!("Created repository instance id {}", generated);
                    generated
                }
            };
            self.instance_id = Some(instance_id);
        }

        Ok(self.instance_id.as_deref().unwrap_or_default())
    }

    /// Tags a raw remote identity for storage in the repository.
    pub async fn tag<R>(&mut self, repository: &R, raw_id: &str) -> Result<String, IdentityError>
    where
        R: ContactRepository + ?Sized,
    {
        if raw_id.is_empty() {
            return Err(IdentityError::Format("empty remote identity".into()));
        }
        let instance_id = self.ensure_instance_id(repository).await?;
        Ok(format!("{}{}{}", instance_id, SEPARATOR, raw_id))
    }

    /// Recovers the raw remote identity from a tagged value.
    pub async fn untag<R>(
        &mut self,
        repository: &R,
        tagged_id: &str,
    ) -> Result<String, IdentityError>
    where
        R: ContactRepository + ?Sized,
    {
        let instance_id = self.ensure_instance_id(repository).await?;
        tagged_id
            .strip_prefix(instance_id)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
            .ok_or_else(|| IdentityError::Format(tagged_id.to_string()))
    }
}
