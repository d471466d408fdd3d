//! Add Command
//!
//! Creates a single local contact.

use anyhow::{bail, Result};
use contact_bridge_core::{ContactDraft, KnownProperty};
use tracing::info;
use uuid::Uuid;

use crate::config::CliConfig;
use crate::display;

/// Contact fields collected from the command line.
#[derive(Debug, Clone)]
pub struct AddRequest {
    pub given: String,
    pub family: String,
    pub display: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remote_id: Option<String>,
}

impl AddRequest {
    fn into_draft(self) -> Result<ContactDraft> {
        if self.given.trim().is_empty() || self.family.trim().is_empty() {
            bail!("Given and family name must not be empty");
        }

        let remote_id = match self.remote_id {
            Some(id) if id.is_empty() => bail!("Remote id must not be empty"),
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };
        let display_name = self
            .display
            .unwrap_or_else(|| format!("{} {}", self.given, self.family));

        let mut draft = ContactDraft::new(&remote_id, &self.given, &self.family, &display_name);
        if let Some(email) = self.email {
            draft = draft.with_property(KnownProperty::Email, email);
        }
        if let Some(phone) = self.phone {
            draft = draft.with_property(KnownProperty::MobileTelephone, phone);
        }
        Ok(draft)
    }
}

/// Adds a contact.
pub async fn run(config: &CliConfig, request: AddRequest) -> Result<()> {
    let draft = request.into_draft()?;
    let name = draft.display_name.clone();
    let remote_id = draft.remote_id.clone();

    let mut session = config.open_session()?;
    let id = session.add_contact(draft).await?;
    info!("Added contact {} with remote id {}", id, remote_id);

    display::success(&format!("Added contact: {}", name));
    display::field("Local id", &id);
    display::field("Remote id", &remote_id);

    Ok(())
}
