//! Import Command
//!
//! Replaces changed local contacts with the contents of an XML document.

use std::path::Path;

use anyhow::{bail, Result};
use contact_bridge_core::FileDocument;
use tracing::info;

use crate::config::CliConfig;
use crate::display;

/// Imports a document file.
pub async fn run(config: &CliConfig, input: &Path) -> Result<()> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    info!("Importing from {}", input.display());
    let mut session = config.open_session()?;
    let outcome = session.import_from(&FileDocument::new(input)).await?;

    if outcome.purged > 0 {
        display::warning(&format!(
            "Removed {} local contacts changed since the last sync",
            outcome.purged
        ));
    }
    display::success(&format!("Imported {} contacts", outcome.created.len()));
    display::field("Revision", &outcome.revision.to_string());

    Ok(())
}
