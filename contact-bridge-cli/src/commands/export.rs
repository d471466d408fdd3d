//! Export Command
//!
//! Writes contacts changed since the checkpoint to an XML document.

use std::path::Path;

use anyhow::{Context, Result};
use contact_bridge_core::{DocumentSink, FileDocument};
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::display;

/// Exports changes and commits the checkpoint once the file is written.
pub async fn run(config: &CliConfig, output: &Path, since: Option<u64>) -> Result<()> {
    let mut session = config.open_session()?;
    let target = FileDocument::new(output);
    info!("Exporting to {}", output.display());

    let outcome = match since {
        None => session.export_to(&target).await?,
        Some(revision) => {
            let outcome = session.export_since(revision).await?;
            if revision > outcome.highest_revision {
                warn!(
                    "Revision {} is past the repository head {}",
                    revision, outcome.highest_revision
                );
            }
            target
                .write_document(&outcome.xml)
                .await
                .with_context(|| format!("Failed to write {:?}", output))?;
            session.commit_checkpoint(outcome.highest_revision).await?;
            outcome
        }
    };

    if outcome.document.is_empty() {
        display::info(&format!(
            "No contacts changed since revision {}",
            outcome.checkpoint
        ));
    }
    display::success(&format!(
        "Exported {} contacts to {}",
        outcome.document.len(),
        output.display()
    ));
    display::field("From revision", &outcome.checkpoint.to_string());
    display::field("Checkpoint", &outcome.highest_revision.to_string());
    if outcome.skipped > 0 {
        display::field("Skipped", &outcome.skipped.to_string());
    }

    Ok(())
}
