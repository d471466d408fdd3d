//! Status Command

use anyhow::Result;
use contact_bridge_core::ContactRepository;
use tracing::debug;

use crate::config::CliConfig;
use crate::display;

/// Shows sync state for the data directory.
pub async fn run(config: &CliConfig) -> Result<()> {
    if !config.is_initialized() {
        display::info(&format!(
            "No contacts yet in {}. Add one with: contact-bridge add --given <name> --family <name>",
            config.data_dir.display()
        ));
        return Ok(());
    }

    debug!("Reading status from {}", config.storage_path().display());
    let mut session = config.open_session()?;
    let checkpoint = session.load_checkpoint().await?;
    let revision = session.repository().current_revision().await?;
    let pending = session.repository().get_changes_since(checkpoint).await?.len();
    let instance_id = session.instance_id().await?;

    println!();
    display::field("Data dir", &config.data_dir.display().to_string());
    display::field("Instance id", &instance_id);
    display::field("Checkpoint", &checkpoint.to_string());
    display::field("Revision", &revision.to_string());
    display::field("Pending changes", &pending.to_string());
    println!();

    Ok(())
}
