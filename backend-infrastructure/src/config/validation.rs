use std::path::Path;

use anyhow::{anyhow, Result};

pub fn validate_sync_paths(source: &Path, destination: &Path) -> Result<()> {
    if source.as_os_str().is_empty() {
        return Err(anyhow!("source_dir must not be empty"));
    }
    if destination.as_os_str().is_empty() {
        return Err(anyhow!("destination_dir must not be empty"));
    }
    if source == destination {
        return Err(anyhow!(
            "source_dir and destination_dir must differ: {}",
            source.display()
        ));
    }
    Ok(())
}
