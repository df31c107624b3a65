//! List stored subscribers.

use anyhow::{Context, Result};
use std::path::Path;
use watch_core::traits::RecipientStore;
use watch_data::RecipientFile;

use super::load_valid_config;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_valid_config(config_path)?;
    let store = RecipientFile::new(&config.storage.recipients_path);

    let ids = store
        .load()
        .await
        .with_context(|| format!("Failed to read {:?}", store.path()))?;

    println!("{} subscriber(s) in {:?}", ids.len(), store.path());
    for id in ids {
        println!("  {}", id);
    }
    Ok(())
}
