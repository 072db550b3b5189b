pub mod disk;
pub mod memory;

use crate::core::RateStore;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
pub use disk::DiskRateStore;
pub use memory::MemoryRateStore;
use std::sync::Arc;
use tracing::info;

/// Opens the store selected by `store.persist` in the configuration.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn RateStore>> {
    if !config.store.persist {
        info!("Using in-memory rate store");
        return Ok(Arc::new(MemoryRateStore::new()));
    }

    let path = config.default_data_path()?.join("store");
    let store = DiskRateStore::open(&path)
        .with_context(|| format!("Failed to open rate store at {}", path.display()))?;
    info!("Using rate store at {}", path.display());
    Ok(Arc::new(store))
}
