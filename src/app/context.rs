use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, SluiceError};
use crate::config::Config;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub config: Config,
}

impl AppContext {
    /// Open the store at `db_path`, or at the configured/default location.
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.storage.db_path.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!(path = %db_path.display(), "Opening store");
        let store = Arc::new(SqliteStore::new(&db_path)?);

        Ok(Self { store, config })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self { store, config })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SluiceError::Other("Could not find data directory".into()))?;
        Ok(data_dir.join("sluice").join("sluice.db"))
    }
}
