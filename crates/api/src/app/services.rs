//! Service wiring: pick a store backend and build the shared ledger.

use std::sync::Arc;

use conrod_infra::{
    EntityStore, InMemoryEntityStore, InventoryLedger, LedgerConfig, SqliteEntityStore, StoreResult,
};

/// The ledger as the HTTP layer sees it: backend chosen at startup.
pub type AppLedger = InventoryLedger<Arc<dyn EntityStore>>;

pub struct AppServices {
    pub ledger: AppLedger,
}

impl AppServices {
    pub fn new(store: Arc<dyn EntityStore>, config: &LedgerConfig) -> Self {
        Self {
            ledger: InventoryLedger::with_config(store, config),
        }
    }

    /// In-memory services with default settings (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEntityStore::new()), &LedgerConfig::default())
    }
}

/// SQLite when `database_url` is set, in-memory otherwise.
pub async fn build_services(config: &LedgerConfig) -> StoreResult<AppServices> {
    let store: Arc<dyn EntityStore> = match config.database_url.as_deref() {
        Some(url) => {
            tracing::info!(database_url = url, "using sqlite entity store");
            Arc::new(SqliteEntityStore::connect(url).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            Arc::new(InMemoryEntityStore::new())
        }
    };

    tracing::info!(
        read_cache = config.read_cache,
        serial_retries = config.serial_retries,
        "ledger services ready"
    );
    Ok(AppServices::new(store, config))
}
