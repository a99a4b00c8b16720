//! Inventory ledger: the stock-mutation rules.
//!
//! `InventoryLedger` composes single-statement `EntityStore` calls into the
//! multi-step operations that keep stock quantities consistent:
//!
//! ```text
//! assemble_production
//!   1. gate: resolve pin + ball bearing, check stock   (no mutation)
//!   2. insert ProductionRecord
//!   3. deduct pin, then ball bearing, then finished conrod (if any)
//!
//! create_bill                      delete_bill
//!   1. insert Bill                   1. delete Bill
//!   2. deduct ProductionRecord       2. give quantity back to ProductionRecord
//!      (failure logged, swallowed)      (failure surfaced as Incomplete)
//! ```
//!
//! Steps run strictly in order and nothing is rolled back. There are no
//! locks across steps: two concurrent assemblies against the same component
//! can both pass the gate. Precondition gates always read the store, never
//! the read cache.

mod assembly;
mod billing;
mod catalog;
mod error;
mod parties;
mod stock;

pub use billing::{DeletedBill, InvoiceOutcome, LineFailure};
pub use catalog::{ImportReport, RowFailure};
pub use error::{LedgerError, LedgerResult};
pub use stock::StockIntake;

use std::future::Future;

use crate::cache::{CacheSlot, ReadCache};
use crate::config::LedgerConfig;
use crate::store::{EntityStore, StoreResult};

pub struct InventoryLedger<S> {
    store: S,
    cache: ReadCache,
    serial_retries: u32,
}

impl<S: EntityStore> InventoryLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &LedgerConfig::default())
    }

    pub fn with_config(store: S, config: &LedgerConfig) -> Self {
        Self {
            store,
            cache: ReadCache::new(config.read_cache),
            serial_retries: config.serial_retries,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

async fn read_through<T, F, Fut>(slot: &CacheSlot<T>, load: F) -> LedgerResult<Vec<T>>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = StoreResult<Vec<T>>>,
{
    let generation = match slot.lookup() {
        Ok(rows) => return Ok(rows),
        Err(generation) => generation,
    };
    let rows = load().await?;
    slot.fill(generation, &rows);
    Ok(rows)
}
