//! Infrastructure layer: storage, the inventory ledger, caching, config.

pub mod cache;
pub mod config;
pub mod ledger;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::LedgerConfig;
pub use ledger::{
    DeletedBill, ImportReport, InventoryLedger, InvoiceOutcome, LedgerError, LedgerResult,
    LineFailure, RowFailure, StockIntake,
};
pub use store::{EntityStore, InMemoryEntityStore, SqliteEntityStore, StoreError, StoreResult};
