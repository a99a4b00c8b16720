//! Conrod catalog operations and the serial allocator.
//!
//! `next_serial` is check-then-act: it proposes `high_water + 1` and fails
//! with `SerialCollision` if a live entry already holds it. The store's
//! issued-serials record is the second line: inserting a serial that was
//! ever issued before is rejected and surfaces the same way.

use serde::Serialize;
use tracing::{info, warn};

use conrod_catalog::{next_serial, ConrodDefinition, NewConrod};
use conrod_core::ConrodId;

use super::{read_through, InventoryLedger, LedgerError, LedgerResult};
use crate::cache::Collection;
use crate::store::{EntityStore, StoreError};

/// Outcome of a batch import. Rows are indexed from 0 in submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: Vec<ConrodDefinition>,
    pub failed: Vec<RowFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    pub row: usize,
    pub message: String,
}

impl<S: EntityStore> InventoryLedger<S> {
    pub async fn list_conrods(&self) -> LedgerResult<Vec<ConrodDefinition>> {
        read_through(&self.cache.conrods, || self.store.list_conrods()).await
    }

    /// Propose the next catalog serial.
    pub async fn next_serial(&self) -> LedgerResult<u32> {
        let high_water = self.store.serial_high_water().await?;
        let candidate = next_serial(high_water);
        if self.store.conrod_with_serial(candidate).await?.is_some() {
            warn!(sr_no = candidate, "serial number already taken");
            return Err(LedgerError::SerialCollision(candidate));
        }
        Ok(candidate)
    }

    pub async fn create_conrod(&self, draft: NewConrod) -> LedgerResult<ConrodDefinition> {
        draft.validate()?;
        let definition = self.insert_conrod(draft).await?;
        self.cache.invalidate(&[Collection::Conrods]);
        Ok(definition)
    }

    /// Edit name, dimensions and components. The serial number stays.
    pub async fn update_conrod(&self, id: ConrodId, draft: NewConrod) -> LedgerResult<ConrodDefinition> {
        draft.validate()?;

        let mut definition = self
            .store
            .get_conrod(id)
            .await?
            .ok_or(LedgerError::NotFound("conrod definition"))?;
        definition.apply_edit(draft);
        if !self.store.update_conrod(&definition).await? {
            return Err(LedgerError::NotFound("conrod definition"));
        }

        info!(conrod_id = %id, sr_no = definition.sr_no, "conrod definition updated");
        self.cache.invalidate(&[Collection::Conrods]);
        Ok(definition)
    }

    /// Production records referencing the entry are left dangling.
    pub async fn delete_conrod(&self, id: ConrodId) -> LedgerResult<ConrodId> {
        let removed = self.store.delete_conrod(id).await?;
        info!(conrod_id = %id, removed, "conrod definition deleted");
        self.cache.invalidate(&[Collection::Conrods]);
        Ok(id)
    }

    /// Create catalog entries one row at a time, in order. A row that loses a
    /// serial race is retried with a fresh serial; any other failure is
    /// recorded and the batch carries on.
    pub async fn import_conrods(&self, rows: Vec<NewConrod>) -> ImportReport {
        let mut report = ImportReport::default();

        for (row, draft) in rows.into_iter().enumerate() {
            if let Err(err) = draft.validate() {
                report.failed.push(RowFailure {
                    row,
                    message: LedgerError::from(err).to_string(),
                });
                continue;
            }

            let mut attempt = 0;
            loop {
                match self.insert_conrod(draft.clone()).await {
                    Ok(definition) => {
                        report.imported.push(definition);
                        break;
                    }
                    Err(err) if err.is_retryable() && attempt < self.serial_retries => {
                        attempt += 1;
                        warn!(row, attempt, error = %err, "retrying import row");
                    }
                    Err(err) => {
                        warn!(row, error = %err, "import row failed");
                        report.failed.push(RowFailure {
                            row,
                            message: err.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        if !report.imported.is_empty() {
            self.cache.invalidate(&[Collection::Conrods]);
        }
        info!(
            imported = report.imported.len(),
            failed = report.failed.len(),
            "conrod import finished"
        );
        report
    }

    async fn insert_conrod(&self, draft: NewConrod) -> LedgerResult<ConrodDefinition> {
        let sr_no = self.next_serial().await?;
        let definition = draft.into_definition(ConrodId::new(), sr_no);

        match self.store.insert_conrod(&definition).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                warn!(sr_no, "serial number issued concurrently");
                return Err(LedgerError::SerialCollision(sr_no));
            }
            Err(err) => return Err(err.into()),
        }

        info!(conrod_id = %definition.id, sr_no, name = %definition.name, "conrod definition created");
        Ok(definition)
    }
}
