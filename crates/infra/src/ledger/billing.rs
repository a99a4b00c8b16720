//! Billing engine.
//!
//! A bill draws its quantity from a production batch. Creating a bill treats
//! the draw as best-effort (the bill stands even if the draw fails); deleting
//! a bill treats giving the quantity back as part of the deletion and reports
//! failure if it does not happen.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use conrod_core::{BillId, ProductionId};
use conrod_invoicing::{group_invoices, Bill, InvoiceDraft, InvoiceSummary, NewBill};
use conrod_production::ProductionRecord;

use super::{read_through, InventoryLedger, LedgerError, LedgerResult};
use crate::cache::Collection;
use crate::store::{EntityStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBill {
    pub deleted_bill_id: BillId,
    /// `None` when the batch no longer exists and the give-back was skipped.
    pub updated_production_record: Option<ProductionRecord>,
}

/// Outcome of a multi-line invoice. Lines that failed are listed by index;
/// the others are committed regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOutcome {
    pub invoice_no: String,
    pub created: Vec<Bill>,
    pub failed: Vec<LineFailure>,
}

impl InvoiceOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFailure {
    pub line: usize,
    pub message: String,
}

impl<S: EntityStore> InventoryLedger<S> {
    pub async fn list_bills(&self) -> LedgerResult<Vec<Bill>> {
        read_through(&self.cache.bills, || self.store.list_bills()).await
    }

    /// Persist a bill, then draw its quantity from the referenced batch
    /// (floored at zero). A failed draw is logged, not returned.
    pub async fn create_bill(&self, draft: NewBill) -> LedgerResult<Bill> {
        draft.validate()?;

        let bill = draft.into_bill(BillId::new(), Utc::now());
        self.store.insert_bill(&bill).await?;
        info!(
            bill_id = %bill.id,
            invoice_no = %bill.invoice_no,
            production_id = %bill.production_id,
            quantity = bill.quantity,
            amount = %bill.amount,
            "bill created"
        );

        let drawn = self
            .set_production_quantity(bill.production_id, |record| {
                record.quantity_after_billing(bill.quantity)
            })
            .await;
        match drawn {
            Ok(Some(record)) => {
                info!(production_id = %record.id, quantity = record.quantity, "production stock billed");
            }
            Ok(None) => {
                warn!(production_id = %bill.production_id, bill_id = %bill.id, "production record missing; billing deduction skipped");
            }
            Err(err) => {
                error!(
                    production_id = %bill.production_id,
                    bill_id = %bill.id,
                    error = %err,
                    "billing deduction failed; bill kept"
                );
            }
        }

        self.cache
            .invalidate(&[Collection::Bills, Collection::Production]);
        Ok(bill)
    }

    /// Delete a bill and give its quantity back to the batch.
    pub async fn delete_bill(&self, id: BillId) -> LedgerResult<DeletedBill> {
        let bill = self
            .store
            .get_bill(id)
            .await?
            .ok_or(LedgerError::NotFound("bill"))?;
        if !self.store.delete_bill(id).await? {
            return Err(LedgerError::NotFound("bill"));
        }
        info!(bill_id = %id, production_id = %bill.production_id, "bill deleted");

        let restored = self
            .set_production_quantity(bill.production_id, |record| {
                record.quantity_after_reversal(bill.quantity)
            })
            .await;
        self.cache
            .invalidate(&[Collection::Bills, Collection::Production]);

        let updated = restored.map_err(|source| LedgerError::incomplete("production reversal", source))?;
        match &updated {
            Some(record) => {
                info!(production_id = %record.id, quantity = record.quantity, "production stock restored");
            }
            None => {
                warn!(production_id = %bill.production_id, "production record missing; reversal skipped");
            }
        }

        Ok(DeletedBill {
            deleted_bill_id: id,
            updated_production_record: updated,
        })
    }

    /// One `create_bill` per line, priced `unit rate × quantity`.
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> LedgerResult<InvoiceOutcome> {
        draft.validate()?;

        let mut outcome = InvoiceOutcome {
            invoice_no: draft.invoice_no.trim().to_string(),
            created: Vec::with_capacity(draft.lines.len()),
            failed: Vec::new(),
        };

        for (line, bill_line) in draft.lines.iter().enumerate() {
            let billed = match draft.bill_for_line(bill_line) {
                Ok(new_bill) => self.create_bill(new_bill).await,
                Err(err) => Err(err.into()),
            };
            match billed {
                Ok(bill) => outcome.created.push(bill),
                Err(err) => {
                    warn!(invoice_no = %outcome.invoice_no, line, error = %err, "invoice line failed");
                    outcome.failed.push(LineFailure {
                        line,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            invoice_no = %outcome.invoice_no,
            created = outcome.created.len(),
            failed = outcome.failed.len(),
            "invoice processed"
        );
        Ok(outcome)
    }

    pub async fn list_invoices(&self) -> LedgerResult<Vec<InvoiceSummary>> {
        let bills = self.list_bills().await?;
        group_invoices(&bills).map_err(|err| StoreError::Corrupt(err.to_string()).into())
    }

    /// Remaining quantity on a batch, straight from the store.
    pub async fn production_quantity(&self, id: ProductionId) -> LedgerResult<i64> {
        self.store
            .get_production(id)
            .await?
            .map(|record| record.quantity)
            .ok_or(LedgerError::NotFound("production record"))
    }
}
