use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use conrod_core::{require_text, BillId, CustomerId, DomainError, DomainResult, Entity, ProductionId};

/// Largest amount a single bill may carry (10^15). Keeps invoice subtotals
/// far from the `Decimal` range.
pub const MAX_BILL_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// One invoice line item.
///
/// `amount` is the extended line total (unit rate × quantity), never a
/// per-unit rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    /// Shared by every line of one invoice; not unique.
    pub invoice_no: String,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// The production batch billed against. Called `productId` on the wire.
    #[serde(rename = "productId")]
    pub production_id: ProductionId,
    pub quantity: i64,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl Bill {
    /// Per-unit rate reconstructed from the stored total.
    pub fn unit_rate(&self) -> Decimal {
        if self.quantity == 0 {
            return self.amount;
        }
        self.amount
            .checked_div(Decimal::from(self.quantity))
            .unwrap_or(self.amount)
    }
}

impl Entity for Bill {
    type Id = BillId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub invoice_no: String,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(rename = "productId")]
    pub production_id: ProductionId,
    pub quantity: i64,
    pub amount: Decimal,
    /// Defaults to the creation instant.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl NewBill {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("invoiceNo", &self.invoice_no)?;
        if self.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        if self.amount > MAX_BILL_AMOUNT {
            return Err(DomainError::validation(format!(
                "amount cannot exceed {MAX_BILL_AMOUNT}"
            )));
        }
        Ok(())
    }

    pub fn into_bill(self, id: BillId, now: DateTime<Utc>) -> Bill {
        Bill {
            id,
            invoice_no: self.invoice_no.trim().to_string(),
            customer_id: self.customer_id,
            production_id: self.production_id,
            quantity: self.quantity,
            amount: self.amount,
            date: self.date.unwrap_or(now),
        }
    }
}
