//! Multi-line invoices.
//!
//! Creating an invoice fans out into one bill per line with no cross-line
//! atomicity; reading invoices groups stored bills back by `invoiceNo`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use conrod_core::{require_text, BillId, CustomerId, DomainError, DomainResult, ProductionId};

use crate::bill::{Bill, NewBill};

/// One requested invoice line, priced per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    #[serde(rename = "productId")]
    pub production_id: ProductionId,
    pub quantity: i64,
    pub unit_rate: Decimal,
}

impl BillLine {
    /// `unit rate × quantity`, or a validation error when the product does
    /// not fit in a `Decimal`.
    pub fn extended_amount(&self) -> DomainResult<Decimal> {
        self.unit_rate
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| DomainError::validation("line total is out of range"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub invoice_no: String,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub lines: Vec<BillLine>,
}

impl InvoiceDraft {
    /// Whole-draft checks only; line-level problems surface per line.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("invoiceNo", &self.invoice_no)?;
        if self.lines.is_empty() {
            return Err(DomainError::validation("an invoice needs at least one line"));
        }
        Ok(())
    }

    pub fn bill_for_line(&self, line: &BillLine) -> DomainResult<NewBill> {
        Ok(NewBill {
            invoice_no: self.invoice_no.clone(),
            customer_id: self.customer_id,
            production_id: line.production_id,
            quantity: line.quantity,
            amount: line.extended_amount()?,
            date: self.date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineView {
    pub bill_id: BillId,
    #[serde(rename = "productId")]
    pub production_id: ProductionId,
    pub quantity: i64,
    pub unit_rate: Decimal,
    pub amount: Decimal,
}

/// Bills sharing one `invoiceNo`. Customer and date come from the first line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub invoice_no: String,
    pub customer_id: Option<CustomerId>,
    pub date: DateTime<Utc>,
    pub lines: Vec<InvoiceLineView>,
    pub subtotal: Decimal,
}

/// Group bills by invoice number, keeping first-seen order of both invoices
/// and lines. Fails if a subtotal leaves the `Decimal` range, which only
/// happens with amounts above `MAX_BILL_AMOUNT`.
pub fn group_invoices(bills: &[Bill]) -> DomainResult<Vec<InvoiceSummary>> {
    let mut invoices: Vec<InvoiceSummary> = Vec::new();

    for bill in bills {
        let line = InvoiceLineView {
            bill_id: bill.id,
            production_id: bill.production_id,
            quantity: bill.quantity,
            unit_rate: bill.unit_rate(),
            amount: bill.amount,
        };

        match invoices.iter_mut().find(|i| i.invoice_no == bill.invoice_no) {
            Some(invoice) => {
                invoice.subtotal = invoice.subtotal.checked_add(bill.amount).ok_or_else(|| {
                    DomainError::validation(format!(
                        "subtotal of invoice {} is out of range",
                        bill.invoice_no
                    ))
                })?;
                invoice.lines.push(line);
            }
            None => invoices.push(InvoiceSummary {
                invoice_no: bill.invoice_no.clone(),
                customer_id: bill.customer_id,
                date: bill.date,
                subtotal: bill.amount,
                lines: vec![line],
            }),
        }
    }

    Ok(invoices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bill(invoice_no: &str, quantity: i64, amount: Decimal) -> Bill {
        Bill {
            id: BillId::new(),
            invoice_no: invoice_no.to_string(),
            customer_id: None,
            production_id: ProductionId::new(),
            quantity,
            amount,
            date: Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn line_amount_is_rate_times_quantity() {
        let line = BillLine {
            production_id: ProductionId::new(),
            quantity: 3,
            unit_rate: dec!(99.50),
        };
        assert_eq!(line.extended_amount().unwrap(), dec!(298.50));
    }

    #[test]
    fn draft_needs_lines_and_number() {
        let mut draft = InvoiceDraft {
            invoice_no: "INV-1".to_string(),
            customer_id: None,
            date: None,
            lines: vec![],
        };
        assert!(draft.validate().is_err());

        draft.lines.push(BillLine {
            production_id: ProductionId::new(),
            quantity: 1,
            unit_rate: dec!(10),
        });
        assert!(draft.validate().is_ok());

        draft.invoice_no = " ".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn bill_for_line_carries_header_fields() {
        let customer = CustomerId::new();
        let draft = InvoiceDraft {
            invoice_no: "INV-2".to_string(),
            customer_id: Some(customer),
            date: None,
            lines: vec![BillLine {
                production_id: ProductionId::new(),
                quantity: 4,
                unit_rate: dec!(25),
            }],
        };
        let new_bill = draft.bill_for_line(&draft.lines[0]).unwrap();
        assert_eq!(new_bill.invoice_no, "INV-2");
        assert_eq!(new_bill.customer_id, Some(customer));
        assert_eq!(new_bill.amount, dec!(100));
    }

    #[test]
    fn groups_by_invoice_number_in_first_seen_order() {
        let bills = vec![
            bill("INV-2", 3, dec!(300)),
            bill("INV-1", 1, dec!(50)),
            bill("INV-2", 2, dec!(90)),
        ];
        let invoices = group_invoices(&bills).unwrap();

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].invoice_no, "INV-2");
        assert_eq!(invoices[0].lines.len(), 2);
        assert_eq!(invoices[0].subtotal, dec!(390));
        assert_eq!(invoices[0].lines[0].unit_rate, dec!(100));
        assert_eq!(invoices[0].lines[1].unit_rate, dec!(45));
        assert_eq!(invoices[1].subtotal, dec!(50));
    }

    #[test]
    fn oversized_line_total_is_a_validation_error() {
        let draft = InvoiceDraft {
            invoice_no: "INV-3".to_string(),
            customer_id: None,
            date: None,
            lines: vec![BillLine {
                production_id: ProductionId::new(),
                quantity: i64::MAX,
                unit_rate: dec!(100_000_000_000),
            }],
        };
        assert!(matches!(
            draft.lines[0].extended_amount(),
            Err(DomainError::Validation(_))
        ));
        assert!(draft.bill_for_line(&draft.lines[0]).is_err());
    }

    #[test]
    fn overflowing_subtotal_is_an_error_not_a_panic() {
        let bills = vec![
            bill("INV-1", 1, Decimal::MAX),
            bill("INV-1", 1, Decimal::MAX),
        ];
        assert!(group_invoices(&bills).is_err());

        // Separate invoices never add their amounts together.
        let bills = vec![bill("INV-1", 1, Decimal::MAX), bill("INV-2", 1, Decimal::MAX)];
        assert_eq!(group_invoices(&bills).unwrap().len(), 2);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the stored amount divided back by quantity gives the unit rate.
            #[test]
            fn unit_rate_round_trips_through_line_total(cents in 0i64..1_000_000, quantity in 1i64..500) {
                let rate = Decimal::new(cents, 2);
                let line = BillLine { production_id: ProductionId::new(), quantity, unit_rate: rate };
                let stored = bill("INV", quantity, line.extended_amount().unwrap());
                prop_assert_eq!(stored.unit_rate(), rate);
            }

            /// Property: grouping never loses money.
            #[test]
            fn subtotals_sum_to_bill_amounts(amounts in proptest::collection::vec((0u8..4, 0i64..100_000), 0..20)) {
                let bills: Vec<Bill> = amounts
                    .iter()
                    .map(|(n, cents)| bill(&format!("INV-{n}"), 1, Decimal::new(*cents, 2)))
                    .collect();
                let total: Decimal = bills.iter().map(|b| b.amount).sum();
                let grouped: Decimal = group_invoices(&bills).unwrap().iter().map(|i| i.subtotal).sum();
                prop_assert_eq!(total, grouped);
            }
        }
    }
}
