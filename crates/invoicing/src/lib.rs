//! Invoicing domain module.
//!
//! Bills are invoice line items drawn against production batches. An invoice
//! is not stored on its own: it is the set of bills sharing an `invoiceNo`.
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod bill;
pub mod invoice;

pub use bill::{Bill, NewBill, MAX_BILL_AMOUNT};
pub use invoice::{group_invoices, BillLine, InvoiceDraft, InvoiceLineView, InvoiceSummary};
