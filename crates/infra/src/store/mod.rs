//! Entity store boundary.
//!
//! One method per persistence statement. The ledger composes these into
//! multi-step operations; the store itself never spans an operation, so a
//! concurrent reader can observe the intermediate states between steps.
//!
//! Lists come back in insertion order. The component resolver's
//! "first match wins" rule depends on that order being stable.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryEntityStore;
pub use sqlite::SqliteEntityStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use conrod_catalog::ConrodDefinition;
use conrod_core::{BillId, ConrodId, CustomerId, ProductId, ProductionId};
use conrod_invoicing::Bill;
use conrod_parties::Customer;
use conrod_production::ProductionRecord;
use conrod_products::Product;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed (connection, IO, lock poisoning, ...).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored row could not be decoded.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable records for every ledger entity.
///
/// `update_*` overwrites the whole row and `delete_*` removes it; both report
/// whether the row existed.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>>;
    async fn insert_product(&self, product: &Product) -> StoreResult<()>;
    async fn update_product(&self, product: &Product) -> StoreResult<bool>;
    async fn delete_product(&self, id: ProductId) -> StoreResult<bool>;

    async fn list_conrods(&self) -> StoreResult<Vec<ConrodDefinition>>;
    async fn get_conrod(&self, id: ConrodId) -> StoreResult<Option<ConrodDefinition>>;
    /// Live catalog entry currently holding `sr_no`, if any.
    async fn conrod_with_serial(&self, sr_no: u32) -> StoreResult<Option<ConrodDefinition>>;
    /// Highest serial ever issued, including serials of deleted entries.
    async fn serial_high_water(&self) -> StoreResult<Option<u32>>;
    /// Inserts the entry and records its serial as issued. Fails with
    /// `Conflict` when the serial has been issued before.
    async fn insert_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<()>;
    async fn update_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<bool>;
    async fn delete_conrod(&self, id: ConrodId) -> StoreResult<bool>;

    async fn list_production(&self) -> StoreResult<Vec<ProductionRecord>>;
    async fn get_production(&self, id: ProductionId) -> StoreResult<Option<ProductionRecord>>;
    async fn insert_production(&self, record: &ProductionRecord) -> StoreResult<()>;
    async fn update_production(&self, record: &ProductionRecord) -> StoreResult<bool>;
    async fn delete_production(&self, id: ProductionId) -> StoreResult<bool>;

    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()>;
    async fn delete_customer(&self, id: CustomerId) -> StoreResult<bool>;

    async fn list_bills(&self) -> StoreResult<Vec<Bill>>;
    async fn get_bill(&self, id: BillId) -> StoreResult<Option<Bill>>;
    async fn insert_bill(&self, bill: &Bill) -> StoreResult<()>;
    async fn delete_bill(&self, id: BillId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).get_product(id).await
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        (**self).insert_product(product).await
    }

    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        (**self).update_product(product).await
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        (**self).delete_product(id).await
    }

    async fn list_conrods(&self) -> StoreResult<Vec<ConrodDefinition>> {
        (**self).list_conrods().await
    }

    async fn get_conrod(&self, id: ConrodId) -> StoreResult<Option<ConrodDefinition>> {
        (**self).get_conrod(id).await
    }

    async fn conrod_with_serial(&self, sr_no: u32) -> StoreResult<Option<ConrodDefinition>> {
        (**self).conrod_with_serial(sr_no).await
    }

    async fn serial_high_water(&self) -> StoreResult<Option<u32>> {
        (**self).serial_high_water().await
    }

    async fn insert_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<()> {
        (**self).insert_conrod(conrod).await
    }

    async fn update_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<bool> {
        (**self).update_conrod(conrod).await
    }

    async fn delete_conrod(&self, id: ConrodId) -> StoreResult<bool> {
        (**self).delete_conrod(id).await
    }

    async fn list_production(&self) -> StoreResult<Vec<ProductionRecord>> {
        (**self).list_production().await
    }

    async fn get_production(&self, id: ProductionId) -> StoreResult<Option<ProductionRecord>> {
        (**self).get_production(id).await
    }

    async fn insert_production(&self, record: &ProductionRecord) -> StoreResult<()> {
        (**self).insert_production(record).await
    }

    async fn update_production(&self, record: &ProductionRecord) -> StoreResult<bool> {
        (**self).update_production(record).await
    }

    async fn delete_production(&self, id: ProductionId) -> StoreResult<bool> {
        (**self).delete_production(id).await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        (**self).list_customers().await
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        (**self).insert_customer(customer).await
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<bool> {
        (**self).delete_customer(id).await
    }

    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        (**self).list_bills().await
    }

    async fn get_bill(&self, id: BillId) -> StoreResult<Option<Bill>> {
        (**self).get_bill(id).await
    }

    async fn insert_bill(&self, bill: &Bill) -> StoreResult<()> {
        (**self).insert_bill(bill).await
    }

    async fn delete_bill(&self, id: BillId) -> StoreResult<bool> {
        (**self).delete_bill(id).await
    }
}
