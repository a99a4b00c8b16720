//! Test fixtures and a fault-injecting store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use conrod_catalog::{ConrodDefinition, ConrodDimensions, NewConrod};
use conrod_core::{BillId, ConrodId, CustomerId, ProductId, ProductionId};
use conrod_invoicing::Bill;
use conrod_parties::Customer;
use conrod_production::ProductionRecord;
use conrod_products::{NewProduct, Product, ProductDimensions, ProductType};

use crate::ledger::InventoryLedger;
use crate::store::{EntityStore, InMemoryEntityStore, StoreError, StoreResult};

pub fn ledger() -> InventoryLedger<InMemoryEntityStore> {
    InventoryLedger::new(InMemoryEntityStore::new())
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

pub fn new_product(name: &str, product_type: &str, quantity: i64) -> NewProduct {
    NewProduct {
        product_name: name.to_string(),
        product_type: ProductType::classify(product_type),
        dimensions: ProductDimensions::default(),
        quantity,
        date: date(),
    }
}

pub fn new_conrod(name: &str, pin: &str, ball_bearing: &str) -> NewConrod {
    NewConrod {
        name: name.to_string(),
        dimensions: ConrodDimensions::default(),
        pin: pin.to_string(),
        ball_bearing: ball_bearing.to_string(),
    }
}

/// Store statements that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    UpdateProduct,
    UpdateProduction,
}

/// In-memory store that fails selected statements on demand.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: InMemoryEntityStore,
    failing: Mutex<HashSet<Fault>>,
    conflict_next_conrod: AtomicBool,
}

impl FaultyStore {
    pub fn fail(&self, fault: Fault) {
        self.failing.lock().unwrap().insert(fault);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Make the next conrod insert lose a serial race, as if another writer
    /// took the serial between the check and the insert.
    pub fn conflict_next_conrod_insert(&self) {
        self.conflict_next_conrod.store(true, Ordering::SeqCst);
    }

    fn check(&self, fault: Fault) -> StoreResult<()> {
        if self.failing.lock().unwrap().contains(&fault) {
            return Err(StoreError::Backend(format!("injected fault: {fault:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for FaultyStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.inner.get_product(id).await
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        self.inner.insert_product(product).await
    }

    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        self.check(Fault::UpdateProduct)?;
        self.inner.update_product(product).await
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        self.inner.delete_product(id).await
    }

    async fn list_conrods(&self) -> StoreResult<Vec<ConrodDefinition>> {
        self.inner.list_conrods().await
    }

    async fn get_conrod(&self, id: ConrodId) -> StoreResult<Option<ConrodDefinition>> {
        self.inner.get_conrod(id).await
    }

    async fn conrod_with_serial(&self, sr_no: u32) -> StoreResult<Option<ConrodDefinition>> {
        self.inner.conrod_with_serial(sr_no).await
    }

    async fn serial_high_water(&self) -> StoreResult<Option<u32>> {
        self.inner.serial_high_water().await
    }

    async fn insert_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<()> {
        if self.conflict_next_conrod.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Conflict(format!(
                "serial number {} already issued",
                conrod.sr_no
            )));
        }
        self.inner.insert_conrod(conrod).await
    }

    async fn update_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<bool> {
        self.inner.update_conrod(conrod).await
    }

    async fn delete_conrod(&self, id: ConrodId) -> StoreResult<bool> {
        self.inner.delete_conrod(id).await
    }

    async fn list_production(&self) -> StoreResult<Vec<ProductionRecord>> {
        self.inner.list_production().await
    }

    async fn get_production(&self, id: ProductionId) -> StoreResult<Option<ProductionRecord>> {
        self.inner.get_production(id).await
    }

    async fn insert_production(&self, record: &ProductionRecord) -> StoreResult<()> {
        self.inner.insert_production(record).await
    }

    async fn update_production(&self, record: &ProductionRecord) -> StoreResult<bool> {
        self.check(Fault::UpdateProduction)?;
        self.inner.update_production(record).await
    }

    async fn delete_production(&self, id: ProductionId) -> StoreResult<bool> {
        self.inner.delete_production(id).await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        self.inner.list_customers().await
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.inner.insert_customer(customer).await
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<bool> {
        self.inner.delete_customer(id).await
    }

    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.inner.list_bills().await
    }

    async fn get_bill(&self, id: BillId) -> StoreResult<Option<Bill>> {
        self.inner.get_bill(id).await
    }

    async fn insert_bill(&self, bill: &Bill) -> StoreResult<()> {
        self.inner.insert_bill(bill).await
    }

    async fn delete_bill(&self, id: BillId) -> StoreResult<bool> {
        self.inner.delete_bill(id).await
    }
}
