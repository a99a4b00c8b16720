use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use conrod_catalog::ConrodDefinition;
use conrod_core::{BillId, ConrodId, CustomerId, Entity, ProductId, ProductionId};
use conrod_invoicing::Bill;
use conrod_parties::Customer;
use conrod_production::ProductionRecord;
use conrod_products::Product;

use super::{EntityStore, StoreError, StoreResult};

/// In-memory entity store for tests/dev.
///
/// Each method takes one lock on one table, so single statements serialize
/// while multi-step ledger operations interleave freely.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    products: Table<Product>,
    conrods: Table<ConrodDefinition>,
    issued_serials: RwLock<BTreeSet<u32>>,
    production: Table<ProductionRecord>,
    customers: Table<Customer>,
    bills: Table<Bill>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Insertion-ordered rows keyed by entity id.
#[derive(Debug)]
struct Table<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<E: Entity + Clone> Table<E> {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<E>>> {
        self.rows.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<E>>> {
        self.rows.write().map_err(|_| poisoned())
    }

    fn list(&self) -> StoreResult<Vec<E>> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: &E::Id) -> StoreResult<Option<E>> {
        Ok(self.read()?.iter().find(|row| row.id() == id).cloned())
    }

    fn insert(&self, row: E) -> StoreResult<()> {
        let mut rows = self.write()?;
        if rows.iter().any(|existing| existing.id() == row.id()) {
            return Err(StoreError::Conflict(format!("duplicate id {}", row.id())));
        }
        rows.push(row);
        Ok(())
    }

    fn update(&self, row: E) -> StoreResult<bool> {
        let mut rows = self.write()?;
        match rows.iter_mut().find(|existing| existing.id() == row.id()) {
            Some(slot) => {
                *slot = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &E::Id) -> StoreResult<bool> {
        let mut rows = self.write()?;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() != before)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory table lock poisoned".to_string())
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.products.list()
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.products.get(&id)
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        self.products.insert(product.clone())
    }

    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        self.products.update(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        self.products.delete(&id)
    }

    async fn list_conrods(&self) -> StoreResult<Vec<ConrodDefinition>> {
        self.conrods.list()
    }

    async fn get_conrod(&self, id: ConrodId) -> StoreResult<Option<ConrodDefinition>> {
        self.conrods.get(&id)
    }

    async fn conrod_with_serial(&self, sr_no: u32) -> StoreResult<Option<ConrodDefinition>> {
        Ok(self
            .conrods
            .read()?
            .iter()
            .find(|c| c.sr_no == sr_no)
            .cloned())
    }

    async fn serial_high_water(&self) -> StoreResult<Option<u32>> {
        let issued = self.issued_serials.read().map_err(|_| poisoned())?;
        Ok(issued.last().copied())
    }

    async fn insert_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<()> {
        let mut issued = self.issued_serials.write().map_err(|_| poisoned())?;
        if issued.contains(&conrod.sr_no) {
            return Err(StoreError::Conflict(format!(
                "serial number {} already issued",
                conrod.sr_no
            )));
        }
        self.conrods.insert(conrod.clone())?;
        issued.insert(conrod.sr_no);
        Ok(())
    }

    async fn update_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<bool> {
        self.conrods.update(conrod.clone())
    }

    async fn delete_conrod(&self, id: ConrodId) -> StoreResult<bool> {
        self.conrods.delete(&id)
    }

    async fn list_production(&self) -> StoreResult<Vec<ProductionRecord>> {
        self.production.list()
    }

    async fn get_production(&self, id: ProductionId) -> StoreResult<Option<ProductionRecord>> {
        self.production.get(&id)
    }

    async fn insert_production(&self, record: &ProductionRecord) -> StoreResult<()> {
        self.production.insert(record.clone())
    }

    async fn update_production(&self, record: &ProductionRecord) -> StoreResult<bool> {
        self.production.update(record.clone())
    }

    async fn delete_production(&self, id: ProductionId) -> StoreResult<bool> {
        self.production.delete(&id)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        self.customers.list()
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.customers.insert(customer.clone())
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<bool> {
        self.customers.delete(&id)
    }

    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.bills.list()
    }

    async fn get_bill(&self, id: BillId) -> StoreResult<Option<Bill>> {
        self.bills.get(&id)
    }

    async fn insert_bill(&self, bill: &Bill) -> StoreResult<()> {
        self.bills.insert(bill.clone())
    }

    async fn delete_bill(&self, id: BillId) -> StoreResult<bool> {
        self.bills.delete(&id)
    }
}
