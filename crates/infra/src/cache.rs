//! Read-through list cache.
//!
//! One slot per collection. `list*` ledger operations fill a slot on miss and
//! every mutation invalidates the collections it touches. A fill that raced a
//! mutation is dropped: each slot carries a generation that invalidation bumps,
//! and a fill only lands if the generation it started from is still current.

use std::sync::RwLock;

use conrod_catalog::ConrodDefinition;
use conrod_invoicing::Bill;
use conrod_parties::Customer;
use conrod_production::ProductionRecord;
use conrod_products::Product;

/// Cached collections, named for invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Products,
    Conrods,
    Production,
    Customers,
    Bills,
}

#[derive(Debug)]
pub struct CacheSlot<T> {
    enabled: bool,
    inner: RwLock<SlotState<T>>,
}

#[derive(Debug)]
struct SlotState<T> {
    generation: u64,
    rows: Option<Vec<T>>,
}

impl<T: Clone> CacheSlot<T> {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: RwLock::new(SlotState {
                generation: 0,
                rows: None,
            }),
        }
    }

    /// Cached rows, or the generation a fill should be tagged with.
    pub fn lookup(&self) -> Result<Vec<T>, u64> {
        match self.inner.read() {
            Ok(state) if self.enabled => match &state.rows {
                Some(rows) => Ok(rows.clone()),
                None => Err(state.generation),
            },
            Ok(state) => Err(state.generation),
            Err(_) => Err(u64::MAX),
        }
    }

    /// Store `rows` unless the slot was invalidated since `generation`.
    pub fn fill(&self, generation: u64, rows: &[T]) {
        if !self.enabled {
            return;
        }
        if let Ok(mut state) = self.inner.write() {
            if state.generation == generation {
                state.rows = Some(rows.to_vec());
            }
        }
    }

    pub fn invalidate(&self) {
        if let Ok(mut state) = self.inner.write() {
            state.generation = state.generation.wrapping_add(1);
            state.rows = None;
        }
    }
}

/// Per-collection cache for the ledger's list operations.
#[derive(Debug)]
pub struct ReadCache {
    pub products: CacheSlot<Product>,
    pub conrods: CacheSlot<ConrodDefinition>,
    pub production: CacheSlot<ProductionRecord>,
    pub customers: CacheSlot<Customer>,
    pub bills: CacheSlot<Bill>,
}

impl ReadCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            products: CacheSlot::new(enabled),
            conrods: CacheSlot::new(enabled),
            production: CacheSlot::new(enabled),
            customers: CacheSlot::new(enabled),
            bills: CacheSlot::new(enabled),
        }
    }

    pub fn invalidate(&self, collections: &[Collection]) {
        for collection in collections {
            match collection {
                Collection::Products => self.products.invalidate(),
                Collection::Conrods => self.conrods.invalidate(),
                Collection::Production => self.production.invalidate(),
                Collection::Customers => self.customers.invalidate(),
                Collection::Bills => self.bills.invalidate(),
            }
        }
    }
}

impl Default for ReadCache {
    fn default() -> Self {
        Self::new(true)
    }
}
