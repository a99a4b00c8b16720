use tracing::info;

use conrod_core::CustomerId;
use conrod_parties::{Customer, NewCustomer};

use super::{read_through, InventoryLedger, LedgerError, LedgerResult};
use crate::cache::Collection;
use crate::store::EntityStore;

impl<S: EntityStore> InventoryLedger<S> {
    pub async fn list_customers(&self) -> LedgerResult<Vec<Customer>> {
        read_through(&self.cache.customers, || self.store.list_customers()).await
    }

    pub async fn create_customer(&self, draft: NewCustomer) -> LedgerResult<Customer> {
        draft.validate()?;
        let customer = draft.into_customer(CustomerId::new());
        self.store.insert_customer(&customer).await?;
        info!(customer_id = %customer.id, "customer created");
        self.cache.invalidate(&[Collection::Customers]);
        Ok(customer)
    }

    /// Bills pointing at the customer are left as they are.
    pub async fn delete_customer(&self, id: CustomerId) -> LedgerResult<CustomerId> {
        if !self.store.delete_customer(id).await? {
            return Err(LedgerError::NotFound("customer"));
        }
        info!(customer_id = %id, "customer deleted");
        self.cache.invalidate(&[Collection::Customers]);
        Ok(id)
    }
}
