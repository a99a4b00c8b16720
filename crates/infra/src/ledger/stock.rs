use tracing::info;

use conrod_core::ProductId;
use conrod_products::{find_duplicate, NewProduct, Product};

use super::{read_through, InventoryLedger, LedgerError, LedgerResult};
use crate::cache::Collection;
use crate::store::{EntityStore, StoreResult};

/// Result of adding stock: a fresh row, or an existing row topped up.
#[derive(Debug, Clone, PartialEq)]
pub enum StockIntake {
    Created(Product),
    ToppedUp(Product),
}

impl StockIntake {
    pub fn product(&self) -> &Product {
        match self {
            StockIntake::Created(p) | StockIntake::ToppedUp(p) => p,
        }
    }

    pub fn into_product(self) -> Product {
        match self {
            StockIntake::Created(p) | StockIntake::ToppedUp(p) => p,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, StockIntake::Created(_))
    }
}

impl<S: EntityStore> InventoryLedger<S> {
    pub async fn list_products(&self) -> LedgerResult<Vec<Product>> {
        read_through(&self.cache.products, || self.store.list_products()).await
    }

    /// Add stock. A row with the same normalized name and type is topped up
    /// instead of duplicated.
    pub async fn create_product(&self, draft: NewProduct) -> LedgerResult<StockIntake> {
        draft.validate()?;

        let existing = self.store.list_products().await?;
        let intake = match find_duplicate(&existing, &draft) {
            Some(duplicate) => {
                let mut topped_up = duplicate.clone();
                topped_up.quantity = duplicate.quantity.saturating_add(draft.quantity);
                if !self.store.update_product(&topped_up).await? {
                    return Err(LedgerError::NotFound("product"));
                }
                info!(
                    product_id = %topped_up.id,
                    added = draft.quantity,
                    quantity = topped_up.quantity,
                    "product stock topped up"
                );
                StockIntake::ToppedUp(topped_up)
            }
            None => {
                let product = draft.into_product(ProductId::new());
                self.store.insert_product(&product).await?;
                info!(
                    product_id = %product.id,
                    product_type = %product.product_type,
                    quantity = product.quantity,
                    "product created"
                );
                StockIntake::Created(product)
            }
        };

        self.cache.invalidate(&[Collection::Products]);
        Ok(intake)
    }

    /// Overwrite a product's quantity.
    pub async fn update_product_quantity(&self, id: ProductId, quantity: i64) -> LedgerResult<Product> {
        if quantity < 0 {
            return Err(LedgerError::Validation("quantity cannot be negative".to_string()));
        }

        let mut product = self
            .store
            .get_product(id)
            .await?
            .ok_or(LedgerError::NotFound("product"))?;
        product.quantity = quantity;
        if !self.store.update_product(&product).await? {
            return Err(LedgerError::NotFound("product"));
        }

        info!(product_id = %id, quantity, "product quantity set");
        self.cache.invalidate(&[Collection::Products]);
        Ok(product)
    }

    /// Remove a product row. Deleting a missing row is not an error.
    pub async fn delete_product(&self, id: ProductId) -> LedgerResult<ProductId> {
        let removed = self.store.delete_product(id).await?;
        info!(product_id = %id, removed, "product deleted");
        self.cache.invalidate(&[Collection::Products]);
        Ok(id)
    }

    /// Floored deduction against the current row. `None` when the row is gone.
    pub(crate) async fn deduct_product(&self, id: ProductId, quantity: i64) -> StoreResult<Option<Product>> {
        let Some(mut product) = self.store.get_product(id).await? else {
            return Ok(None);
        };
        product.quantity = product.quantity_after_deduction(quantity);
        if !self.store.update_product(&product).await? {
            return Ok(None);
        }
        Ok(Some(product))
    }
}
