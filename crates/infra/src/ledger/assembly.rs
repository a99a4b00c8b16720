use tracing::{info, warn};

use conrod_core::{ConrodId, ProductId, ProductionId};
use conrod_production::{normalize_size, AssemblyPlan, NewProduction, ProductionRecord};

use super::{read_through, InventoryLedger, LedgerError, LedgerResult};
use crate::cache::Collection;
use crate::store::{EntityStore, StoreResult};

impl<S: EntityStore> InventoryLedger<S> {
    pub async fn list_production(&self) -> LedgerResult<Vec<ProductionRecord>> {
        read_through(&self.cache.production, || self.store.list_production()).await
    }

    /// Read-only availability check for `quantity` units of a conrod type.
    pub async fn plan_assembly(&self, conrod_id: ConrodId, quantity: i64) -> LedgerResult<AssemblyPlan> {
        if quantity <= 0 {
            return Err(LedgerError::Validation("quantity must be positive".to_string()));
        }

        let definition = self
            .store
            .get_conrod(conrod_id)
            .await?
            .ok_or(LedgerError::NotFound("conrod definition"))?;
        let products = self.store.list_products().await?;

        Ok(AssemblyPlan::evaluate(&definition, &products, quantity))
    }

    /// Record a batch and consume its components.
    ///
    /// Nothing is mutated unless both components resolve with enough stock.
    /// Once the record is inserted, a failed deduction is reported as
    /// `Incomplete` and the record stays.
    pub async fn assemble_production(&self, draft: NewProduction) -> LedgerResult<ProductionRecord> {
        draft.validate()?;

        let plan = self.plan_assembly(draft.conrod_id, draft.quantity).await?;
        let (pin, ball_bearing) = match plan.require_components() {
            Ok((pin, ball_bearing)) => (pin.id, ball_bearing.id),
            Err(shortfall) => {
                warn!(conrod_id = %plan.conrod_id, %shortfall, "assembly rejected");
                return Err(shortfall.into());
            }
        };
        let finished_goods = plan.finished_goods.as_ref().map(|p| p.id);

        let quantity = draft.quantity;
        let record = draft.into_record(ProductionId::new());
        self.store.insert_production(&record).await?;
        info!(
            production_id = %record.id,
            conrod_id = %record.conrod_id,
            quantity,
            "production record created"
        );

        let consumed = self
            .consume_components(
                [
                    ("pin deduction", Some(pin)),
                    ("ball bearing deduction", Some(ball_bearing)),
                    ("finished conrod deduction", finished_goods),
                ],
                quantity,
            )
            .await;
        self.cache
            .invalidate(&[Collection::Production, Collection::Products]);
        consumed?;

        Ok(record)
    }

    /// Deduct each product in turn. Each step waits for the previous one and
    /// re-reads the row it deducts from.
    async fn consume_components(
        &self,
        steps: [(&'static str, Option<ProductId>); 3],
        quantity: i64,
    ) -> LedgerResult<()> {
        for (step, product_id) in steps {
            let Some(product_id) = product_id else {
                continue;
            };
            match self.deduct_product(product_id, quantity).await {
                Ok(Some(product)) => {
                    info!(product_id = %product_id, quantity = product.quantity, step, "component stock deducted");
                }
                Ok(None) => {
                    warn!(product_id = %product_id, step, "component row vanished; deduction skipped");
                }
                Err(source) => return Err(LedgerError::incomplete(step, source)),
            }
        }
        Ok(())
    }

    /// Overwrite quantity (and size, when given). No floor is applied here;
    /// callers clamp.
    pub async fn update_production(
        &self,
        id: ProductionId,
        quantity: i64,
        size: Option<String>,
    ) -> LedgerResult<ProductionRecord> {
        let mut record = self
            .store
            .get_production(id)
            .await?
            .ok_or(LedgerError::NotFound("production record"))?;
        record.quantity = quantity;
        if size.is_some() {
            record.size = normalize_size(size);
        }
        if !self.store.update_production(&record).await? {
            return Err(LedgerError::NotFound("production record"));
        }

        info!(production_id = %id, quantity, "production record updated");
        self.cache.invalidate(&[Collection::Production]);
        Ok(record)
    }

    /// Remove a batch. Consumed component stock is not given back.
    pub async fn delete_production(&self, id: ProductionId) -> LedgerResult<ProductionId> {
        if !self.store.delete_production(id).await? {
            return Err(LedgerError::NotFound("production record"));
        }
        info!(production_id = %id, "production record deleted");
        self.cache
            .invalidate(&[Collection::Production, Collection::Products]);
        Ok(id)
    }

    pub(crate) async fn set_production_quantity(
        &self,
        id: ProductionId,
        quantity: impl FnOnce(&ProductionRecord) -> i64,
    ) -> StoreResult<Option<ProductionRecord>> {
        let Some(mut record) = self.store.get_production(id).await? else {
            return Ok(None);
        };
        record.quantity = quantity(&record);
        if !self.store.update_production(&record).await? {
            return Ok(None);
        }
        Ok(Some(record))
    }
}
