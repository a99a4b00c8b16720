use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use conrod_core::{ConrodId, DomainError, DomainResult, Entity, ProductionId};
use conrod_products::deduct_floored;

/// One batch of assembled conrods.
///
/// `quantity` is the number of units still available for billing, not the
/// number ever produced: bills deduct from it and bill deletion gives back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: ProductionId,
    /// May dangle once the definition is deleted.
    pub conrod_id: ConrodId,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
    pub date: NaiveDate,
}

impl ProductionRecord {
    /// Remaining quantity after billing `quantity` units, floored at zero.
    pub fn quantity_after_billing(&self, quantity: i64) -> i64 {
        deduct_floored(self.quantity, quantity)
    }

    /// Remaining quantity after a bill for `quantity` units is reversed.
    pub fn quantity_after_reversal(&self, quantity: i64) -> i64 {
        self.quantity.saturating_add(quantity)
    }
}

impl Entity for ProductionRecord {
    type Id = ProductionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Request to assemble a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduction {
    pub conrod_id: ConrodId,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
    pub date: NaiveDate,
}

impl NewProduction {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(())
    }

    pub fn into_record(self, id: ProductionId) -> ProductionRecord {
        ProductionRecord {
            id,
            conrod_id: self.conrod_id,
            quantity: self.quantity,
            size: normalize_size(self.size),
            date: self.date,
        }
    }
}

/// Blank sizes are stored as absent.
pub fn normalize_size(size: Option<String>) -> Option<String> {
    size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quantity: i64, size: Option<&str>) -> NewProduction {
        NewProduction {
            conrod_id: ConrodId::new(),
            quantity,
            size: size.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        }
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(request(0, None).validate().is_err());
        assert!(request(-3, None).validate().is_err());
        assert!(request(1, None).validate().is_ok());
    }

    #[test]
    fn blank_size_is_dropped() {
        let record = request(4, Some("  ")).into_record(ProductionId::new());
        assert_eq!(record.size, None);

        let record = request(4, Some(" STD ")).into_record(ProductionId::new());
        assert_eq!(record.size.as_deref(), Some("STD"));
    }

    #[test]
    fn billing_then_reversal_restores_quantity() {
        let record = request(4, None).into_record(ProductionId::new());
        let billed = ProductionRecord {
            quantity: record.quantity_after_billing(3),
            ..record.clone()
        };
        assert_eq!(billed.quantity, 1);
        assert_eq!(billed.quantity_after_reversal(3), 4);
    }

    #[test]
    fn over_billing_floors_at_zero() {
        let record = request(2, None).into_record(ProductionId::new());
        assert_eq!(record.quantity_after_billing(5), 0);
    }
}
