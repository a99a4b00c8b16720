use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use conrod_core::{require_text, DomainError, DomainResult, Entity, ProductId, ValueObject};

/// Classified kind of a stock row.
///
/// Product types arrive as free text ("Ball Bearing", "pin", " Pin ", ...).
/// They are classified by substring so that every spelling lands on one of
/// the three kinds the ledger reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    BallBearing,
    Pin,
    Conrod,
}

impl ProductType {
    /// Anything containing "ball" is a ball bearing, anything containing "pin"
    /// is a pin, everything else is a conrod.
    pub fn classify(raw: &str) -> Self {
        let normalized = raw.to_lowercase();
        if normalized.contains("ball") {
            ProductType::BallBearing
        } else if normalized.contains("pin") {
            ProductType::Pin
        } else {
            ProductType::Conrod
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::BallBearing => "Ball Bearing",
            ProductType::Pin => "Pin",
            ProductType::Conrod => "Conrod",
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProductType {
    fn from(value: String) -> Self {
        Self::classify(&value)
    }
}

impl From<ProductType> for String {
    fn from(value: ProductType) -> Self {
        value.as_str().to_string()
    }
}

/// Type-dependent measurements (mm). Which fields are set depends on the
/// product type: pins and bearings use diameter/height, conrod blanks use the
/// end diameters and centre distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_end_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_end_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_distance: Option<f64>,
}

impl ValueObject for ProductDimensions {}

/// A stock-keeping unit of raw material or finished goods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub product_type: ProductType,
    pub dimensions: ProductDimensions,
    pub quantity: i64,
    pub date: NaiveDate,
}

impl Product {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.product_name)
    }

    /// Same logical stock row: equal normalized name and equal classified type.
    pub fn is_same_stock(&self, name: &str, product_type: ProductType) -> bool {
        self.product_type == product_type && self.normalized_name() == normalize_name(name)
    }

    /// Quantity left after consuming `quantity` units, never below zero.
    pub fn quantity_after_deduction(&self, quantity: i64) -> i64 {
        deduct_floored(self.quantity, quantity)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Draft for a new stock row (explicit add or CSV intake).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub dimensions: ProductDimensions,
    pub quantity: i64,
    pub date: NaiveDate,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("productName", &self.product_name)?;
        if self.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(())
    }

    /// Materialize the draft as a stored row. The name is trimmed; the
    /// original casing is kept for display.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            product_name: self.product_name.trim().to_string(),
            product_type: self.product_type,
            dimensions: self.dimensions,
            quantity: self.quantity,
            date: self.date,
        }
    }
}

/// Trim + lowercase; the join key used for names everywhere in the ledger.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `max(0, current - quantity)`.
pub fn deduct_floored(current: i64, quantity: i64) -> i64 {
    current.saturating_sub(quantity).max(0)
}

/// Existing row that a new draft would duplicate, if any (first in store order).
pub fn find_duplicate<'a>(products: &'a [Product], draft: &NewProduct) -> Option<&'a Product> {
    products
        .iter()
        .find(|p| p.is_same_stock(&draft.product_name, draft.product_type))
}
