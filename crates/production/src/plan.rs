//! Assembly availability check.
//!
//! `AssemblyPlan` is the read-only answer to "can we build N of this conrod
//! right now?". The production screen shows it before assembling, and the
//! ledger re-evaluates it as the precondition gate of every assembly.

use serde::Serialize;

use conrod_catalog::ConrodDefinition;
use conrod_core::ConrodId;
use conrod_products::Product;

use crate::resolver::{find_finished_conrod, resolve_component, ComponentRole};

/// Availability of one required component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCheck {
    pub role: ComponentRole,
    pub required_name: String,
    pub product: Option<Product>,
    pub available: i64,
    pub sufficient: bool,
}

impl ComponentCheck {
    fn evaluate(products: &[Product], required_name: &str, role: ComponentRole, quantity: i64) -> Self {
        let product = resolve_component(products, required_name, role).cloned();
        let available = product.as_ref().map_or(0, |p| p.quantity);
        Self {
            role,
            required_name: required_name.to_string(),
            sufficient: product.is_some() && available >= quantity,
            product,
            available,
        }
    }

    fn shortfall(&self, requested: i64) -> Option<Shortfall> {
        match &self.product {
            None => Some(Shortfall::Unavailable {
                role: self.role,
                name: self.required_name.clone(),
            }),
            Some(p) if p.quantity < requested => Some(Shortfall::Insufficient {
                role: self.role,
                name: p.product_name.clone(),
                available: p.quantity,
                requested,
            }),
            Some(_) => None,
        }
    }
}

/// Why a plan cannot be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortfall {
    Unavailable {
        role: ComponentRole,
        name: String,
    },
    Insufficient {
        role: ComponentRole,
        name: String,
        available: i64,
        requested: i64,
    },
}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Shortfall::Unavailable { role, name } => {
                write!(f, "no {role} product matches '{name}'")
            }
            Shortfall::Insufficient {
                role,
                name,
                available,
                requested,
            } => write!(
                f,
                "{role} '{name}' has {available} in stock, {requested} required (short by {})",
                requested - available
            ),
        }
    }
}

/// Component availability for assembling `quantity` units of one definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyPlan {
    pub conrod_id: ConrodId,
    pub conrod_name: String,
    pub quantity: i64,
    pub pin: ComponentCheck,
    pub ball_bearing: ComponentCheck,
    /// Same-named Conrod stock row, deducted opportunistically on assembly.
    pub finished_goods: Option<Product>,
}

impl AssemblyPlan {
    pub fn evaluate(definition: &ConrodDefinition, products: &[Product], quantity: i64) -> Self {
        Self {
            conrod_id: definition.id,
            conrod_name: definition.name.clone(),
            quantity,
            pin: ComponentCheck::evaluate(products, &definition.pin, ComponentRole::Pin, quantity),
            ball_bearing: ComponentCheck::evaluate(
                products,
                &definition.ball_bearing,
                ComponentRole::BallBearing,
                quantity,
            ),
            finished_goods: find_finished_conrod(products, &definition.name).cloned(),
        }
    }

    pub fn is_buildable(&self) -> bool {
        self.pin.sufficient && self.ball_bearing.sufficient
    }

    /// Resolved (pin, ball bearing) rows, or the first shortfall (pin checked first).
    pub fn require_components(&self) -> Result<(&Product, &Product), Shortfall> {
        if let Some(shortfall) = self.pin.shortfall(self.quantity) {
            return Err(shortfall);
        }
        if let Some(shortfall) = self.ball_bearing.shortfall(self.quantity) {
            return Err(shortfall);
        }
        match (&self.pin.product, &self.ball_bearing.product) {
            (Some(pin), Some(ball_bearing)) => Ok((pin, ball_bearing)),
            // Both checks above returned None, so both products are present.
            _ => Err(Shortfall::Unavailable {
                role: ComponentRole::Pin,
                name: self.pin.required_name.clone(),
            }),
        }
    }
}
