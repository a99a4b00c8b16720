//! Component resolver: joins a catalog recipe to stock rows by name.
//!
//! Matching is exact first, then fuzzy (substring containment in either
//! direction). Candidates are scanned in store order and the first hit wins;
//! there is no ranking, so results are reproducible for a given store.

use serde::{Deserialize, Serialize};

use conrod_products::{normalize_name, Product, ProductType};

/// Which slot of a recipe a component fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentRole {
    Pin,
    BallBearing,
}

impl ComponentRole {
    pub fn product_type(&self) -> ProductType {
        match self {
            ComponentRole::Pin => ProductType::Pin,
            ComponentRole::BallBearing => ProductType::BallBearing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentRole::Pin => "pin",
            ComponentRole::BallBearing => "ball bearing",
        }
    }
}

impl core::fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locate the stock row for `required_name` in the given role.
pub fn resolve_component<'a>(
    products: &'a [Product],
    required_name: &str,
    role: ComponentRole,
) -> Option<&'a Product> {
    let wanted = normalize_name(required_name);
    if wanted.is_empty() {
        return None;
    }

    let wanted_type = role.product_type();
    let candidates = || products.iter().filter(move |p| p.product_type == wanted_type);

    candidates()
        .find(|p| p.normalized_name() == wanted)
        .or_else(|| {
            candidates().find(|p| {
                let name = p.normalized_name();
                !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
            })
        })
}

/// Finished-goods row for a conrod type: a Conrod product whose name equals
/// the definition name, ignoring case.
pub fn find_finished_conrod<'a>(products: &'a [Product], conrod_name: &str) -> Option<&'a Product> {
    let wanted = conrod_name.to_lowercase();
    products
        .iter()
        .find(|p| p.product_type == ProductType::Conrod && p.product_name.to_lowercase() == wanted)
}
