use serde::{Deserialize, Serialize};

use conrod_core::{require_text, ConrodId, DomainResult, Entity, ValueObject};

/// Conrod geometry (mm). Batch imports may leave a value unset when the
/// source cell was not a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConrodDimensions {
    pub small_end_diameter: Option<f64>,
    pub big_end_diameter: Option<f64>,
    pub center_distance: Option<f64>,
}

impl ValueObject for ConrodDimensions {}

/// Catalog entry describing how to assemble one conrod type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConrodDefinition {
    pub id: ConrodId,
    /// Unique, dense, never reused.
    pub sr_no: u32,
    pub name: String,
    pub dimensions: ConrodDimensions,
    /// Name of the required Pin product.
    pub pin: String,
    /// Name of the required Ball Bearing product.
    pub ball_bearing: String,
}

impl ConrodDefinition {
    /// Apply an edit. The serial number is never touched by edits.
    pub fn apply_edit(&mut self, edit: NewConrod) {
        self.name = edit.name.trim().to_string();
        self.dimensions = edit.dimensions;
        self.pin = edit.pin.trim().to_string();
        self.ball_bearing = edit.ball_bearing.trim().to_string();
    }
}

impl Entity for ConrodDefinition {
    type Id = ConrodId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Draft for creating or editing a catalog entry (no id, no serial).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConrod {
    pub name: String,
    #[serde(default)]
    pub dimensions: ConrodDimensions,
    pub pin: String,
    pub ball_bearing: String,
}

impl NewConrod {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("pin", &self.pin)?;
        require_text("ballBearing", &self.ball_bearing)?;
        Ok(())
    }

    pub fn into_definition(self, id: ConrodId, sr_no: u32) -> ConrodDefinition {
        let mut definition = ConrodDefinition {
            id,
            sr_no,
            name: String::new(),
            dimensions: ConrodDimensions::default(),
            pin: String::new(),
            ball_bearing: String::new(),
        };
        definition.apply_edit(self);
        definition
    }
}
