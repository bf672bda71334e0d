//! Raw materials are the purchasable inputs from which recipes and packaging are costed.
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity, div_or_zero};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {MaterialID}

/// A map of [`RawMaterial`]s, keyed by material ID
pub type MaterialMap = IndexMap<MaterialID, RawMaterial>;

/// A purchasable input, priced per purchase unit (e.g. a 25 kg bag)
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct RawMaterial {
    /// A unique identifier for the material
    pub id: MaterialID,
    /// Purchase category (e.g. "ADDITIVES", "PACKAGING")
    pub category: String,
    /// Display name
    pub name: String,
    /// The unit in which the material is bought (e.g. "BAG")
    pub purchase_unit: String,
    /// How many costing units one purchase unit contains
    pub quantity_per_purchase_unit: Quantity,
    /// Raw input consumed per costing unit of usable output.
    ///
    /// This scales cost upwards, so a value of 1.02 means 2% of the input is lost as waste.
    pub waste_factor: Dimensionless,
    /// When the price was last updated
    pub last_priced: Option<NaiveDate>,
    /// Price of one purchase unit
    pub purchase_price: Money,
    /// The unit used for costing (e.g. "KG", "UN", "LT")
    pub costing_unit: String,
}
define_id_getter! {RawMaterial, MaterialID}

impl RawMaterial {
    /// The cost of one costing unit of this material, including waste.
    ///
    /// Zero if the material has no quantity per purchase unit.
    pub fn unit_cost(&self) -> MoneyPerQuantity {
        let base: MoneyPerQuantity =
            div_or_zero(self.purchase_price, self.quantity_per_purchase_unit);
        base * self.waste_factor
    }

    /// Whether this material has been given a price
    pub fn is_priced(&self) -> bool {
        self.purchase_price > Money(0.0)
    }
}

/// Get the cost per costing unit of `material`
pub fn normalize_material_cost(material: &RawMaterial) -> MoneyPerQuantity {
    material.unit_cost()
}

/// Lookup of materials by ID.
///
/// A missing material is not an error: callers treat it as contributing no cost.
pub trait MaterialCatalog {
    /// Get the material with the given ID, if present
    fn get_material(&self, id: &MaterialID) -> Option<&RawMaterial>;

    /// The cost per costing unit of the given material, or zero if it is missing
    fn unit_cost_of(&self, id: &MaterialID) -> MoneyPerQuantity {
        self.get_material(id)
            .map_or(MoneyPerQuantity(0.0), RawMaterial::unit_cost)
    }
}

impl MaterialCatalog for MaterialMap {
    fn get_material(&self, id: &MaterialID) -> Option<&RawMaterial> {
        self.get(id)
    }
}

impl MaterialCatalog for [RawMaterial] {
    fn get_material(&self, id: &MaterialID) -> Option<&RawMaterial> {
        self.iter().find(|material| material.id == *id)
    }
}
