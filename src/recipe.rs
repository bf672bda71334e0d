//! Recipes describe batch "mixes" made from raw materials, along with the labor needed to make a
//! batch.
use crate::id::{define_id_getter, define_id_type};
use crate::labor::{GlobalSettings, labor_cost};
use crate::material::{MaterialCatalog, MaterialID};
use crate::units::{Dimensionless, Minutes, Money, MoneyPerQuantity, Quantity, div_or_zero};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

define_id_type! {RecipeID}

/// A map of [`Recipe`]s, keyed by recipe ID
pub type RecipeMap = IndexMap<RecipeID, Recipe>;

/// A batch mix of raw materials
#[derive(PartialEq, Debug, Clone)]
pub struct Recipe {
    /// A unique identifier for the recipe
    pub id: RecipeID,
    /// Display name
    pub name: String,
    /// Product category (e.g. "BURGERS")
    pub category: String,
    /// The ingredients of one batch, in display order
    pub ingredients: Vec<Ingredient>,
    /// Labor needed to mix one batch
    pub labor: BatchLaborParameters,
    /// Whether the recipe is currently in use
    pub active: bool,
}
define_id_getter! {Recipe, RecipeID}

impl Recipe {
    /// The mass produced by one batch.
    ///
    /// Mass is conserved, so this is the sum of the ingredient quantities. Ingredients whose
    /// material is not in `materials` are left out.
    pub fn yield_quantity<C>(&self, materials: &C) -> Quantity
    where
        C: MaterialCatalog + ?Sized,
    {
        self.ingredients
            .iter()
            .filter(|ing| materials.get_material(&ing.material_id).is_some())
            .map(|ing| ing.quantity)
            .sum()
    }

    /// Whether any ingredient uses the given material
    pub fn uses_material(&self, material_id: &MaterialID) -> bool {
        self.ingredients
            .iter()
            .any(|ing| ing.material_id == *material_id)
    }
}

/// A line in a recipe
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct Ingredient {
    /// The material used
    pub material_id: MaterialID,
    /// Quantity used per batch, in the material's costing unit
    pub quantity: Quantity,
    /// Position of this ingredient when displayed
    pub display_order: u32,
}

/// Labor parameters for mixing one batch
#[derive(PartialEq, Debug, Clone, Default)]
pub struct BatchLaborParameters {
    /// Total minutes taken to mix a batch (defaults to zero)
    pub minutes: Option<Minutes>,
    /// Number of operators working on the batch at once (defaults to one)
    pub operators: Option<Dimensionless>,
}

impl BatchLaborParameters {
    /// Fill in defaults for any missing parameters
    fn resolve(&self) -> (Minutes, Dimensionless) {
        (
            self.minutes.unwrap_or(Minutes(0.0)),
            self.operators.unwrap_or(Dimensionless(1.0)),
        )
    }

    /// Whether batch labor time has been provided
    pub fn has_minutes(&self) -> bool {
        self.minutes.is_some_and(|minutes| minutes > Minutes(0.0))
    }
}

/// Cost figures for one batch of a recipe
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RecipeStats {
    /// Mass produced by one batch
    pub yield_kg: Quantity,
    /// Cost of all materials in a batch
    pub material_cost: Money,
    /// Cost of labor to mix a batch
    pub labor_cost: Money,
    /// Material plus labor cost
    pub total_cost: Money,
    /// Material cost per kg of mix
    pub material_cost_per_kg: MoneyPerQuantity,
    /// Labor cost per kg of mix
    pub labor_cost_per_kg: MoneyPerQuantity,
    /// Total cost per kg of mix
    pub total_cost_per_kg: MoneyPerQuantity,
}

/// Calculate the cost of one batch of `recipe`.
///
/// Ingredients whose material cannot be found are skipped, adding nothing to either the yield or
/// the cost.
pub fn compute_recipe_stats<C>(
    recipe: &Recipe,
    materials: &C,
    settings: &GlobalSettings,
) -> RecipeStats
where
    C: MaterialCatalog + ?Sized,
{
    let (minutes, operators) = recipe.labor.resolve();

    let yield_kg = recipe.yield_quantity(materials);
    let material_cost = recipe
        .ingredients
        .iter()
        .map(|ing| {
            if materials.get_material(&ing.material_id).is_none() {
                debug!(
                    "Material {} used by recipe {} not found; skipping ingredient",
                    ing.material_id, recipe.id
                );
            }
            materials.unit_cost_of(&ing.material_id) * ing.quantity
        })
        .sum();
    let labor_cost = labor_cost(minutes, operators, settings);
    let total_cost = material_cost + labor_cost;

    RecipeStats {
        yield_kg,
        material_cost,
        labor_cost,
        total_cost,
        material_cost_per_kg: div_or_zero(material_cost, yield_kg),
        labor_cost_per_kg: div_or_zero(labor_cost, yield_kg),
        total_cost_per_kg: div_or_zero(total_cost, yield_kg),
    }
}
