//! Scaling a recipe up or down to produce a production order for a target amount of mix.
use crate::material::{MaterialCatalog, MaterialID};
use crate::recipe::{Recipe, RecipeID};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity, div_or_zero};

/// How much mix to produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleTarget {
    /// A mass of mix, in kg
    Kilograms(Quantity),
    /// Enough mix for a number of sale units
    Units {
        /// The number of units
        count: Dimensionless,
        /// Mass of mix in one unit
        unit_weight: Quantity,
    },
}

impl ScaleTarget {
    /// The mass of mix needed to meet this target
    pub fn target_kg(&self) -> Quantity {
        match *self {
            Self::Kilograms(kg) => kg,
            Self::Units { count, unit_weight } => unit_weight * count,
        }
    }
}

/// One ingredient line of a production order
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIngredient<'a> {
    /// The material used
    pub material_id: &'a MaterialID,
    /// The material's name, or `None` if it is not in the catalog
    pub material_name: Option<&'a str>,
    /// Quantity needed, in the material's costing unit
    pub quantity: Quantity,
    /// Material cost of this line (zero if the material is missing)
    pub cost: Money,
}

/// A recipe scaled to a target amount of mix.
///
/// Only material costs are included.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionOrder<'a> {
    /// The recipe which was scaled
    pub recipe_id: &'a RecipeID,
    /// The mass of mix to produce
    pub target_kg: Quantity,
    /// Multiplier applied to every ingredient quantity
    pub scaling_factor: Dimensionless,
    /// Scaled ingredients, in recipe order
    pub ingredients: Vec<ScaledIngredient<'a>>,
    /// Sum of the ingredient costs
    pub total_cost: Money,
    /// Material cost per kg of mix produced
    pub cost_per_kg: MoneyPerQuantity,
}

/// Scale `recipe` so that it produces the given target amount of mix.
///
/// The scaling factor is relative to the recipe's yield, which leaves out ingredients whose
/// material is missing. A recipe with zero yield cannot be scaled, so every quantity will be
/// zero.
pub fn scale_recipe<'a, C>(
    recipe: &'a Recipe,
    materials: &'a C,
    target: ScaleTarget,
) -> ProductionOrder<'a>
where
    C: MaterialCatalog + ?Sized,
{
    let target_kg = target.target_kg();
    let scaling_factor = div_or_zero(target_kg, recipe.yield_quantity(materials));

    let ingredients: Vec<_> = recipe
        .ingredients
        .iter()
        .map(|ing| {
            let material = materials.get_material(&ing.material_id);
            let quantity = ing.quantity * scaling_factor;
            ScaledIngredient {
                material_id: &ing.material_id,
                material_name: material.map(|material| material.name.as_str()),
                quantity,
                cost: material.map_or(Money(0.0), |material| material.unit_cost() * quantity),
            }
        })
        .collect();
    let total_cost = ingredients.iter().map(|ing| ing.cost).sum();

    ProductionOrder {
        recipe_id: &recipe.id,
        target_kg,
        scaling_factor,
        ingredients,
        total_cost,
        cost_per_kg: div_or_zero(total_cost, target_kg),
    }
}
