//! Final products are sellable packages of formed mix. This module rolls recipe, labor and
//! packaging costs up to unit and package level, then prices the result.
use crate::id::{define_id_getter, define_id_type};
use crate::labor::{GlobalSettings, LaborStageParameters};
use crate::material::{MaterialCatalog, MaterialID};
use crate::pricing::{PricingConfig, PricingStats, compute_pricing};
use crate::recipe::{Recipe, RecipeID, compute_recipe_stats};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity, div_or_zero};
use indexmap::IndexMap;
use serde::Serialize;

define_id_type! {ProductID}

/// A map of [`FinalProduct`]s, keyed by product ID
pub type ProductMap = IndexMap<ProductID, FinalProduct>;

/// A single package, the output unit of the packing stage
const ONE_PACKAGE: Quantity = Quantity(1.0);

/// A sellable product made from one recipe
#[derive(PartialEq, Debug, Clone)]
pub struct FinalProduct {
    /// A unique identifier for the product
    pub id: ProductID,
    /// Display name
    pub name: String,
    /// Product category
    pub category: String,
    /// The recipe providing the mix
    pub recipe_id: RecipeID,
    /// Mass of mix in one sale unit
    pub unit_weight: Quantity,
    /// Number of sale units in one package
    pub units_per_package: Dimensionless,
    /// Type of package (e.g. "TRAY", "BAG")
    pub package_type: String,
    /// Packaging materials consumed per package
    pub packaging: Vec<PackagingIngredient>,
    /// Additional packaging cost per package not covered by `packaging`
    pub extra_packaging_cost: Money,
    /// Labor for shaping mix into units (output unit: kg of mix)
    pub forming: LaborStageParameters,
    /// Labor for assembling units into packages (output unit: packages)
    pub packing: LaborStageParameters,
    /// How the product is priced
    pub pricing: PricingConfig,
    /// Whether the product is currently sold
    pub active: bool,
}
define_id_getter! {FinalProduct, ProductID}

impl FinalProduct {
    /// Whether any packaging line uses the given material
    pub fn uses_material(&self, material_id: &MaterialID) -> bool {
        self.packaging
            .iter()
            .any(|item| item.material_id == *material_id)
    }
}

/// A line in a product's packaging bill of materials
#[derive(PartialEq, Debug, Clone)]
pub struct PackagingIngredient {
    /// The packaging material used
    pub material_id: MaterialID,
    /// Quantity consumed per package
    pub quantity: Quantity,
}

/// The per-kg costs of the product's base recipe
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RecipeBaseCosts {
    /// Total recipe cost per kg of mix
    pub recipe_cost_per_kg: MoneyPerQuantity,
    /// Recipe material cost per kg of mix
    pub recipe_material_cost_per_kg: MoneyPerQuantity,
    /// Recipe batch labor cost per kg of mix
    pub recipe_labor_cost_per_kg: MoneyPerQuantity,
}

/// Costs for one sale unit.
///
/// Packaging materials are not included, as they are consumed per package.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct UnitCosts {
    /// Cost of the mix materials in one unit
    pub unit_material_cost: Money,
    /// Batch mixing labor for one unit
    pub unit_mix_labor_cost: Money,
    /// Forming labor for one unit
    pub unit_forming_labor_cost: Money,
    /// Packing labor attributed to one unit
    pub unit_packing_labor_cost: Money,
    /// Sum of the three labor costs
    pub unit_labor_cost: Money,
    /// Material plus labor cost
    pub unit_total_cost: Money,
}

/// Costs for one package
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct PackageCosts {
    /// Mass of mix in one package
    #[serde(rename = "package_weight")]
    pub weight: Quantity,
    /// Cost of mix materials in one package
    #[serde(rename = "package_material_cost")]
    pub material_cost: Money,
    /// Cost of all labor in one package
    #[serde(rename = "package_labor_cost")]
    pub labor_cost: Money,
    /// Cost of packaging materials, including the extra packaging cost
    #[serde(rename = "package_packaging_cost")]
    pub packaging_cost: Money,
    /// Total cost of one package
    #[serde(rename = "package_total_cost")]
    pub total_cost: Money,
    /// Total cost per kg of mix in the package
    #[serde(rename = "cost_per_equivalent_kg")]
    pub cost_per_kg: MoneyPerQuantity,
}

/// A full cost and pricing breakdown for a product
#[derive(PartialEq, Debug, Clone)]
pub struct ProductStats {
    /// Per-kg figures for the base recipe
    pub base: RecipeBaseCosts,
    /// Costs for one unit
    pub unit: UnitCosts,
    /// Costs for one package
    pub package: PackageCosts,
    /// Prices and margin
    pub pricing: PricingStats,
}

/// Calculate the cost of packaging materials for one package, including the extra cost
pub fn packaging_cost<C>(product: &FinalProduct, materials: &C) -> Money
where
    C: MaterialCatalog + ?Sized,
{
    let materials_cost: Money = product
        .packaging
        .iter()
        .map(|item| materials.unit_cost_of(&item.material_id) * item.quantity)
        .sum();
    materials_cost + product.extra_packaging_cost
}

/// Calculate the full cost breakdown and pricing for `product`.
///
/// The caller is responsible for passing the product's own base recipe.
pub fn compute_product_stats<C>(
    product: &FinalProduct,
    recipe: &Recipe,
    materials: &C,
    settings: &GlobalSettings,
) -> ProductStats
where
    C: MaterialCatalog + ?Sized,
{
    let recipe_stats = compute_recipe_stats(recipe, materials, settings);
    let cost_per_minute = settings.labor_cost_per_minute();
    let units_per_package = product.units_per_package;

    // Forming throughput is in kg of mix, so scale by unit weight
    let forming = product.forming.resolve();
    let unit_forming_labor_cost = forming.cost_per_unit(cost_per_minute) * product.unit_weight;

    // Packing throughput is in packages, so share between the units in a package
    let packing = product.packing.resolve();
    let package_packing_labor_cost = packing.cost_per_unit(cost_per_minute) * ONE_PACKAGE;
    let unit_packing_labor_cost = div_or_zero(package_packing_labor_cost, units_per_package);

    let unit_material_cost = recipe_stats.material_cost_per_kg * product.unit_weight;
    let unit_mix_labor_cost = recipe_stats.labor_cost_per_kg * product.unit_weight;
    let unit_labor_cost = unit_mix_labor_cost + unit_forming_labor_cost + unit_packing_labor_cost;
    let unit = UnitCosts {
        unit_material_cost,
        unit_mix_labor_cost,
        unit_forming_labor_cost,
        unit_packing_labor_cost,
        unit_labor_cost,
        unit_total_cost: unit_material_cost + unit_labor_cost,
    };

    let weight = product.unit_weight * units_per_package;
    let material_cost = unit_material_cost * units_per_package;
    let labor_cost = unit_labor_cost * units_per_package;
    let packaging_cost = packaging_cost(product, materials);
    let total_cost = material_cost + labor_cost + packaging_cost;
    let package = PackageCosts {
        weight,
        material_cost,
        labor_cost,
        packaging_cost,
        total_cost,
        cost_per_kg: div_or_zero(total_cost, weight),
    };

    let pricing = compute_pricing(&package, &product.pricing);

    ProductStats {
        base: RecipeBaseCosts {
            recipe_cost_per_kg: recipe_stats.total_cost_per_kg,
            recipe_material_cost_per_kg: recipe_stats.material_cost_per_kg,
            recipe_labor_cost_per_kg: recipe_stats.labor_cost_per_kg,
        },
        unit,
        package,
        pricing,
    }
}
