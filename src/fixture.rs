//! Fixtures for tests
use crate::catalog::Catalog;
use crate::labor::{GlobalSettings, LaborStageParameters};
use crate::material::{MaterialMap, RawMaterial};
use crate::pricing::{PricingConfig, PricingMethod};
use crate::product::{FinalProduct, PackagingIngredient, ProductMap};
use crate::recipe::{BatchLaborParameters, Ingredient, Recipe, RecipeMap};
use crate::units::{Dimensionless, Minutes, Money, MoneyPerHour, Quantity, QuantityPerHour};
use chrono::NaiveDate;
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn settings() -> GlobalSettings {
    GlobalSettings::new(MoneyPerHour(5000.0))
}

/// Meat bought by the kg at 10500
#[fixture]
pub fn material() -> RawMaterial {
    RawMaterial {
        id: "meat".into(),
        category: "MEAT".into(),
        name: "Ground beef".into(),
        purchase_unit: "KG".into(),
        quantity_per_purchase_unit: Quantity(1.0),
        waste_factor: Dimensionless(1.0),
        last_priced: NaiveDate::from_ymd_opt(2025, 1, 15),
        purchase_price: Money(10500.0),
        costing_unit: "KG".into(),
    }
}

/// Bags bought in packs of 100, costing 50 each
#[fixture]
pub fn packaging_material() -> RawMaterial {
    RawMaterial {
        id: "bag".into(),
        category: "PACKAGING".into(),
        name: "Vacuum bag".into(),
        purchase_unit: "PACK".into(),
        quantity_per_purchase_unit: Quantity(100.0),
        waste_factor: Dimensionless(1.0),
        last_priced: None,
        purchase_price: Money(5000.0),
        costing_unit: "UN".into(),
    }
}

#[fixture]
pub fn material_map() -> MaterialMap {
    let meat = material();
    let bag = packaging_material();
    indexmap! {
        meat.id.clone() => meat,
        bag.id.clone() => bag,
    }
}

/// 16.2 kg of meat mixed in 15 minutes by one operator
#[fixture]
pub fn recipe() -> Recipe {
    Recipe {
        id: "burger_mix".into(),
        name: "Burger mix".into(),
        category: "BURGERS".into(),
        ingredients: vec![Ingredient {
            material_id: "meat".into(),
            quantity: Quantity(16.2),
            display_order: 1,
        }],
        labor: BatchLaborParameters {
            minutes: Some(Minutes(15.0)),
            operators: Some(Dimensionless(1.0)),
        },
        active: true,
    }
}

#[fixture]
pub fn recipes() -> RecipeMap {
    let recipe = recipe();
    indexmap! { recipe.id.clone() => recipe }
}

fn labor_stage(
    throughput: f64,
    operators: f64,
    fixed_minutes: f64,
    batch_size: f64,
) -> LaborStageParameters {
    LaborStageParameters {
        throughput: Some(QuantityPerHour(throughput)),
        operators: Some(Dimensionless(operators)),
        fixed_minutes: Some(Minutes(fixed_minutes)),
        batch_size: Some(Quantity(batch_size)),
    }
}

/// A 160 g burger sold singly in a tray
#[fixture]
pub fn product() -> FinalProduct {
    FinalProduct {
        id: "burger_160".into(),
        name: "Burger 160g".into(),
        category: "BURGERS".into(),
        recipe_id: "burger_mix".into(),
        unit_weight: Quantity(0.16),
        units_per_package: Dimensionless(1.0),
        package_type: "TRAY".into(),
        packaging: vec![PackagingIngredient {
            material_id: "bag".into(),
            quantity: Quantity(2.0),
        }],
        extra_packaging_cost: Money(5.0),
        forming: labor_stage(60.0, 2.0, 15.0, 60.0),
        packing: labor_stage(120.0, 1.0, 10.0, 120.0),
        pricing: PricingConfig {
            method: PricingMethod::PerPackage,
            markup: Some(Dimensionless(1.35)),
            vat_pct: Some(Dimensionless(21.0)),
            manual_net_price: None,
            use_manual_price: false,
        },
        active: true,
    }
}

#[fixture]
pub fn products() -> ProductMap {
    let product = product();
    indexmap! { product.id.clone() => product }
}

#[fixture]
pub fn catalog() -> Catalog {
    Catalog {
        settings: settings(),
        materials: material_map(),
        recipes: recipes(),
        products: products(),
    }
}
