//! Integration tests for loading and costing a catalog through the library API.
use float_cmp::assert_approx_eq;
use mixcost::catalog::Catalog;
use mixcost::cli::handle_labor_rate_command;
use mixcost::labor::GlobalSettings;
use mixcost::material::MaterialID;
use mixcost::recipe::RecipeID;
use mixcost::scaler::{ScaleTarget, scale_recipe};
use mixcost::summary::{margin_by_category, portfolio_summary};
use mixcost::units::{Dimensionless, Money, MoneyPerHour, MoneyPerQuantity, Quantity};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn get_catalog_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// Copy the demo catalog somewhere it can be modified
fn copy_catalog(dest: &Path) {
    fs::create_dir(dest).unwrap();
    for entry in fs::read_dir(get_catalog_dir()).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, dest.join(path.file_name().unwrap())).unwrap();
    }
}

#[test]
fn test_load_demo_catalog() {
    let catalog = Catalog::from_path(get_catalog_dir()).unwrap();
    assert_eq!(catalog.materials.len(), 12);
    assert_eq!(catalog.recipes.len(), 3);
    assert_eq!(catalog.products.len(), 5);
    assert_eq!(
        catalog.settings.labor_cost_per_hour,
        MoneyPerHour(5000.0)
    );

    // Ingredients without a display order come last
    let milanesa = &catalog.recipes[&RecipeID::new("milanesa_mix")];
    assert_eq!(
        milanesa.ingredients.last().unwrap().material_id,
        MaterialID::new("salt")
    );

    let unused: Vec<_> = catalog.iter_unused_materials().collect();
    assert_eq!(unused, [&MaterialID::new("label")]);
}

#[test]
fn test_demo_catalog_costs() {
    let catalog = Catalog::from_path(get_catalog_dir()).unwrap();

    let burger_mix = &catalog.recipes[&RecipeID::new("burger_mix")];
    let stats = catalog.recipe_stats(burger_mix);
    assert_approx_eq!(Quantity, stats.yield_kg, Quantity(20.0), epsilon = 1e-9);
    assert_approx_eq!(Money, stats.labor_cost, Money(40.0 * 5000.0 / 60.0), epsilon = 1e-9);

    let summary = portfolio_summary(&catalog, Some("BURGERS"));
    assert_eq!(summary.product_count, 2);
    assert_eq!(summary.low_margin_count, 0);

    let margins = margin_by_category(&catalog);
    let categories: Vec<_> = margins.iter().map(|m| m.category.as_str()).collect();
    assert_eq!(categories, ["BURGERS", "MILANESAS"]);
    assert_approx_eq!(
        Dimensionless,
        margins[0].avg_margin_pct,
        Dimensionless((100.0 * 0.35 / 1.35 + 100.0 * 0.3 / 1.3) / 2.0),
        epsilon = 1e-9
    );
}

#[test]
fn test_scale_demo_recipe() {
    let catalog = Catalog::from_path(get_catalog_dir()).unwrap();
    let recipe = &catalog.recipes[&RecipeID::new("burger_mix")];
    let product = &catalog.products["burger_160"];

    let order = scale_recipe(
        recipe,
        &catalog.materials,
        ScaleTarget::Units {
            count: Dimensionless(250.0),
            unit_weight: product.unit_weight,
        },
    );
    assert_approx_eq!(Quantity, order.target_kg, Quantity(40.0), epsilon = 1e-9);
    assert_approx_eq!(Dimensionless, order.scaling_factor, Dimensionless(2.0), epsilon = 1e-12);
    assert_approx_eq!(Quantity, order.ingredients[0].quantity, Quantity(24.0), epsilon = 1e-9);
    assert_approx_eq!(
        MoneyPerQuantity,
        order.cost_per_kg,
        catalog.recipe_stats(recipe).material_cost_per_kg,
        epsilon = 1e-6
    );
}

#[test]
fn test_labor_rate_command() {
    let dir = tempdir().unwrap();
    let catalog_dir = dir.path().join("simple");
    copy_catalog(&catalog_dir);

    handle_labor_rate_command(&catalog_dir, Some(6000.0)).unwrap();
    let settings = GlobalSettings::from_path(&catalog_dir).unwrap();
    assert_eq!(settings.labor_cost_per_hour, MoneyPerHour(6000.0));
    assert_eq!(settings.low_margin_pct, Dimensionless(20.0));

    // Negative rates are rejected and the file is left alone
    assert!(handle_labor_rate_command(&catalog_dir, Some(-1.0)).is_err());
    let settings = GlobalSettings::from_path(&catalog_dir).unwrap();
    assert_eq!(settings.labor_cost_per_hour, MoneyPerHour(6000.0));
}
