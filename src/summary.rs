//! Catalog-wide summaries: portfolio margins, labor costs and data health.
use crate::catalog::Catalog;
use crate::product::FinalProduct;
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity, div_or_zero};
use indexmap::IndexMap;
use serde::Serialize;
use serde_string_enum::SerializeLabeledStringEnum;

/// Total package costs across a set of products, by component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostStructure {
    /// Mix material cost
    pub material: Money,
    /// Labor cost for all stages
    pub labor: Money,
    /// Packaging material cost
    pub packaging: Money,
}

/// Headline figures for a set of active products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    /// Number of products considered, including those whose recipe is missing
    pub product_count: usize,
    /// Average cost per equivalent kg, weighted by package weight
    pub avg_cost_per_kg: MoneyPerQuantity,
    /// Simple average of product margins (%)
    pub avg_margin_pct: Dimensionless,
    /// Number of products whose margin is below the low-margin threshold
    pub low_margin_count: usize,
    /// Summed package costs
    pub cost_structure: CostStructure,
}

/// The average margin of the active products in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMargin {
    /// Product category
    pub category: String,
    /// Simple average margin (%) across the category's active products
    pub avg_margin_pct: Dimensionless,
}

/// How serious an alert is
#[derive(Debug, Clone, Copy, PartialEq, SerializeLabeledStringEnum)]
pub enum AlertLevel {
    /// Needs immediate attention
    #[string = "critical"]
    Critical,
    /// Worth checking
    #[string = "warning"]
    Warning,
}

/// A problem found when reviewing the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Severity
    pub level: AlertLevel,
    /// What the alert is about (a product name, or the catalog as a whole)
    pub subject: String,
    /// Description of the problem
    pub message: String,
}

/// Counts of incomplete catalog entries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataHealth {
    /// Recipes with no batch labor time
    pub recipes_without_labor: usize,
    /// Materials with no purchase price
    pub materials_without_price: usize,
    /// Products with no packaging lines
    pub products_without_packaging: usize,
}

/// Average labor costs for each stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaborSummary {
    /// Average batch mixing labor cost per kg across all recipes
    pub avg_mix_labor_cost_per_kg: MoneyPerQuantity,
    /// Average forming labor cost per unit across all products
    pub avg_unit_forming_labor_cost: Money,
    /// Average packing labor cost per unit across all products
    pub avg_unit_packing_labor_cost: Money,
}

/// Average of `total` over `count` items, or zero if there are none
fn mean<T>(total: T, count: usize) -> T
where
    T: std::ops::Div<Dimensionless, Output = T> + crate::units::UnitType,
{
    div_or_zero(total, Dimensionless(count as f64))
}

/// Iterate over active products, optionally restricted to one category
fn iter_active_products<'a>(
    catalog: &'a Catalog,
    category: Option<&'a str>,
) -> impl Iterator<Item = &'a FinalProduct> {
    catalog
        .products
        .values()
        .filter(move |product| product.active)
        .filter(move |product| category.is_none_or(|category| product.category == category))
}

/// Summarise the active products in the catalog, optionally restricted to one category
pub fn portfolio_summary(catalog: &Catalog, category: Option<&str>) -> PortfolioSummary {
    let low_margin_pct = catalog.settings.low_margin_pct;

    let mut product_count = 0;
    let mut total_weight = Quantity(0.0);
    let mut total_cost = Money(0.0);
    let mut total_margin = Dimensionless(0.0);
    let mut low_margin_count = 0;
    let mut cost_structure = CostStructure::default();
    for product in iter_active_products(catalog, category) {
        product_count += 1;
        let Some(stats) = catalog.product_stats(product) else {
            continue;
        };

        total_weight += stats.package.weight;
        total_cost += stats.package.cost_per_kg * stats.package.weight;
        total_margin += stats.pricing.margin_pct;
        cost_structure.material += stats.package.material_cost;
        cost_structure.labor += stats.package.labor_cost;
        cost_structure.packaging += stats.package.packaging_cost;
        if stats.pricing.margin_pct < low_margin_pct {
            low_margin_count += 1;
        }
    }

    PortfolioSummary {
        product_count,
        avg_cost_per_kg: div_or_zero(total_cost, total_weight),
        avg_margin_pct: mean(total_margin, product_count),
        low_margin_count,
        cost_structure,
    }
}

/// Average margin for each category with active products, in order of first appearance
pub fn margin_by_category(catalog: &Catalog) -> Vec<CategoryMargin> {
    let mut categories: IndexMap<&str, (Dimensionless, usize)> = IndexMap::new();
    for product in iter_active_products(catalog, None) {
        let (total, count) = categories
            .entry(product.category.as_str())
            .or_insert((Dimensionless(0.0), 0));
        *count += 1;
        if let Some(stats) = catalog.product_stats(product) {
            *total += stats.pricing.margin_pct;
        }
    }

    categories
        .into_iter()
        .map(|(category, (total, count))| CategoryMargin {
            category: category.to_string(),
            avg_margin_pct: mean(total, count),
        })
        .collect()
}

/// Find problems which need attention.
///
/// A critical alert is raised for each active product (optionally restricted to one category)
/// whose margin is below the critical threshold, and a warning if any materials are unpriced.
pub fn margin_alerts(catalog: &Catalog, category: Option<&str>) -> Vec<Alert> {
    let critical_margin_pct = catalog.settings.critical_margin_pct;
    let mut alerts: Vec<_> = iter_active_products(catalog, category)
        .filter_map(|product| {
            let margin_pct = catalog.product_stats(product)?.pricing.margin_pct;
            (margin_pct < critical_margin_pct).then(|| Alert {
                level: AlertLevel::Critical,
                subject: product.name.clone(),
                message: format!("Critical margin ({:.1}%)", margin_pct.value()),
            })
        })
        .collect();

    let materials_without_price = data_health(catalog).materials_without_price;
    if materials_without_price > 0 {
        alerts.push(Alert {
            level: AlertLevel::Warning,
            subject: "Materials".into(),
            message: format!("{materials_without_price} materials have no price"),
        });
    }

    alerts
}

/// Count incomplete entries across the whole catalog
pub fn data_health(catalog: &Catalog) -> DataHealth {
    DataHealth {
        recipes_without_labor: catalog
            .recipes
            .values()
            .filter(|recipe| !recipe.labor.has_minutes())
            .count(),
        materials_without_price: catalog
            .materials
            .values()
            .filter(|material| !material.is_priced())
            .count(),
        products_without_packaging: catalog
            .products
            .values()
            .filter(|product| product.packaging.is_empty())
            .count(),
    }
}

/// Average labor costs across every recipe and every product whose recipe exists
pub fn labor_summary(catalog: &Catalog) -> LaborSummary {
    let (mix_total, recipe_count) = catalog
        .iter_recipe_stats()
        .fold((MoneyPerQuantity(0.0), 0), |(total, count), (_, stats)| {
            (total + stats.labor_cost_per_kg, count + 1)
        });

    let (forming_total, packing_total, product_count) = catalog.iter_product_stats().fold(
        (Money(0.0), Money(0.0), 0),
        |(forming, packing, count), (_, stats)| {
            (
                forming + stats.unit.unit_forming_labor_cost,
                packing + stats.unit.unit_packing_labor_cost,
                count + 1,
            )
        },
    );

    LaborSummary {
        avg_mix_labor_cost_per_kg: mean(mix_total, recipe_count),
        avg_unit_forming_labor_cost: mean(forming_total, product_count),
        avg_unit_packing_labor_cost: mean(packing_total, product_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{catalog, product};
    use crate::material::RawMaterial;
    use crate::pricing::PricingConfig;
    use crate::product::ProductID;
    use crate::recipe::BatchLaborParameters;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    /// Add a copy of the fixture product with a different ID, category and markup
    fn add_product(catalog: &mut Catalog, id: &str, category: &str, markup: f64) {
        let product = FinalProduct {
            id: ProductID::new(id),
            category: category.into(),
            pricing: PricingConfig {
                markup: Some(Dimensionless(markup)),
                ..product().pricing
            },
            ..product()
        };
        catalog.products.insert(product.id.clone(), product);
    }

    /// Margin (%) for a product priced with the given markup
    fn margin_for(markup: f64) -> f64 {
        (markup - 1.0) / markup * 100.0
    }

    #[rstest]
    fn test_portfolio_summary(catalog: Catalog) {
        let mut catalog = catalog;
        add_product(&mut catalog, "cheap", "BURGERS", 1.1);
        add_product(&mut catalog, "sausage", "SAUSAGES", 2.0);

        let summary = portfolio_summary(&catalog, None);
        assert_eq!(summary.product_count, 3);
        assert_approx_eq!(
            Dimensionless,
            summary.avg_margin_pct,
            Dimensionless((margin_for(1.35) + margin_for(1.1) + margin_for(2.0)) / 3.0),
            epsilon = 1e-9
        );
        // 1.35 gives a margin of ~25.9%, 1.1 gives ~9.1%
        assert_eq!(summary.low_margin_count, 1);

        // All products are identical apart from pricing
        let stats = catalog.product_stats(&catalog.products["burger_160"]).unwrap();
        assert_approx_eq!(
            MoneyPerQuantity,
            summary.avg_cost_per_kg,
            stats.package.cost_per_kg,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            summary.cost_structure.packaging,
            stats.package.packaging_cost * Dimensionless(3.0),
            epsilon = 1e-6
        );

        let burgers = portfolio_summary(&catalog, Some("BURGERS"));
        assert_eq!(burgers.product_count, 2);
    }

    #[rstest]
    fn test_portfolio_summary_inactive_and_missing(catalog: Catalog) {
        let mut catalog = catalog;
        add_product(&mut catalog, "old", "BURGERS", 1.1);
        catalog.products["old"].active = false;
        add_product(&mut catalog, "orphan", "BURGERS", 1.1);
        catalog.products["orphan"].recipe_id = "missing".into();

        let summary = portfolio_summary(&catalog, None);

        // The orphan is counted but contributes nothing
        assert_eq!(summary.product_count, 2);
        assert_approx_eq!(
            Dimensionless,
            summary.avg_margin_pct,
            Dimensionless(margin_for(1.35) / 2.0),
            epsilon = 1e-9
        );
        assert_eq!(summary.low_margin_count, 0);
    }

    #[rstest]
    fn test_portfolio_summary_empty(catalog: Catalog) {
        let summary = portfolio_summary(&catalog, Some("PIZZA"));
        assert_eq!(summary.product_count, 0);
        assert_eq!(summary.avg_cost_per_kg, MoneyPerQuantity(0.0));
        assert_eq!(summary.avg_margin_pct, Dimensionless(0.0));
        assert_eq!(summary.cost_structure, CostStructure::default());
    }

    #[rstest]
    fn test_margin_by_category(catalog: Catalog) {
        let mut catalog = catalog;
        add_product(&mut catalog, "sausage", "SAUSAGES", 2.0);
        add_product(&mut catalog, "chorizo", "SAUSAGES", 1.5);

        let margins = margin_by_category(&catalog);
        assert_eq!(margins.len(), 2);
        assert_eq!(margins[0].category, "BURGERS");
        assert_eq!(margins[1].category, "SAUSAGES");
        assert_approx_eq!(
            Dimensionless,
            margins[1].avg_margin_pct,
            Dimensionless((margin_for(2.0) + margin_for(1.5)) / 2.0),
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_margin_alerts(catalog: Catalog) {
        let mut catalog = catalog;
        assert!(margin_alerts(&catalog, None).is_empty());

        add_product(&mut catalog, "cheap", "BURGERS", 1.1);
        let unpriced = RawMaterial {
            id: "salt".into(),
            purchase_price: Money(0.0),
            ..catalog.materials["meat"].clone()
        };
        catalog.materials.insert(unpriced.id.clone(), unpriced);

        let alerts = margin_alerts(&catalog, None);
        assert_eq!(
            alerts,
            [
                Alert {
                    level: AlertLevel::Critical,
                    subject: "Burger 160g".into(),
                    message: "Critical margin (9.1%)".into(),
                },
                Alert {
                    level: AlertLevel::Warning,
                    subject: "Materials".into(),
                    message: "1 materials have no price".into(),
                }
            ]
        );

        // Only the warning applies to other categories
        assert_eq!(margin_alerts(&catalog, Some("SAUSAGES")).len(), 1);
    }

    #[rstest]
    fn test_data_health(catalog: Catalog) {
        let mut catalog = catalog;
        assert_eq!(data_health(&catalog), DataHealth::default());

        catalog.recipes["burger_mix"].labor = BatchLaborParameters {
            minutes: Some(crate::units::Minutes(0.0)),
            operators: None,
        };
        catalog.materials["bag"].purchase_price = Money(0.0);
        catalog.products["burger_160"].packaging.clear();
        assert_eq!(
            data_health(&catalog),
            DataHealth {
                recipes_without_labor: 1,
                materials_without_price: 1,
                products_without_packaging: 1,
            }
        );
    }

    #[rstest]
    fn test_labor_summary(catalog: Catalog) {
        let mut catalog = catalog;
        add_product(&mut catalog, "orphan", "BURGERS", 1.1);
        catalog.products["orphan"].recipe_id = "missing".into();

        let summary = labor_summary(&catalog);
        let stats = catalog.product_stats(&catalog.products["burger_160"]).unwrap();
        assert_approx_eq!(
            MoneyPerQuantity,
            summary.avg_mix_labor_cost_per_kg,
            MoneyPerQuantity(1250.0 / 16.2),
            epsilon = 1e-9
        );

        // The orphan is not included
        assert_eq!(
            summary.avg_unit_forming_labor_cost,
            stats.unit.unit_forming_labor_cost
        );
        assert_eq!(
            summary.avg_unit_packing_labor_cost,
            stats.unit.unit_packing_labor_cost
        );
    }

    #[test]
    fn test_labor_summary_empty() {
        let mut catalog = catalog();
        catalog.recipes.clear();
        let summary = labor_summary(&catalog);
        assert_eq!(summary.avg_mix_labor_cost_per_kg, MoneyPerQuantity(0.0));
        assert_eq!(summary.avg_unit_forming_labor_cost, Money(0.0));
        assert_eq!(summary.avg_unit_packing_labor_cost, Money(0.0));
    }
}
