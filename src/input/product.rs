//! Code for reading final products and their packaging from CSV files.
use super::*;
use crate::id::{IDCollection, define_id_getter};
use crate::labor::LaborStageParameters;
use crate::material::MaterialMap;
use crate::pricing::{PricingConfig, PricingMethod};
use crate::product::{FinalProduct, PackagingIngredient, ProductID, ProductMap};
use crate::recipe::RecipeMap;
use crate::units::{Dimensionless, Minutes, Money, Quantity, QuantityPerHour};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const PRODUCTS_FILE_NAME: &str = "products.csv";
const PRODUCT_PACKAGING_FILE_NAME: &str = "product_packaging.csv";

/// A product as it appears in the input file
#[derive(PartialEq, Debug, Deserialize)]
struct ProductRaw {
    id: ProductID,
    name: String,
    category: String,
    recipe_id: String,
    unit_weight: Quantity,
    units_per_package: Dimensionless,
    package_type: String,
    extra_packaging_cost: Option<Money>,
    pricing_method: Option<PricingMethod>,
    markup: Option<Dimensionless>,
    vat_pct: Option<Dimensionless>,
    manual_net_price: Option<Money>,
    use_manual_price: Option<bool>,
    active: Option<bool>,
    forming_rate: Option<QuantityPerHour>,
    forming_operators: Option<Dimensionless>,
    forming_fixed_minutes: Option<Minutes>,
    forming_batch_size: Option<Quantity>,
    packing_rate: Option<QuantityPerHour>,
    packing_operators: Option<Dimensionless>,
    packing_fixed_minutes: Option<Minutes>,
    packing_batch_size: Option<Quantity>,
}
define_id_getter! {ProductRaw, ProductID}

impl ProductRaw {
    fn validate(&self) -> Result<()> {
        check_non_negative(self.unit_weight, "unit_weight")?;
        check_non_negative(self.units_per_package, "units_per_package")?;
        check_optional_non_negative(self.extra_packaging_cost, "extra_packaging_cost")?;
        check_optional_non_negative(self.markup, "markup")?;
        check_optional_non_negative(self.vat_pct, "vat_pct")?;
        check_optional_non_negative(self.manual_net_price, "manual_net_price")?;

        check_optional_non_negative(self.forming_rate, "forming_rate")?;
        check_optional_positive(self.forming_operators, "forming_operators")?;
        check_optional_non_negative(self.forming_fixed_minutes, "forming_fixed_minutes")?;
        check_optional_non_negative(self.forming_batch_size, "forming_batch_size")?;
        check_optional_non_negative(self.packing_rate, "packing_rate")?;
        check_optional_positive(self.packing_operators, "packing_operators")?;
        check_optional_non_negative(self.packing_fixed_minutes, "packing_fixed_minutes")?;
        check_optional_non_negative(self.packing_batch_size, "packing_batch_size")?;

        ensure!(
            !self.use_manual_price.unwrap_or(false) || self.manual_net_price.is_some(),
            "use_manual_price is set but no manual_net_price was given"
        );

        Ok(())
    }
}

/// A packaging line as it appears in the input file
#[derive(PartialEq, Debug, Deserialize)]
struct PackagingRaw {
    product_id: String,
    material_id: String,
    quantity: Quantity,
}

/// Read final products and their packaging from CSV files.
///
/// The packaging file is optional.
///
/// # Arguments
///
/// * `catalog_dir` - Folder containing catalog files
/// * `materials` - Materials already read in
/// * `recipes` - Recipes already read in
///
/// # Returns
///
/// A map of products, keyed by ID, or an error
pub fn read_products(
    catalog_dir: &Path,
    materials: &MaterialMap,
    recipes: &RecipeMap,
) -> Result<ProductMap> {
    let file_path = catalog_dir.join(PRODUCTS_FILE_NAME);
    let raw_products = read_csv_id_file(&file_path)?;
    let mut products =
        read_products_from_map(raw_products, recipes).with_context(|| input_err_msg(&file_path))?;

    let file_path = catalog_dir.join(PRODUCT_PACKAGING_FILE_NAME);
    let packaging_csv = read_csv_optional(&file_path)?;
    let mut packaging = read_packaging_from_iter(packaging_csv, &products, materials)
        .with_context(|| input_err_msg(&file_path))?;

    for (id, product) in products.iter_mut() {
        if let Some(lines) = packaging.remove(id) {
            product.packaging = lines;
        }
    }

    Ok(products)
}

/// Convert raw products into [`FinalProduct`]s, without packaging
fn read_products_from_map(
    raw_products: IndexMap<ProductID, ProductRaw>,
    recipes: &RecipeMap,
) -> Result<ProductMap> {
    let mut products = ProductMap::with_capacity(raw_products.len());
    for (id, raw) in raw_products {
        raw.validate()
            .with_context(|| format!("Invalid product {id}"))?;
        let recipe_id = recipes
            .get_id_by_str(&raw.recipe_id)
            .with_context(|| format!("Invalid recipe for product {id}"))?;

        let product = FinalProduct {
            id: id.clone(),
            name: raw.name,
            category: raw.category,
            recipe_id,
            unit_weight: raw.unit_weight,
            units_per_package: raw.units_per_package,
            package_type: raw.package_type,
            packaging: Vec::new(),
            extra_packaging_cost: raw.extra_packaging_cost.unwrap_or(Money(0.0)),
            forming: LaborStageParameters {
                throughput: raw.forming_rate,
                operators: raw.forming_operators,
                fixed_minutes: raw.forming_fixed_minutes,
                batch_size: raw.forming_batch_size,
            },
            packing: LaborStageParameters {
                throughput: raw.packing_rate,
                operators: raw.packing_operators,
                fixed_minutes: raw.packing_fixed_minutes,
                batch_size: raw.packing_batch_size,
            },
            pricing: PricingConfig {
                method: raw.pricing_method.unwrap_or_default(),
                markup: raw.markup,
                vat_pct: raw.vat_pct,
                manual_net_price: raw.manual_net_price,
                use_manual_price: raw.use_manual_price.unwrap_or(false),
            },
            active: raw.active.unwrap_or(true),
        };
        products.insert(id, product);
    }

    Ok(products)
}

/// Read packaging lines from an iterator, grouped by product in file order
fn read_packaging_from_iter<I>(
    iter: I,
    products: &ProductMap,
    materials: &MaterialMap,
) -> Result<HashMap<ProductID, Vec<PackagingIngredient>>>
where
    I: Iterator<Item = PackagingRaw>,
{
    let mut map: HashMap<ProductID, Vec<PackagingIngredient>> = HashMap::new();
    for raw in iter {
        let product_id = products.get_id_by_str(&raw.product_id)?;
        let material_id = materials.get_id_by_str(&raw.material_id)?;
        check_non_negative(raw.quantity, "quantity").with_context(|| {
            format!("Invalid packaging {material_id} for product {product_id}")
        })?;

        map.entry(product_id).or_default().push(PackagingIngredient {
            material_id,
            quantity: raw.quantity,
        });
    }

    Ok(map)
}
