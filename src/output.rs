//! The module responsible for writing output data to disk.
use crate::catalog::Catalog;
use crate::material::{MaterialCatalog, MaterialID};
use crate::pricing::PricingMethod;
use crate::product::{FinalProduct, ProductID};
use crate::recipe::{Recipe, RecipeID};
use crate::summary::{
    Alert, CategoryMargin, DataHealth, LaborSummary, PortfolioSummary, data_health,
    labor_summary, margin_alerts, margin_by_category, portfolio_summary,
};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which catalog-specific output folders will be created
pub const OUTPUT_DIRECTORY_ROOT: &str = "mixcost_results";

/// The output file name for recipe costs
const RECIPE_COSTS_FILE_NAME: &str = "recipe_costs.csv";

/// The output file name for product costs and prices
const PRODUCT_COSTS_FILE_NAME: &str = "product_costs.csv";

/// The output file name for average margins by category
const CATEGORY_MARGINS_FILE_NAME: &str = "category_margins.csv";

/// The output file name for the catalog summary
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// The output file name for per-ingredient costs
const INGREDIENT_COSTS_FILE_NAME: &str = "debug_ingredient_costs.csv";

/// Get the default output directory for the catalog at the specified path
pub fn get_output_dir(catalog_dir: &Path) -> Result<PathBuf> {
    // Get the catalog name from the dir path. This ends up being convoluted because we need to
    // check for all possible errors. Ugh.
    let catalog_dir = catalog_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to catalog")?;

    let catalog_name = catalog_dir
        .file_name()
        .context("Catalog cannot be in root folder")?
        .to_str()
        .context("Invalid chars in catalog dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, catalog_name].iter().collect())
}

/// Create a new output directory, if it does not already exist.
///
/// An existing non-empty directory is only reused if `allow_overwrite` is set.
///
/// # Returns
///
/// Whether existing output files will be overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = output_dir.read_dir()?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace its \
            contents or choose a different folder."
        );
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Identifies a recipe in output files
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RecipeRow {
    recipe_id: RecipeID,
    name: String,
    category: String,
    active: bool,
}

impl RecipeRow {
    fn new(recipe: &Recipe) -> Self {
        Self {
            recipe_id: recipe.id.clone(),
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            active: recipe.active,
        }
    }
}

/// Identifies a product in output files
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ProductRow {
    product_id: ProductID,
    name: String,
    category: String,
    recipe_id: RecipeID,
    active: bool,
    pricing_method: PricingMethod,
    unit_weight: Quantity,
    units_per_package: Dimensionless,
    package_type: String,
}

impl ProductRow {
    fn new(product: &FinalProduct) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            recipe_id: product.recipe_id.clone(),
            active: product.active,
            pricing_method: product.pricing.method,
            unit_weight: product.unit_weight,
            units_per_package: product.units_per_package,
            package_type: product.package_type.clone(),
        }
    }
}

/// The cost of one ingredient line in a recipe
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct IngredientCostRow {
    recipe_id: RecipeID,
    material_id: MaterialID,
    quantity: Quantity,
    unit_cost: MoneyPerQuantity,
    cost: Money,
}

/// The contents of the summary file
#[derive(Serialize, Debug)]
pub struct Summary {
    /// Figures for all active products
    pub portfolio: PortfolioSummary,
    /// Average labor costs
    pub labor: LaborSummary,
    /// Incomplete catalog entries
    pub data_health: DataHealth,
    /// Problems needing attention
    pub alerts: Vec<Alert>,
}

impl Summary {
    /// Summarise the whole catalog
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            portfolio: portfolio_summary(catalog, None),
            labor: labor_summary(catalog),
            data_health: data_health(catalog),
            alerts: margin_alerts(catalog, None),
        }
    }
}

/// An object for writing catalog results to CSV files
pub struct DataWriter {
    recipes_writer: csv::Writer<File>,
    products_writer: csv::Writer<File>,
    categories_writer: csv::Writer<File>,
    ingredients_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging the catalog
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let ingredients_writer = if save_debug_info {
            Some(new_writer(INGREDIENT_COSTS_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            recipes_writer: new_writer(RECIPE_COSTS_FILE_NAME)?,
            products_writer: new_writer(PRODUCT_COSTS_FILE_NAME)?,
            categories_writer: new_writer(CATEGORY_MARGINS_FILE_NAME)?,
            ingredients_writer,
        })
    }

    /// Write cost figures for every recipe
    pub fn write_recipes(&mut self, catalog: &Catalog) -> Result<()> {
        for (recipe, stats) in catalog.iter_recipe_stats() {
            self.recipes_writer
                .serialize((RecipeRow::new(recipe), stats))?;
        }

        if let Some(wtr) = &mut self.ingredients_writer {
            for recipe in catalog.recipes.values() {
                for ing in recipe.ingredients.iter() {
                    let unit_cost = catalog.materials.unit_cost_of(&ing.material_id);
                    wtr.serialize(IngredientCostRow {
                        recipe_id: recipe.id.clone(),
                        material_id: ing.material_id.clone(),
                        quantity: ing.quantity,
                        unit_cost,
                        cost: unit_cost * ing.quantity,
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Write cost and pricing figures for every product whose recipe exists
    pub fn write_products(&mut self, catalog: &Catalog) -> Result<()> {
        for (product, stats) in catalog.iter_product_stats() {
            self.products_writer.serialize((
                ProductRow::new(product),
                stats.base,
                stats.unit,
                stats.package,
                stats.pricing,
            ))?;
        }

        Ok(())
    }

    /// Write average margins by category
    pub fn write_category_margins(&mut self, margins: &[CategoryMargin]) -> Result<()> {
        for margin in margins {
            self.categories_writer.serialize(margin)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.recipes_writer.flush()?;
        self.products_writer.flush()?;
        self.categories_writer.flush()?;
        if let Some(wtr) = &mut self.ingredients_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Write the catalog summary to the specified output path in TOML format
pub fn write_summary(output_path: &Path, summary: &Summary) -> Result<()> {
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&file_path, toml::to_string(summary)?)?;

    Ok(())
}

/// Calculate costs for the whole catalog and write all results to `output_path`
pub fn write_results(catalog: &Catalog, output_path: &Path, save_debug_info: bool) -> Result<()> {
    let mut writer = DataWriter::create(output_path, save_debug_info)?;
    writer.write_recipes(catalog)?;
    writer.write_products(catalog)?;
    writer.write_category_margins(&margin_by_category(catalog))?;
    writer.flush()?;

    write_summary(output_path, &Summary::new(catalog))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{catalog, product, recipe};
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();

        // New directory
        let output_dir = dir.path().join("results");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing empty directory
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Existing non-empty directory
        {
            let mut file = File::create(output_dir.join("file.txt")).unwrap();
            writeln!(file, "contents").unwrap();
        }
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let catalog_dir = dir.path().join("my_catalog");
        fs::create_dir(&catalog_dir).unwrap();
        assert_eq!(
            get_output_dir(&catalog_dir).unwrap(),
            PathBuf::from("mixcost_results/my_catalog")
        );

        // Missing directory
        assert!(get_output_dir(&dir.path().join("missing")).is_err());
    }

    #[rstest]
    fn test_write_recipes(catalog: Catalog) {
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), true).unwrap();
            writer.write_recipes(&catalog).unwrap();
            writer.flush().unwrap();
        }

        let records: Vec<RecipeRow> =
            csv::Reader::from_path(dir.path().join(RECIPE_COSTS_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(records, [RecipeRow::new(&recipe())]);

        let rows: Vec<IngredientCostRow> =
            csv::Reader::from_path(dir.path().join(INGREDIENT_COSTS_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].material_id, MaterialID::new("meat"));
        assert_approx_eq!(Money, rows[0].cost, Money(170_100.0), epsilon = 1e-6);
    }

    #[rstest]
    fn test_write_products(catalog: Catalog) {
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer.write_products(&catalog).unwrap();
            writer.flush().unwrap();
        }

        // No debug files without debug output
        assert!(!dir.path().join(INGREDIENT_COSTS_FILE_NAME).exists());

        let mut reader = csv::Reader::from_path(dir.path().join(PRODUCT_COSTS_FILE_NAME)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "product_id");
        assert!(headers.iter().contains(&"package_total_cost"));
        assert!(headers.iter().contains(&"margin_pct"));

        let records: Vec<ProductRow> = reader.deserialize().try_collect().unwrap();
        assert_eq!(records, [ProductRow::new(&product())]);
    }

    #[rstest]
    fn test_write_results(catalog: Catalog) {
        let dir = tempdir().unwrap();
        write_results(&catalog, dir.path(), false).unwrap();

        let file_names = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .sorted()
            .collect_vec();
        assert_eq!(
            file_names,
            [
                CATEGORY_MARGINS_FILE_NAME,
                PRODUCT_COSTS_FILE_NAME,
                RECIPE_COSTS_FILE_NAME,
                SUMMARY_FILE_NAME
            ]
        );

        let summary: toml::Table =
            toml::from_str(&fs::read_to_string(dir.path().join(SUMMARY_FILE_NAME)).unwrap())
                .unwrap();
        assert_eq!(summary["portfolio"]["product_count"].as_integer(), Some(1));
        assert_eq!(
            summary["data_health"]["materials_without_price"].as_integer(),
            Some(0)
        );
    }
}
