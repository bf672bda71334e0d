//! The catalog: a snapshot of every material, recipe and product, plus the catalog-wide settings.
use crate::input::load_catalog;
use crate::labor::GlobalSettings;
use crate::material::{MaterialID, MaterialMap};
use crate::product::{FinalProduct, ProductID, ProductMap, ProductStats, compute_product_stats};
use crate::recipe::{Recipe, RecipeID, RecipeMap, RecipeStats, compute_recipe_stats};
use anyhow::Result;
use log::debug;
use std::path::Path;

/// A complete catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Settings which apply to every calculation
    pub settings: GlobalSettings,
    /// Raw materials
    pub materials: MaterialMap,
    /// Batch recipes
    pub recipes: RecipeMap,
    /// Final products
    pub products: ProductMap,
}

/// The recipes and products which reference a given material
#[derive(Debug, Default, PartialEq)]
pub struct MaterialUsages<'a> {
    /// Recipes using the material as an ingredient
    pub recipes: Vec<&'a RecipeID>,
    /// Products using the material as packaging
    pub products: Vec<&'a ProductID>,
}

impl MaterialUsages<'_> {
    /// Whether the material is referenced anywhere
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty() && self.products.is_empty()
    }
}

impl Catalog {
    /// Read a catalog from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `catalog_dir` - Folder containing catalog files
    pub fn from_path<P: AsRef<Path>>(catalog_dir: P) -> Result<Catalog> {
        load_catalog(catalog_dir)
    }

    /// Calculate cost figures for one batch of the given recipe
    pub fn recipe_stats(&self, recipe: &Recipe) -> RecipeStats {
        compute_recipe_stats(recipe, &self.materials, &self.settings)
    }

    /// Calculate cost and pricing figures for the given product.
    ///
    /// Returns `None` if the product's recipe is not in the catalog.
    pub fn product_stats(&self, product: &FinalProduct) -> Option<ProductStats> {
        let Some(recipe) = self.recipes.get(&product.recipe_id) else {
            debug!(
                "Recipe {} for product {} not found; skipping",
                product.recipe_id, product.id
            );
            return None;
        };

        Some(compute_product_stats(
            product,
            recipe,
            &self.materials,
            &self.settings,
        ))
    }

    /// Iterate over every recipe along with its cost figures
    pub fn iter_recipe_stats(&self) -> impl Iterator<Item = (&Recipe, RecipeStats)> {
        self.recipes
            .values()
            .map(|recipe| (recipe, self.recipe_stats(recipe)))
    }

    /// Iterate over every product whose recipe exists, along with its cost and pricing figures
    pub fn iter_product_stats(&self) -> impl Iterator<Item = (&FinalProduct, ProductStats)> {
        self.products
            .values()
            .filter_map(|product| Some((product, self.product_stats(product)?)))
    }

    /// Find the recipes and products which reference the given material
    pub fn material_usages(&self, material_id: &MaterialID) -> MaterialUsages<'_> {
        MaterialUsages {
            recipes: self
                .recipes
                .values()
                .filter(|recipe| recipe.uses_material(material_id))
                .map(|recipe| &recipe.id)
                .collect(),
            products: self
                .products
                .values()
                .filter(|product| product.uses_material(material_id))
                .map(|product| &product.id)
                .collect(),
        }
    }

    /// Iterate over materials which are not referenced by any recipe or product
    pub fn iter_unused_materials(&self) -> impl Iterator<Item = &MaterialID> {
        self.materials
            .keys()
            .filter(|id| self.material_usages(id).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{catalog, material, recipe};
    use crate::material::RawMaterial;
    use crate::units::{Money, Quantity};
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    fn test_iter_recipe_stats(catalog: Catalog) {
        let stats = catalog.iter_recipe_stats().collect_vec();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0.id, RecipeID::new("burger_mix"));
        assert_approx_eq!(Quantity, stats[0].1.yield_kg, Quantity(16.2));
    }

    #[rstest]
    fn test_iter_product_stats_skips_missing_recipe(catalog: Catalog) {
        let mut catalog = catalog;
        assert_eq!(catalog.iter_product_stats().count(), 1);

        catalog.recipes.clear();
        assert_eq!(catalog.iter_product_stats().count(), 0);
        assert!(
            catalog
                .product_stats(&catalog.products["burger_160"])
                .is_none()
        );
    }

    #[rstest]
    fn test_product_stats(catalog: Catalog) {
        let product = &catalog.products["burger_160"];
        let stats = catalog.product_stats(product).unwrap();
        let expected = compute_product_stats(
            product,
            &recipe(),
            &catalog.materials,
            &catalog.settings,
        );
        assert_eq!(stats, expected);
        assert_approx_eq!(Money, stats.package.packaging_cost, Money(105.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_material_usages(catalog: Catalog) {
        let usages = catalog.material_usages(&"meat".into());
        assert_eq!(usages.recipes, [&RecipeID::new("burger_mix")]);
        assert!(usages.products.is_empty());

        let usages = catalog.material_usages(&"bag".into());
        assert!(usages.recipes.is_empty());
        assert_eq!(usages.products, [&ProductID::new("burger_160")]);

        assert!(catalog.material_usages(&"salt".into()).is_empty());
    }

    #[rstest]
    fn test_iter_unused_materials(catalog: Catalog) {
        let mut catalog = catalog;
        assert_eq!(catalog.iter_unused_materials().count(), 0);

        let salt = RawMaterial {
            id: "salt".into(),
            ..material()
        };
        catalog.materials.insert(salt.id.clone(), salt);
        assert_equal_ids(catalog.iter_unused_materials(), &["salt"]);
    }

    fn assert_equal_ids<'a>(iter: impl Iterator<Item = &'a MaterialID>, expected: &[&str]) {
        let ids = iter.map(|id| id.to_string()).collect_vec();
        assert_eq!(ids, expected);
    }
}
