//! Code for reading recipes and their ingredients from CSV files.
use super::*;
use crate::id::{IDCollection, define_id_getter};
use crate::material::MaterialMap;
use crate::recipe::{BatchLaborParameters, Ingredient, Recipe, RecipeID, RecipeMap};
use crate::units::{Dimensionless, Minutes, Quantity};
use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const RECIPES_FILE_NAME: &str = "recipes.csv";
const RECIPE_INGREDIENTS_FILE_NAME: &str = "recipe_ingredients.csv";

/// A recipe as it appears in the input file
#[derive(PartialEq, Debug, Deserialize)]
struct RecipeRaw {
    id: RecipeID,
    name: String,
    category: String,
    batch_minutes: Option<Minutes>,
    batch_operators: Option<Dimensionless>,
    active: Option<bool>,
}
define_id_getter! {RecipeRaw, RecipeID}

/// A recipe ingredient as it appears in the input file
#[derive(PartialEq, Debug, Deserialize)]
struct IngredientRaw {
    recipe_id: String,
    material_id: String,
    quantity: Quantity,
    display_order: Option<u32>,
}

/// Read recipes and their ingredients from CSV files.
///
/// # Arguments
///
/// * `catalog_dir` - Folder containing catalog files
/// * `materials` - Materials already read in
///
/// # Returns
///
/// A map of recipes, keyed by ID, or an error
pub fn read_recipes(catalog_dir: &Path, materials: &MaterialMap) -> Result<RecipeMap> {
    let file_path = catalog_dir.join(RECIPES_FILE_NAME);
    let raw_recipes = read_csv_id_file(&file_path)?;
    let mut recipes =
        read_recipes_from_map(raw_recipes).with_context(|| input_err_msg(&file_path))?;

    let file_path = catalog_dir.join(RECIPE_INGREDIENTS_FILE_NAME);
    let ingredients_csv = read_csv(&file_path)?;
    let mut ingredients = read_ingredients_from_iter(ingredients_csv, &recipes, materials)
        .with_context(|| input_err_msg(&file_path))?;

    for (id, recipe) in recipes.iter_mut() {
        match ingredients.remove(id) {
            Some(lines) => recipe.ingredients = lines,
            None => warn!("Recipe {id} has no ingredients"),
        }
    }

    Ok(recipes)
}

/// Convert raw recipes into [`Recipe`]s, without ingredients
fn read_recipes_from_map(raw_recipes: IndexMap<RecipeID, RecipeRaw>) -> Result<RecipeMap> {
    let mut recipes = RecipeMap::with_capacity(raw_recipes.len());
    for (id, raw) in raw_recipes {
        check_optional_non_negative(raw.batch_minutes, "batch_minutes")
            .and_then(|()| check_optional_positive(raw.batch_operators, "batch_operators"))
            .with_context(|| format!("Invalid recipe {id}"))?;

        let recipe = Recipe {
            id: id.clone(),
            name: raw.name,
            category: raw.category,
            ingredients: Vec::new(),
            labor: BatchLaborParameters {
                minutes: raw.batch_minutes,
                operators: raw.batch_operators,
            },
            active: raw.active.unwrap_or(true),
        };
        recipes.insert(id, recipe);
    }

    Ok(recipes)
}

/// Read ingredients from an iterator, grouped by recipe and sorted by display order.
///
/// Ingredients without a display order are placed after those with one, in file order.
fn read_ingredients_from_iter<I>(
    iter: I,
    recipes: &RecipeMap,
    materials: &MaterialMap,
) -> Result<HashMap<RecipeID, Vec<Ingredient>>>
where
    I: Iterator<Item = IngredientRaw>,
{
    let mut map: HashMap<RecipeID, Vec<Ingredient>> = HashMap::new();
    for raw in iter {
        let recipe_id = recipes.get_id_by_str(&raw.recipe_id)?;
        let material_id = materials.get_id_by_str(&raw.material_id)?;
        check_non_negative(raw.quantity, "quantity").with_context(|| {
            format!("Invalid ingredient {material_id} for recipe {recipe_id}")
        })?;

        map.entry(recipe_id).or_default().push(Ingredient {
            material_id,
            quantity: raw.quantity,
            display_order: raw.display_order.unwrap_or(u32::MAX),
        });
    }

    for lines in map.values_mut() {
        lines.sort_by_key(|line| line.display_order);
    }

    Ok(map)
}
