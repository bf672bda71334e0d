//! Common routines for handling input data.
use crate::catalog::Catalog;
use crate::id::{HasID, IDLike};
use crate::labor::GlobalSettings;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs;
use std::path::Path;

mod global;
mod material;
use material::read_materials;
mod recipe;
use recipe::read_recipes;
mod product;
use product::read_products;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    if vec.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }
    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file.
///
/// A missing file is treated the same as a file with no rows.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    if !file_path.exists() {
        return Ok(Vec::new().into_iter());
    }

    let vec = read_csv_internal(file_path)?;
    Ok(vec.into_iter())
}

fn read_csv_internal<'a, T: DeserializeOwned + 'a>(file_path: &'a Path) -> Result<Vec<T>> {
    let vec = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a CSV file of items with IDs.
///
/// As this function is only ever used for top-level CSV files (i.e. the ones which actually define
/// the IDs for a given type), we use an ordered map to maintain the order in the input files.
pub fn read_csv_id_file<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
where
    T: HasID<ID> + DeserializeOwned,
{
    fn fill_and_validate_map<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
    where
        T: HasID<ID> + DeserializeOwned,
    {
        let mut map = IndexMap::new();
        for record in read_csv::<T>(file_path)? {
            let id = record.get_id().clone();
            let existing = map.insert(id.clone(), record).is_some();
            ensure!(!existing, "Duplicate ID found: {id}");
        }

        Ok(map)
    }

    fill_and_validate_map(file_path).with_context(|| input_err_msg(file_path))
}

/// Check that a value is finite and non-negative.
///
/// `name` describes the value for use in the error message.
pub fn check_non_negative<T>(value: T, name: &str) -> Result<()>
where
    T: Into<f64> + Display + Copy,
{
    let raw: f64 = value.into();
    ensure!(
        raw.is_finite() && raw >= 0.0,
        "Invalid value for {name} ({value}). Must be a finite number >= 0."
    );

    Ok(())
}

/// Check that an optional value, if present, is finite and non-negative
pub fn check_optional_non_negative<T>(value: Option<T>, name: &str) -> Result<()>
where
    T: Into<f64> + Display + Copy,
{
    if let Some(value) = value {
        check_non_negative(value, name)?;
    }

    Ok(())
}

/// Check that an optional value, if present, is finite and strictly positive.
///
/// Used for operator counts, where zero would silently remove a labor cost.
pub fn check_optional_positive<T>(value: Option<T>, name: &str) -> Result<()>
where
    T: Into<f64> + Display + Copy,
{
    if let Some(value) = value {
        let raw: f64 = value.into();
        ensure!(
            raw.is_finite() && raw > 0.0,
            "Invalid value for {name} ({value}). Must be a finite number > 0."
        );
    }

    Ok(())
}

/// Read a catalog from the specified directory.
///
/// # Arguments
///
/// * `catalog_dir` - Folder containing catalog files
///
/// # Returns
///
/// The loaded and validated [`Catalog`] or an error.
pub fn load_catalog<P: AsRef<Path>>(catalog_dir: P) -> Result<Catalog> {
    let catalog_dir = catalog_dir.as_ref();
    let settings = GlobalSettings::from_path(catalog_dir)?;
    let materials = read_materials(catalog_dir)?;
    let recipes = read_recipes(catalog_dir, &materials)?;
    let products = read_products(catalog_dir, &materials, &recipes)?;

    Ok(Catalog {
        settings,
        materials,
        recipes,
        products,
    })
}
