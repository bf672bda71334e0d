//! Code for reading raw materials from a CSV file.
use super::*;
use crate::material::{MaterialMap, RawMaterial};
use crate::units::{Dimensionless, Quantity};
use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

const MATERIALS_FILE_NAME: &str = "materials.csv";

/// Reads raw materials from a CSV file.
///
/// # Arguments
///
/// * `catalog_dir` - Folder containing catalog files
///
/// # Returns
///
/// A map of materials, keyed by ID, or an error
pub fn read_materials(catalog_dir: &Path) -> Result<MaterialMap> {
    let file_path = catalog_dir.join(MATERIALS_FILE_NAME);
    let materials: MaterialMap = read_csv_id_file(&file_path)?;
    for material in materials.values() {
        validate_material(material)
            .with_context(|| format!("Invalid material {}", material.id))
            .with_context(|| input_err_msg(&file_path))?;
    }

    Ok(materials)
}

/// Check that a material's numeric fields make sense
fn validate_material(material: &RawMaterial) -> Result<()> {
    check_non_negative(material.purchase_price, "purchase_price")?;
    check_non_negative(
        material.quantity_per_purchase_unit,
        "quantity_per_purchase_unit",
    )?;
    check_non_negative(material.waste_factor, "waste_factor")?;

    if material.quantity_per_purchase_unit == Quantity(0.0) {
        warn!(
            "Material {} has a quantity per purchase unit of zero, so will be costed at zero",
            material.id
        );
    }
    if material.waste_factor < Dimensionless(1.0) {
        warn!(
            "Material {} has a waste factor of {}, which is less than 1",
            material.id, material.waste_factor
        );
    }

    Ok(())
}
