//! Code for reading and saving the catalog-wide settings in `catalog.toml`.
use super::{input_err_msg, read_toml};
use crate::labor::GlobalSettings;
use crate::units::{Dimensionless, MoneyPerHour};
use anyhow::{Context, Result, ensure};
use log::warn;
use std::fs;
use std::path::Path;

const GLOBAL_SETTINGS_FILE_NAME: &str = "catalog.toml";

/// Check that the labor rate is valid
fn check_labor_cost_per_hour(value: MoneyPerHour) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerHour(0.0),
        "labor_cost_per_hour must be a finite number greater than or equal to zero"
    );

    if value == MoneyPerHour(0.0) {
        warn!("labor_cost_per_hour is zero, so all labor will be costed at zero");
    }

    Ok(())
}

/// Check that the margin thresholds are valid percentages
fn check_margin_thresholds(low: Dimensionless, critical: Dimensionless) -> Result<()> {
    for (name, value) in [("low_margin_pct", low), ("critical_margin_pct", critical)] {
        ensure!(
            value.is_finite() && value <= Dimensionless(100.0),
            "{name} must be a finite percentage no greater than 100"
        );
    }

    ensure!(
        critical <= low,
        "critical_margin_pct ({critical}) cannot be greater than low_margin_pct ({low})"
    );

    Ok(())
}

impl GlobalSettings {
    /// Read the global settings from the specified catalog directory.
    ///
    /// # Arguments
    ///
    /// * `catalog_dir` - Folder containing catalog files
    ///
    /// # Returns
    ///
    /// The file contents as a [`GlobalSettings`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(catalog_dir: P) -> Result<GlobalSettings> {
        let file_path = catalog_dir.as_ref().join(GLOBAL_SETTINGS_FILE_NAME);
        let settings: GlobalSettings = read_toml(&file_path)?;

        settings
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(settings)
    }

    /// Write these settings to `catalog.toml` in the specified directory, replacing the old file
    pub fn save<P: AsRef<Path>>(&self, catalog_dir: P) -> Result<()> {
        self.validate()?;

        let file_path = catalog_dir.as_ref().join(GLOBAL_SETTINGS_FILE_NAME);
        let contents = toml::to_string(self).context("Could not convert settings to TOML")?;
        fs::write(&file_path, contents)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;

        Ok(())
    }

    /// Validate settings after reading in file
    fn validate(&self) -> Result<()> {
        check_labor_cost_per_hour(self.labor_cost_per_hour)?;
        check_margin_thresholds(self.low_margin_pct, self.critical_margin_pct)?;

        Ok(())
    }
}
