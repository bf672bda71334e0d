//! Cost rollup and pricing for batch-mixed food products.
//!
//! Raw material prices are rolled up into per-kg recipe costs, then into per-unit and
//! per-package product costs (adding forming, packing and packaging), and finally into
//! suggested and real prices with their margins.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod catalog;
pub mod cli;
pub mod id;
pub mod input;
pub mod labor;
pub mod log;
pub mod material;
pub mod output;
pub mod pricing;
pub mod product;
pub mod recipe;
pub mod scaler;
pub mod settings;
pub mod summary;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder where program settings are stored
pub fn get_mixcost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No known config dir for this platform, so use the current directory
        return PathBuf::new();
    };

    config_dir.push("mixcost");
    config_dir
}
