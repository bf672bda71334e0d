//! Program settings, read from `settings.toml` in the user's config folder.
use crate::get_mixcost_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# Program settings for mixcost.
# Uncomment a line to change a setting from its default value.
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_mixcost_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
    /// Whether to write per-ingredient costs to an extra CSV file
    #[serde(default)]
    pub debug_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            debug_output: false,
        }
    }
}

impl Settings {
    /// Read the settings file from the user's config folder.
    ///
    /// Default values are used if the file does not exist.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }

    /// The contents of a settings file with every setting commented out and documented
    pub fn default_file_contents() -> Result<String> {
        let settings_raw = toml::to_string(&Settings::default())?;

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.lines() {
            let Some((field, _)) = line.split_once('=') else {
                continue;
            };

            let docs = Settings::get_field_docs(field.trim())
                .with_context(|| format!("Missing doc comment for setting {}", field.trim()))?;
            for doc_line in docs.lines() {
                write!(&mut out, "\n# # {}\n", doc_line.trim())?;
            }
            writeln!(&mut out, "# {}", line.trim())?;
        }

        Ok(out)
    }
}
