//! The demo catalogs bundled with the program and the CLI commands for using them.
use super::{RunOpts, handle_run_command};
use crate::output::OUTPUT_DIRECTORY_ROOT;
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the demo catalogs.
const DEMOS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// The available subcommands for managing demo catalogs.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available demo catalogs.
    List,
    /// Describe the specified demo catalog.
    Info {
        /// The name of the demo.
        name: String,
    },
    /// Extract a demo catalog to a new directory.
    Extract {
        /// The name of the demo to extract.
        name: String,
        /// The destination folder for the catalog.
        new_path: Option<PathBuf>,
    },
    /// Cost a demo catalog.
    Run {
        /// The name of the demo to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract { name, new_path } => {
                extract_example(&name, new_path.as_deref().unwrap_or(Path::new(&name)))?;
            }
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Names of the bundled demo catalogs
pub fn example_names() -> impl Iterator<Item = &'static str> {
    DEMOS_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in example_names() {
        println!("{name}");
    }
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    let readme = DEMOS_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")?;

    println!("{readme}");

    Ok(())
}

/// Extract the named demo catalog into `new_path`, which must not exist yet
pub fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = DEMOS_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        let DirEntry::File(file) = entry else {
            bail!("Subdirectories in demo catalogs are not supported");
        };
        let file_name = file
            .path()
            .file_name()
            .context("Demo file has no name")?;
        fs::write(new_path.join(file_name), file.contents())?;
    }

    Ok(())
}

/// Handle the `example run` command.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let catalog_path = temp_dir.path().join(name);
    extract_example(name, &catalog_path)?;

    // Name the default output folder after the demo rather than the temporary path
    let output_dir = match &opts.output_dir {
        Some(dir) => dir.clone(),
        None => [OUTPUT_DIRECTORY_ROOT, name].iter().collect(),
    };
    let opts = RunOpts {
        output_dir: Some(output_dir),
        ..*opts
    };
    handle_run_command(&catalog_path, &opts, settings)
}
