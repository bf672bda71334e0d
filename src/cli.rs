//! The command line interface for mixcost.
use crate::catalog::Catalog;
use crate::labor::GlobalSettings;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::product::ProductID;
use crate::recipe::RecipeID;
use crate::scaler::{ProductionOrder, ScaleTarget, scale_recipe};
use crate::settings::Settings;
use crate::summary::{AlertLevel, margin_alerts};
use crate::units::{Dimensionless, MoneyPerHour, Quantity};
use ::log::{error, info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// Cost and price batch-mixed products.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write per-ingredient costs to an extra CSV file
    #[arg(long)]
    pub debug_output: bool,
}

/// What to scale a recipe to
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ScaleOpts {
    /// Mass of mix to produce, in kg
    #[arg(long)]
    kilograms: Option<f64>,
    /// Number of sale units of a product to produce (requires --product)
    #[arg(long, requires = "product")]
    units: Option<f64>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate costs and prices for a catalog and write reports.
    Run {
        /// Path to the catalog directory.
        catalog_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a catalog.
    Validate {
        /// Path to the catalog directory.
        catalog_dir: PathBuf,
    },
    /// Print a production order for a recipe scaled to a target amount.
    Scale {
        /// Path to the catalog directory.
        catalog_dir: PathBuf,
        /// The recipe to scale.
        recipe_id: String,
        /// The target amount
        #[command(flatten)]
        target: ScaleOpts,
        /// The product whose unit weight is used with --units
        #[arg(long)]
        product: Option<String>,
    },
    /// Show or change a catalog's labor cost per hour.
    LaborRate {
        /// Path to the catalog directory.
        catalog_dir: PathBuf,
        /// New labor cost per hour to save to the catalog
        #[arg(long)]
        set: Option<f64>,
    },
    /// Manage demo catalogs.
    Example {
        /// The available subcommands for managing demo catalogs.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage program settings.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { catalog_dir, opts } => handle_run_command(&catalog_dir, &opts, None),
            Self::Validate { catalog_dir } => handle_validate_command(&catalog_dir, None),
            Self::Scale {
                catalog_dir,
                recipe_id,
                target,
                product,
            } => handle_scale_command(&catalog_dir, &recipe_id, &target, product.as_deref()),
            Self::LaborRate { catalog_dir, set } => handle_labor_rate_command(&catalog_dir, set),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ mixcost --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Use the given settings, or load them from the settings file
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Initialise the logger without log files, unless it is already running
fn init_console_logger(settings: &Settings) -> Result<()> {
    if log::is_logger_initialised() {
        return Ok(());
    }

    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")
}

/// Handle the `run` command.
pub fn handle_run_command(
    catalog_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let debug_output = opts.debug_output || settings.debug_output;

    let output_path = match &opts.output_dir {
        Some(path) => path.clone(),
        None => get_output_dir(catalog_path)?,
    };
    let overwrite = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    if !log::is_logger_initialised() {
        log::init(Some(&settings.log_level), Some(&output_path))
            .context("Failed to initialise logging.")?;
    }

    let catalog = Catalog::from_path(catalog_path).context("Failed to load catalog.")?;
    info!("Loaded catalog from {}", catalog_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    write_metadata(&output_path, catalog_path).context("Failed to save metadata.")?;
    write_results(&catalog, &output_path, debug_output)
        .context("Failed to write results.")?;

    for alert in margin_alerts(&catalog, None) {
        match alert.level {
            AlertLevel::Critical => error!("{}: {}", alert.subject, alert.message),
            AlertLevel::Warning => warn!("{}: {}", alert.subject, alert.message),
        }
    }
    info!("Costing complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(catalog_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    init_console_logger(&settings)?;

    let catalog = Catalog::from_path(catalog_path).context("Failed to validate catalog.")?;
    for material_id in catalog.iter_unused_materials() {
        info!("Material {material_id} is not used by any recipe or product");
    }
    info!("Catalog validation successful!");

    Ok(())
}

/// Work out the mass of mix requested on the command line
fn get_scale_target(
    catalog: &Catalog,
    target: &ScaleOpts,
    product_id: Option<&str>,
) -> Result<ScaleTarget> {
    if let Some(kg) = target.kilograms {
        return Ok(ScaleTarget::Kilograms(Quantity(kg)));
    }

    let count = target.units.context("No target amount given")?;
    let product_id = ProductID::new(product_id.context("--units requires --product")?);
    let product = catalog
        .products
        .get(&product_id)
        .with_context(|| format!("Product {product_id} not found"))?;

    Ok(ScaleTarget::Units {
        count: Dimensionless(count),
        unit_weight: product.unit_weight,
    })
}

/// Print a production order as a table
fn print_production_order(order: &ProductionOrder) {
    println!(
        "Recipe {}: {:.3} kg (x{:.4})",
        order.recipe_id, order.target_kg, order.scaling_factor
    );
    for ing in &order.ingredients {
        println!(
            "  {:<30} {:>12.3} {:>14.2}",
            ing.material_name.unwrap_or("(missing)"),
            ing.quantity,
            ing.cost
        );
    }
    println!("Total material cost: {:.2}", order.total_cost);
    println!("Material cost per kg: {:.2}", order.cost_per_kg);
}

/// Handle the `scale` command.
fn handle_scale_command(
    catalog_path: &Path,
    recipe_id: &str,
    target: &ScaleOpts,
    product_id: Option<&str>,
) -> Result<()> {
    init_console_logger(&Settings::load().context("Failed to load settings.")?)?;

    let catalog = Catalog::from_path(catalog_path).context("Failed to load catalog.")?;
    let recipe_id = RecipeID::new(recipe_id);
    let recipe = catalog
        .recipes
        .get(&recipe_id)
        .with_context(|| format!("Recipe {recipe_id} not found"))?;
    let target = get_scale_target(&catalog, target, product_id)?;

    print_production_order(&scale_recipe(recipe, &catalog.materials, target));

    Ok(())
}

/// Handle the `labor-rate` command.
pub fn handle_labor_rate_command(catalog_path: &Path, new_rate: Option<f64>) -> Result<()> {
    let settings = GlobalSettings::from_path(catalog_path)?;
    let Some(new_rate) = new_rate else {
        println!("{}", settings.labor_cost_per_hour);
        return Ok(());
    };

    let settings = GlobalSettings {
        labor_cost_per_hour: MoneyPerHour(new_rate),
        ..settings
    };
    settings
        .save(catalog_path)
        .context("Failed to save labor rate.")?;
    println!("Labor cost per hour set to {new_rate}");

    Ok(())
}
