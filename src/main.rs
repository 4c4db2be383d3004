//! faxbox - laser-cut fax machine organizer generator

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use faxbox::{build, write, Config, DimensionReport, MeasurementSystem, Target};
use faxbox_settings::default_config_path;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "faxbox", version)]
#[command(about = "Generate laser-cut SVGs for a fax machine organizer", long_about = None)]
struct Cli {
    /// Config file (.toml or .json); defaults to $FAXBOX_CONFIG or the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Outer shell with divider and shelves
    Shell {
        /// Output SVG (default: <output dir>/outer_shell.svg)
        output: Option<PathBuf>,
    },
    /// One finger-jointed box per drawer
    Drawers {
        /// Output SVG (default: <output dir>/drawer.svg)
        output: Option<PathBuf>,
    },
    /// Sliding lid, flat lid and their small parts
    Lids {
        /// Output SVG (default: <output dir>/lids.svg)
        output: Option<PathBuf>,
    },
    /// Every organizer part packed onto the sheet
    Combine {
        /// Output SVG (default: <output dir>/final_layout.svg)
        output: Option<PathBuf>,
    },
    /// Small closed box for checking kerf and finger fit
    TestBox {
        /// Output SVG (default: <output dir>/test_box.svg)
        output: Option<PathBuf>,
    },
    /// Print derived dimensions
    Dims {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Units for the text report (mm or in)
        #[arg(short, long, default_value = "mm")]
        units: MeasurementSystem,
    },
    /// Write the default configuration
    InitConfig {
        /// Destination (.toml or .json; default: user config file)
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    faxbox::init_logging()?;
    let cli = Cli::parse();
    debug!("faxbox {} built {}", faxbox::VERSION, faxbox::BUILD_DATE);

    match cli.command {
        Commands::Shell { output } => generate(cli.config.as_deref(), Target::Shell, output),
        Commands::Drawers { output } => generate(cli.config.as_deref(), Target::Drawers, output),
        Commands::Lids { output } => generate(cli.config.as_deref(), Target::Lids, output),
        Commands::Combine { output } => generate(cli.config.as_deref(), Target::Combined, output),
        Commands::TestBox { output } => generate(cli.config.as_deref(), Target::TestBox, output),
        Commands::Dims { json, units } => dims(cli.config.as_deref(), json, units),
        Commands::InitConfig { output, force } => init_config(output, force),
    }
}

fn load(config: Option<&Path>) -> Result<Config> {
    let (config, source) = Config::discover(config).context("loading configuration")?;
    match source {
        Some(path) => info!("using config {}", path.display()),
        None => debug!("using default configuration"),
    }
    Ok(config)
}

fn generate(config: Option<&Path>, target: Target, output: Option<PathBuf>) -> Result<()> {
    let config = load(config)?;
    let plan = config.plan().context("invalid dimensions")?;
    let artifact = build(target, &plan, &config.dimensions, &config.layout)
        .with_context(|| format!("generating {}", target))?;

    let output = output.unwrap_or_else(|| config.output.directory.join(target.file_name()));
    let paths = write(&artifact, &output)?;

    println!("Generated {} ({} parts):", target, artifact.panel_count);
    for (path, (w, h)) in paths.iter().zip(&artifact.extents) {
        println!("  {}  {:.1}mm x {:.1}mm", path.display(), w, h);
    }
    Ok(())
}

fn dims(config: Option<&Path>, json: bool, units: MeasurementSystem) -> Result<()> {
    let config = load(config)?;
    let plan = config.plan().context("invalid dimensions")?;
    let report = DimensionReport::new(&config.dimensions, &plan).with_units(units);
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn init_config(output: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match output {
        Some(path) => path,
        None => default_config_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default()
        .save_to_file(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
