//! Command line interface for the reference models and criticality solve

// standard library
use std::path::{Path, PathBuf};

// pinlat crates
use pinlat::geometry::models::{self, AssemblyConfig, PinCellConfig};
use pinlat::geometry::{Geometry, Point, RasterSpec};
use pinlat::mgxs::{balance_operator, collapse, fission_operator, solve, TallySet};
use pinlat::utils::{f, ValueExt};

// external crates
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Geometry queries and criticality for pin cell and lattice models
#[derive(Parser)]
#[command(name = "pinlat", version, about, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Find the material at a point
    #[command(allow_negative_numbers = true)]
    Locate {
        /// Reference model
        model: Model,
        /// x coordinate [cm]
        x: f64,
        /// y coordinate [cm]
        y: f64,
        /// z coordinate [cm]
        z: Option<f64>,
        /// JSON file of model dimensions
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a material map of the xy plane
    Raster {
        /// Reference model
        model: Model,
        /// Pixels along the longer side
        #[arg(short, long, default_value_t = 60)]
        pixels: usize,
        /// JSON file of model dimensions
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Collapse tallies and solve for k-effective
    Criticality {
        /// JSON list of tally records
        tallies: PathBuf,
        /// Number of energy groups (inferred from the tallies by default)
        #[arg(short, long)]
        groups: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    /// Single pin cell
    Pin,
    /// Pin lattice assembly
    Assembly,
}

fn main() {
    let cli = Cli::parse();
    logging_init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Locate {
            model,
            x,
            y,
            z,
            config,
        } => locate(model, Point::new(x, y, z.unwrap_or(0.0)), config.as_deref()),
        Command::Raster {
            model,
            pixels,
            config,
        } => raster(model, pixels, config.as_deref()),
        Command::Criticality { tallies, groups } => criticality(&tallies, groups),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn locate(model: Model, point: Point, config: Option<&Path>) -> CliResult<()> {
    let (geometry, _) = load_model(model, config)?;
    let location = geometry.locate_path(&point)?;
    let material = geometry.material(location.material)?;
    println!("{point} -> {material}");
    println!("{location}");
    Ok(())
}

fn raster(model: Model, pixels: usize, config: Option<&Path>) -> CliResult<()> {
    let (geometry, width) = load_model(model, config)?;

    // keep pixels square, `pixels` runs along the longer side
    let long = width[0].max(width[1]);
    let along = |w: f64| ((pixels as f64 * w / long).round() as usize).max(1);
    let spec = RasterSpec {
        width,
        pixels: [along(width[0]), along(width[1])],
        ..Default::default()
    };
    let map = geometry.raster(&spec)?;
    print!("{map}");

    for (id, count) in map.counts() {
        let name = geometry.material(id).map(|m| m.name.clone())?;
        info!(
            "{id} {name:<10} {count:>7} pixels ({:.2}%)",
            100.0 * map.fraction(id)
        );
    }
    Ok(())
}

fn criticality(path: &Path, groups: Option<usize>) -> CliResult<()> {
    let tallies = TallySet::from_json_file(path)?;
    let groups = match groups {
        Some(g) => g,
        None => {
            let g = tallies.num_groups();
            debug!("Inferred {g} groups from tallies");
            g
        }
    };

    let xs = collapse(groups, &tallies)?;
    info!("Cross sections\n{xs}");

    let spectrum = solve(&balance_operator(&xs), &fission_operator(&xs))?;
    debug!("{spectrum}");

    let mode = spectrum
        .dominant()
        .ok_or_else(|| f!("no modes for {groups} groups"))?;
    if !mode.is_real(1e-10) {
        warn!("Dominant mode is not purely real");
    }

    println!("k-effective = {}", mode.k_eff().sci(6, 2));
    for (g, phi) in mode.real_flux().iter().enumerate() {
        println!("  phi[g{g}] = {}", phi.sci(6, 2));
    }
    Ok(())
}

/// Reference model geometry and the full [x, y] width of its outer box
fn load_model(model: Model, config: Option<&Path>) -> CliResult<(Geometry, [f64; 2])> {
    match model {
        Model::Pin => {
            let config = match config {
                Some(path) => PinCellConfig::from_json_file(path)?,
                None => PinCellConfig::default(),
            };
            Ok((models::pin_cell(&config)?, [config.pitch, config.pitch]))
        }
        Model::Assembly => {
            let config = match config {
                Some(path) => AssemblyConfig::from_json_file(path)?,
                None => AssemblyConfig::default(),
            };
            Ok((models::assembly(&config)?, config.width()))
        }
    }
}

/// Sets up logging at runtime to allow for multiple verbosity levels
fn logging_init(verbosity: u8, quiet: bool) {
    let result = stderrlog::new()
        .modules([module_path!(), "pinlat_geometry", "pinlat_mgxs"])
        .quiet(quiet)
        .verbosity(verbosity as usize + 2)
        .show_level(true)
        .color(stderrlog::ColorChoice::Auto)
        .timestamp(stderrlog::Timestamp::Off)
        .init();

    if let Err(e) = result {
        eprintln!("failed to initialise logging: {e}");
    }
}
