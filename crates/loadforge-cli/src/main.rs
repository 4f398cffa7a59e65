//! LoadForge CLI - assign cargo to a vehicle fleet from the command line
//!
//! ## Commands
//!
//! - `solve`: Load items onto a fleet and print the loading report
//! - `catalog`: List the vehicle types available to a fleet

mod error;
mod input;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use loadforge::console::{format_amount, render_json, render_text};
use loadforge::{
    extract, optimize_with_config, total_volume, total_weight, EngineKind, LeftoverPolicy,
    LengthUnit, SlotOrder, SolverConfig, VehicleCatalog,
};

use error::CliError;
use input::{load_items, FleetFile};

#[derive(Parser)]
#[command(name = "loadforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cargo loading optimizer for heterogeneous vehicle fleets", long_about = None)]
struct Cli {
    /// Suppress solver progress on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign items to the fleet, maximizing loaded volume
    Solve {
        /// Item file (CSV, JSON, YAML or TOML)
        items: PathBuf,

        /// Fleet file (default: the reference fleet on the standard catalog)
        #[arg(short, long)]
        fleet: Option<PathBuf>,

        /// Solver configuration file (TOML or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Time limit in seconds, overriding the configuration
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Unit of the item dimensions
        #[arg(short, long, value_enum, default_value_t = UnitArg::Cm)]
        unit: UnitArg,

        /// Solver engine, overriding the configuration
        #[arg(short, long, value_enum)]
        engine: Option<EngineArg>,

        /// Slot order, overriding the configuration
        #[arg(long, value_enum)]
        slot_order: Option<SlotOrderArg>,

        /// Count the capacity of empty vehicles as leftover
        #[arg(long)]
        all_slots_leftover: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List vehicle types
    Catalog {
        /// Fleet file whose vehicle types replace the standard catalog
        #[arg(short, long)]
        fleet: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnitArg {
    Mm,
    Cm,
    M,
    In,
    Ft,
}

impl From<UnitArg> for LengthUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Mm => LengthUnit::Millimeter,
            UnitArg::Cm => LengthUnit::Centimeter,
            UnitArg::M => LengthUnit::Meter,
            UnitArg::In => LengthUnit::Inch,
            UnitArg::Ft => LengthUnit::Foot,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineArg {
    Auto,
    Exact,
    Greedy,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Auto => EngineKind::Auto,
            EngineArg::Exact => EngineKind::Exact,
            EngineArg::Greedy => EngineKind::Greedy,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SlotOrderArg {
    AsGiven,
    Reversed,
    SmallestFirst,
    LargestFirst,
}

impl From<SlotOrderArg> for SlotOrder {
    fn from(arg: SlotOrderArg) -> Self {
        match arg {
            SlotOrderArg::AsGiven => SlotOrder::AsGiven,
            SlotOrderArg::Reversed => SlotOrder::Reversed,
            SlotOrderArg::SmallestFirst => SlotOrder::SmallestFirst,
            SlotOrderArg::LargestFirst => SlotOrder::LargestFirst,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Options of the `solve` command.
struct SolveArgs {
    items: PathBuf,
    fleet: Option<PathBuf>,
    config: Option<PathBuf>,
    time_limit: Option<u64>,
    unit: LengthUnit,
    engine: Option<EngineKind>,
    slot_order: Option<SlotOrder>,
    all_slots_leftover: bool,
    format: Format,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if !cli.quiet {
        loadforge::console::init();
    }

    let result = match cli.command {
        Commands::Solve {
            items,
            fleet,
            config,
            time_limit,
            unit,
            engine,
            slot_order,
            all_slots_leftover,
            format,
        } => cmd_solve(SolveArgs {
            items,
            fleet,
            config,
            time_limit,
            unit: unit.into(),
            engine: engine.map(Into::into),
            slot_order: slot_order.map(Into::into),
            all_slots_leftover,
            format,
        }),
        Commands::Catalog { fleet, format } => cmd_catalog(fleet.as_deref(), format),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn solver_config(args: &SolveArgs) -> Result<SolverConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(seconds) = args.time_limit {
        config = config.with_termination_seconds(seconds);
    }
    if let Some(engine) = args.engine {
        config = config.with_engine(engine);
    }
    if let Some(order) = args.slot_order {
        config = config.with_slot_order(order);
    }
    if args.all_slots_leftover {
        config = config.with_leftover_policy(LeftoverPolicy::AllSlots);
    }
    config.validate()?;
    Ok(config)
}

fn cmd_solve(args: SolveArgs) -> Result<String, CliError> {
    let config = solver_config(&args)?;
    let fleet = match &args.fleet {
        Some(path) => FleetFile::load(path)?,
        None => FleetFile::reference(),
    };
    let slots = fleet.slots(config.slot_order)?;
    let items = load_items(&args.items, args.unit)?;
    debug!(event = "input_ready", item_count = items.len(), slot_count = slots.len());

    let solution = optimize_with_config(&items, &slots, &config);
    if !solution.has_assignment() {
        return Err(CliError::Unsolved {
            status: solution.status(),
            message: solution.message().map(str::to_string),
        });
    }
    let plan = extract(&solution, &items, &slots, config.leftover_policy)?;

    match args.format {
        Format::Json => Ok(render_json(&plan)? + "\n"),
        Format::Text => {
            let mut out = format!(
                "Total item volume: {}\nTotal item weight: {}\n\n",
                format_amount(total_volume(&items)),
                format_amount(total_weight(&items)),
            );
            out.push_str(&render_text(&plan));
            Ok(out)
        }
    }
}

fn cmd_catalog(fleet: Option<&Path>, format: Format) -> Result<String, CliError> {
    let catalog = match fleet {
        Some(path) => FleetFile::load(path)?.catalog()?,
        None => VehicleCatalog::standard(),
    };

    match format {
        Format::Json => Ok(serde_json::to_string_pretty(catalog.types())? + "\n"),
        Format::Text => {
            let mut out = String::new();
            for ty in catalog.types() {
                out.push_str(&format!(
                    "{:<10} {:<16} max weight: {:>12}  max volume: {:>16}\n",
                    ty.code,
                    ty.description,
                    format_amount(ty.max_weight),
                    format_amount(ty.max_volume()),
                ));
            }
            Ok(out)
        }
    }
}
