//! Dungeon layout generator
//!
//! Main entry point for the command line tool.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, Metadata, Record};
use serde::Serialize;

use dg_assets::{load_catalog, sample_catalog, CatalogError};
use dg_core::{
    CandidatePolicy, Catalog, Direction, Door, DoorDiscovery, FinalLayout, GenConfig, GenError,
    GenReport, Generation, Generator, GridPos, InstanceId, MemoryInstantiator, TemplateId,
    WorldTransform,
};

mod render;

/// Grid dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Assemble a dungeon from room templates", long_about = None)]
struct Args {
    /// Room catalog (JSON); the built-in sample catalog is used when absent
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<PathBuf>,

    /// Generation settings (JSON); command line flags override it
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Number of rooms, start room included
    #[arg(short = 'n', long = "rooms")]
    rooms: Option<u32>,

    /// Random seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Give up an attempt after this many placements
    #[arg(long = "max-steps")]
    max_steps: Option<u64>,

    /// Searches to run with fresh seeds before giving up
    #[arg(short = 'a', long = "attempts")]
    attempts: Option<u32>,

    /// Templates tried per open door (single or exhaustive)
    #[arg(long = "candidates")]
    candidates: Option<CandidatePolicy>,

    /// Discover template doors by instantiating each template once
    #[arg(long = "probe")]
    probe: bool,

    /// Distance between room centres in world units
    #[arg(long = "spacing", default_value_t = dg_core::DEFAULT_SPACING)]
    spacing: f64,

    /// Print the layout as JSON instead of a map
    #[arg(long = "json")]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug)]
enum CliError {
    Catalog(CatalogError),
    Gen(GenError),
    Config(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "catalog: {e}"),
            CliError::Gen(e) => write!(f, "{e}"),
            CliError::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<GenError> for CliError {
    fn from(e: GenError) -> Self {
        CliError::Gen(e)
    }
}

/// Writes log records to stderr
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("dungen: {e}");
            ExitCode::from(2)
        }
    }
}

fn build_config(args: &Args) -> Result<GenConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?
        }
        None => GenConfig::default(),
    };

    if let Some(rooms) = args.rooms {
        config.total_rooms = rooms;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(steps) = args.max_steps {
        config.max_steps = Some(steps);
    }
    if let Some(attempts) = args.attempts {
        config.max_attempts = attempts;
    }
    if let Some(policy) = args.candidates {
        config.candidates = policy;
    }
    if args.probe {
        config.discovery = DoorDiscovery::Probe;
    }
    if !(args.spacing.is_finite() && args.spacing > 0.0) {
        return Err(CliError::Config("spacing must be positive".to_string()));
    }
    config.validate()?;
    Ok(config)
}

/// Returns whether a layout was produced
fn run(args: &Args) -> Result<bool, CliError> {
    let config = build_config(args)?;
    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => sample_catalog()?,
    };

    let generator = Generator::new(catalog, config)?;
    let mut scene = MemoryInstantiator::new(WorldTransform::new(args.spacing));
    let report = generator.run(&mut scene)?;

    match &report.generation {
        Generation::Complete(layout) => {
            if args.json {
                let out = JsonLayout::new(&report, layout, generator.catalog(), scene.transform());
                let text = serde_json::to_string_pretty(&out)
                    .map_err(|e| CliError::Config(e.to_string()))?;
                println!("{text}");
            } else {
                print!("{}", render::render_map(layout));
                println!(
                    "{} rooms, {} open doors, seed {} ({} attempt(s), {} steps)",
                    layout.len(),
                    layout.open_doors.len(),
                    layout.seed,
                    report.attempts,
                    layout.steps
                );
            }
            Ok(true)
        }
        Generation::Failed {
            reason,
            seed,
            steps,
        } => {
            eprintln!(
                "generation failed after {} attempt(s): {:?} (last seed {}, {} steps); \
                 try another seed or fewer rooms",
                report.attempts, reason, seed, steps
            );
            Ok(false)
        }
    }
}

#[derive(Serialize)]
struct JsonRoom {
    template: TemplateId,
    name: String,
    cell: GridPos,
    world: [f64; 3],
    doors: Vec<Direction>,
}

#[derive(Serialize)]
struct JsonLayout {
    seed: u64,
    base_seed: u64,
    attempts: u32,
    steps: u64,
    rooms: Vec<JsonRoom>,
    open_doors: Vec<Door>,
}

impl JsonLayout {
    fn new(
        report: &GenReport<InstanceId>,
        layout: &FinalLayout<InstanceId>,
        catalog: &Catalog,
        transform: &WorldTransform,
    ) -> Self {
        let rooms = layout
            .entries(catalog)
            .into_iter()
            .map(|entry| JsonRoom {
                world: transform.grid_to_world(entry.cell),
                doors: entry.doors.directions().collect(),
                template: entry.template,
                name: entry.name,
                cell: entry.cell,
            })
            .collect();
        Self {
            seed: layout.seed,
            base_seed: report.base_seed,
            attempts: report.attempts,
            steps: layout.steps,
            rooms,
            open_doors: layout.open_doors.clone(),
        }
    }
}
