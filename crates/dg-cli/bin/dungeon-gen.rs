//! Dungeon floor plan generator
//!
//! Main entry point: generates one floor plan and prints it as a character
//! grid or as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use dg_cli::{AsciiRenderer, GraphicsMode};
use dg_core::{
    ElbowPolicy, FloorPlan, LayoutConfig, LayoutError, LayoutRng, LayoutSession, NonConvergencePolicy,
    Renderer, ScatterSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

/// Procedural dungeon floor plan generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a connected dungeon floor plan", long_about = None)]
struct Args {
    /// JSON config file; flags override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of rooms to scatter
    #[arg(short = 'n', long = "rooms")]
    rooms: Option<usize>,

    /// RNG seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Corner distance below which rooms keep pushing apart
    #[arg(long = "threshold")]
    threshold: Option<f64>,

    /// Multiple of the mean area a room must exceed to become a hub
    #[arg(long = "factor")]
    factor: Option<f64>,

    /// Axis offset below which corridors are straight
    #[arg(long = "tolerance")]
    tolerance: Option<f64>,

    /// Relaxation pass cap
    #[arg(long = "max-passes")]
    max_passes: Option<usize>,

    /// Elbow corridor shape (vertical-first, avoid-destination)
    #[arg(long = "elbow")]
    elbow: Option<ElbowPolicy>,

    /// Keep going with an unsettled layout instead of failing
    #[arg(long = "proceed-on-non-convergence")]
    proceed: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Ascii)]
    format: Format,

    /// Layout units per character cell
    #[arg(long = "scale", default_value_t = 5.0)]
    scale: f64,

    /// Glyph set (classic, fancy)
    #[arg(long = "glyphs", default_value = "classic")]
    glyphs: GraphicsMode,

    /// Colour hubs, connectors and corridors
    #[arg(long = "color")]
    color: bool,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn layout_config(&self) -> Result<LayoutConfig, LayoutError> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::load_from_file(path)?,
            None => LayoutConfig::default(),
        };

        if let Some(rooms) = self.rooms {
            config.room_count = rooms;
        }
        if let Some(threshold) = self.threshold {
            config.proximity_threshold = threshold;
        }
        if let Some(factor) = self.factor {
            config.primary_area_factor = factor;
        }
        if let Some(tolerance) = self.tolerance {
            config.corridor_alignment_tolerance = tolerance;
        }
        if let Some(max_passes) = self.max_passes {
            config.max_relax_passes = max_passes;
        }
        if let Some(elbow) = self.elbow {
            config.elbow_policy = elbow;
        }
        if self.proceed {
            config.on_non_convergence = NonConvergencePolicy::Proceed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn generate(args: &Args) -> Result<FloorPlan, LayoutError> {
    let config = args.layout_config()?;
    let rng = match args.seed {
        Some(seed) => LayoutRng::new(seed),
        None => LayoutRng::from_entropy(),
    };
    tracing::info!(seed = rng.seed(), rooms = config.room_count, "generating floor plan");
    if args.seed.is_none() && args.format == Format::Ascii {
        eprintln!("dungeon-gen: seed {}", rng.seed());
    }

    let mut source = ScatterSource::new(rng);
    LayoutSession::generate(config, &mut source)?.run(None)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if !(args.scale.is_finite() && args.scale > 0.0) {
        eprintln!("dungeon-gen: --scale must be a positive number");
        return ExitCode::from(2);
    }

    let plan = match generate(&args) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("dungeon-gen: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.format {
        Format::Ascii => {
            let mut renderer = AsciiRenderer::new(args.scale, args.glyphs, args.color);
            renderer.render(&plan);
            print!("{}", renderer.output());
            tracing::info!(
                rooms = plan.rooms.len(),
                hubs = plan.hubs.len(),
                connectors = plan.promoted.len(),
                passes = plan.passes,
                "rendered"
            );
        }
        Format::Json => match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("dungeon-gen: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
