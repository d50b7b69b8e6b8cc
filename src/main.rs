use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use polar_calendar::config::validate_location;
use polar_calendar::{
    fill_year, generate_year, render_files, ApproximateEphemeris, CalendarConfig, Chart,
    ChartKind, Ephemeris, Location, SpaEphemeris, YearData,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Polar sun and moon calendar generator", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one year of gap-filled sun and moon data for a city
    Generate(GenerateArgs),
    /// Draw a chart from a year data JSON file
    Render(RenderArgs),
    /// Generate data and both charts for every configured city
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct LocationArgs {
    /// City name, looked up in the configuration
    #[arg(long)]
    city: Option<String>,

    /// Latitude in degrees, north positive (with --lon and --tz)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// IANA timezone, e.g. Asia/Kolkata
    #[arg(long)]
    tz: Option<String>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    location: LocationArgs,

    /// Configuration file (defaults apply when omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Calendar year (defaults to the configured year)
    #[arg(long)]
    year: Option<i32>,

    /// Output JSON path (defaults to <output_dir>/<city>_data.json)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Use the closed-form solar model instead of SPA
    #[arg(long, action = ArgAction::SetTrue)]
    approximate: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Year data JSON produced by `generate`
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    #[command(flatten)]
    location: LocationArgs,

    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[arg(long)]
    year: Option<i32>,

    #[arg(long, value_enum, default_value_t = ChartKindOpt::Full)]
    kind: ChartKindOpt,

    /// Output directory (defaults to the configured output_dir)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output_dir: Option<PathBuf>,

    /// Write only the PNG
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "svg_only")]
    png_only: bool,

    /// Write only the SVG
    #[arg(long, action = ArgAction::SetTrue)]
    svg_only: bool,

    /// Skip all text (title, month, week and hour labels)
    #[arg(long, action = ArgAction::SetTrue)]
    no_text: bool,

    /// Seed for meteor-shower stroke placement
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Restrict the run to these cities
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    approximate: bool,

    /// Skip charts, write data only
    #[arg(long, action = ArgAction::SetTrue)]
    data_only: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ChartKindOpt {
    Full,
    Dawn,
}

impl From<ChartKindOpt> for ChartKind {
    fn from(value: ChartKindOpt) -> Self {
        match value {
            ChartKindOpt::Full => ChartKind::Full,
            ChartKindOpt::Dawn => ChartKind::Dawn,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Render(args) => handle_render(args),
        Command::Batch(args) => handle_batch(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<CalendarConfig> {
    match path {
        Some(path) => CalendarConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(CalendarConfig::default()),
    }
}

fn resolve_location(args: &LocationArgs, config: &CalendarConfig) -> Result<Location> {
    let location = match (&args.city, args.lat, args.lon, &args.tz) {
        (name, Some(lat), Some(lon), Some(tz)) => {
            let name = name.as_deref().unwrap_or("Custom");
            Location::new(name, lat, lon, tz)
        }
        (Some(name), None, None, None) => config
            .city(name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown city '{name}'; pass --lat, --lon and --tz"))?,
        (None, None, None, None) => return Err(anyhow!("pass --city or --lat/--lon/--tz")),
        _ => return Err(anyhow!("--lat, --lon and --tz must be given together")),
    };
    validate_location(&location)?;
    Ok(location)
}

fn pick_ephemeris(approximate: bool) -> Box<dyn Ephemeris> {
    if approximate {
        Box::new(ApproximateEphemeris)
    } else {
        Box::new(SpaEphemeris)
    }
}

fn data_path(dir: &Path, location: &Location) -> PathBuf {
    dir.join(format!("{}_data.json", location.file_stem()))
}

fn build_year(location: &Location, year: i32, ephemeris: &dyn Ephemeris) -> Result<YearData> {
    let series = generate_year(location, year, ephemeris)
        .with_context(|| format!("failed to generate {}", location.name))?;
    let data = fill_year(&series).with_context(|| format!("failed to fill {}", location.name))?;
    Ok(data.rounded(polar_calendar::series::OUTPUT_DECIMALS))
}

fn handle_generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let location = resolve_location(&args.location, &config)?;
    let year = args.year.unwrap_or(config.year);
    let ephemeris = pick_ephemeris(args.approximate);

    let data = build_year(&location, year, ephemeris.as_ref())?;
    let output = args
        .output
        .unwrap_or_else(|| data_path(&config.output_dir, &location));
    data.write_json(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}

fn handle_render(args: RenderArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let location = resolve_location(&args.location, &config)?;
    let year = args.year.unwrap_or(config.year);
    let data = YearData::read_json(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    config.render.kind = args.kind.into();
    if args.png_only {
        config.render.svg = false;
    }
    if args.svg_only {
        config.render.png = false;
    }
    if args.no_text {
        config.render.show_text = false;
    }
    if let Some(seed) = args.seed {
        config.render.seed = seed;
    }

    let chart = Chart::new(&data, &location, year, &config.render, &config.annotations)?;
    let dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    for path in render_files(&chart, &dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let cities: Vec<&Location> = if args.only.is_empty() {
        config.cities.iter().collect()
    } else {
        args.only
            .iter()
            .map(|name| {
                config
                    .city(name)
                    .ok_or_else(|| anyhow!("unknown city '{name}'"))
            })
            .collect::<Result<_>>()?
    };
    if cities.is_empty() {
        return Err(anyhow!("no cities configured"));
    }

    let ephemeris = pick_ephemeris(args.approximate);
    let mut failed = 0usize;
    for location in &cities {
        if let Err(err) = batch_city(&config, location, ephemeris.as_ref(), args.data_only) {
            warn!(city = %location.name, error = %format!("{err:#}"), "city failed");
            failed += 1;
        }
    }
    info!(cities = cities.len(), failed, "batch finished");
    if failed > 0 {
        return Err(anyhow!("{failed} of {} cities failed", cities.len()));
    }
    Ok(())
}

fn batch_city(
    config: &CalendarConfig,
    location: &Location,
    ephemeris: &dyn Ephemeris,
    data_only: bool,
) -> Result<()> {
    let data = build_year(location, config.year, ephemeris)?;
    let path = data_path(&config.output_dir, location);
    data.write_json(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    if data_only {
        return Ok(());
    }

    for kind in [ChartKind::Full, ChartKind::Dawn] {
        let mut render = config.render.clone();
        render.kind = kind;
        let chart = Chart::new(&data, location, config.year, &render, &config.annotations)?;
        render_files(&chart, &config.output_dir)
            .with_context(|| format!("failed to render {} ({kind:?})", location.name))?;
    }
    Ok(())
}
