use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stroke_anim::{
    Configuration, ControlPanel, CpuSurface, Pacing, RecordedLoader, Rgba8, RunSummary, Scheduler,
    catalog,
};

#[derive(Parser, Debug)]
#[command(name = "stroke-anim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate one model to completion and write the result as a PNG.
    Draw(DrawArgs),
    /// Pick a random model, temperature and scale, then draw.
    Random(RandomArgs),
    /// List stock model ids and which ones have a local recording.
    Models(ModelsArgs),
}

#[derive(Parser, Debug)]
struct DrawArgs {
    /// Directory holding `<model>.json` stroke recordings.
    #[arg(long, default_value = "demos/models")]
    models: PathBuf,

    /// Model id (defaults to the config's model).
    #[arg(long)]
    model: Option<String>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling temperature.
    #[arg(long)]
    temperature: Option<f64>,

    /// Offset multiplier.
    #[arg(long)]
    scale: Option<f64>,

    /// Stroke width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Stroke color (`#RRGGBB` or `#RRGGBBAA`).
    #[arg(long)]
    color: Option<Rgba8>,

    /// Pick a palette color for every segment.
    #[arg(long)]
    random_colors: bool,

    /// Do not mark the start point.
    #[arg(long)]
    no_origin: bool,

    /// Animation steps per second.
    #[arg(long)]
    speed: Option<u32>,

    /// Pace ticks in real time instead of drawing as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Seed for palette colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RandomArgs {
    /// Directory holding `<model>.json` stroke recordings.
    #[arg(long, default_value = "demos/models")]
    models: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the model/parameter pick and palette colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ModelsArgs {
    /// Directory holding `<model>.json` stroke recordings.
    #[arg(long, default_value = "demos/models")]
    models: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Draw(args) => cmd_draw(args),
        Command::Random(args) => cmd_random(args),
        Command::Models(args) => cmd_models(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<Configuration> {
    match path {
        Some(p) => Configuration::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(Configuration::default()),
    }
}

type Panel = ControlPanel<RecordedLoader, CpuSurface>;

fn make_panel(config: Configuration, models: &Path, seed: Option<u64>) -> anyhow::Result<Panel> {
    let surface = CpuSurface::new(config.canvas, config.background)?;
    let mut panel = ControlPanel::new(config, RecordedLoader::new(models), surface)?;
    if let Some(seed) = seed {
        panel = panel.with_seed(seed);
    }
    Ok(panel)
}

fn finish(panel: &mut Panel, summary: RunSummary, out: &Path) -> anyhow::Result<()> {
    if summary.timed_out {
        tracing::warn!(phase = %summary.phase, "deadline reached before the drawing finished");
    }
    let written = panel
        .save_as(out)
        .with_context(|| format!("write png '{}'", out.display()))?;
    let status = panel.status();
    eprintln!(
        "wrote {} ({}: {} strokes in {} ticks)",
        written.display(),
        status.model_id.as_deref().unwrap_or("-"),
        summary.stroke_count,
        summary.ticks
    );
    Ok(())
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.model_id = model;
    }
    if let Some(v) = args.temperature {
        config.temperature = v;
    }
    if let Some(v) = args.scale {
        config.scale_factor = v;
    }
    if let Some(v) = args.width {
        config.stroke_width = v;
    }
    if let Some(c) = args.color {
        config.color = c;
    }
    if let Some(v) = args.speed {
        config.tick_rate = v;
    }
    config.random_colors |= args.random_colors;
    config.show_origin &= !args.no_origin;

    let mut panel = make_panel(config, &args.models, args.seed)?;
    panel.start()?;

    let pacing = if args.realtime {
        Pacing::RealTime
    } else {
        Pacing::Unpaced
    };
    let mut scheduler = Scheduler::new(pacing);
    if let Some(secs) = args.deadline_secs {
        scheduler = scheduler.with_deadline(Duration::from_secs(secs));
    }
    let summary = scheduler.run(&mut panel)?;
    finish(&mut panel, summary, &args.out)
}

fn cmd_random(args: RandomArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let available = RecordedLoader::new(&args.models)
        .available()
        .with_context(|| format!("scan recordings in '{}'", args.models.display()))?;
    if available.is_empty() {
        anyhow::bail!("no recordings found in '{}'", args.models.display());
    }
    let mut panel = make_panel(config, &args.models, args.seed)?;
    panel.randomize_and_start()?;
    let summary = Scheduler::new(Pacing::Unpaced).run(&mut panel)?;
    finish(&mut panel, summary, &args.out)
}

fn cmd_models(args: ModelsArgs) -> anyhow::Result<()> {
    let loader = RecordedLoader::new(&args.models);
    let available = loader.available().unwrap_or_default();
    for id in catalog::MODEL_IDS {
        let mark = if available.iter().any(|a| a == id) {
            "*"
        } else {
            " "
        };
        println!("{mark} {id:<16} {}", catalog::display_name(id));
    }
    for id in available.iter().filter(|a| !catalog::is_known(a)) {
        println!("* {id:<16} {} (local only)", catalog::display_name(id));
    }
    Ok(())
}
