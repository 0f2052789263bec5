use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng as _;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "typeswarm", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scene for a number of ticks and dump particle transforms as JSON.
    Simulate(SimulateArgs),
    /// Run the scene and write a PNG preview of the last frame.
    Snapshot(SnapshotArgs),
    /// Inspect or edit a JSON quote file.
    Quotes {
        #[command(subcommand)]
        cmd: QuotesCommand,
    },
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quote file (JSON array of `{ "text", "author" }`). Built-in quotes when omitted.
    #[arg(long)]
    quotes: Option<PathBuf>,

    /// Font file overriding the configured one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Pointer position in pixels, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<(f32, f32)>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Tick at which to trigger a settle.
    #[arg(long)]
    settle_at: Option<u64>,

    /// Tick at which to trigger a scatter.
    #[arg(long)]
    scatter_at: Option<u64>,

    /// Record every n-th tick.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Output JSON path. Standard output when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of ticks to run before rendering.
    #[arg(long, default_value_t = 120)]
    ticks: u64,

    /// Settle first and keep ticking until the quote is legible.
    #[arg(long)]
    settle: bool,

    /// Skip the backdrop grid.
    #[arg(long)]
    no_grid: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum QuotesCommand {
    /// Print every quote with its index.
    List {
        /// Quote file.
        #[arg(long)]
        file: PathBuf,
    },
    /// Put a quote at the front of the list, creating the file if needed.
    Add {
        /// Quote file.
        #[arg(long)]
        file: PathBuf,
        /// Quote body. Surrounding whitespace and quote marks are dropped.
        #[arg(long)]
        text: String,
        /// Attribution.
        #[arg(long)]
        author: String,
    },
    /// Delete the quote at an index shown by `list`.
    Remove {
        /// Quote file.
        #[arg(long)]
        file: PathBuf,
        /// Index to delete.
        #[arg(long)]
        index: usize,
    },
}

#[derive(serde::Serialize)]
struct SimFrame {
    tick: u64,
    state: typeswarm::SceneState,
    particles: Vec<typeswarm::ParticleTransform>,
}

#[derive(serde::Serialize)]
struct SimReport {
    quote: typeswarm::Quote,
    metrics: typeswarm::SceneMetrics,
    frames: Vec<SimFrame>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Quotes { cmd } => cmd_quotes(cmd),
    }
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{s}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn build_scene(args: &SceneArgs) -> anyhow::Result<typeswarm::HeroScene> {
    let mut cfg = match &args.config {
        Some(path) => typeswarm::SceneConfig::from_path(path)?,
        None => typeswarm::SceneConfig::default(),
    };
    if let Some(font) = &args.font {
        cfg.font.path = Some(font.clone());
    }

    let quotes = match &args.quotes {
        Some(path) => typeswarm::load_quotes(&typeswarm::JsonFileQuotes::new(path)),
        None => typeswarm::fallback_quotes(),
    };
    let rng: typeswarm::SceneRng = match args.seed {
        Some(seed) => Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };
    let rasterizer = typeswarm::rasterizer_for(&cfg.font);

    let mut scene = typeswarm::HeroScene::new(cfg, quotes, rasterizer, rng)
        .context("create hero scene")?;
    if let Some((x, y)) = args.pointer {
        scene.on_pointer_move(x, y);
    }
    Ok(scene)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut scene = build_scene(&args.scene)?;
    let every = args.every.max(1);

    let mut frames = Vec::new();
    for tick in 1..=args.ticks {
        if args.settle_at == Some(tick) && !scene.settle() {
            tracing::warn!(tick, state = ?scene.state(), "settle had no effect");
        }
        if args.scatter_at == Some(tick) && !scene.scatter() {
            tracing::warn!(tick, state = ?scene.state(), "scatter had no effect");
        }
        let state = scene.tick();
        if tick % every == 0 {
            frames.push(SimFrame {
                tick,
                state,
                particles: scene.transforms(),
            });
        }
    }

    let report = SimReport {
        quote: scene.quote().clone(),
        metrics: scene.metrics(),
        frames,
    };

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &report).context("encode simulation JSON")?;
            w.flush().context("flush simulation JSON")?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &report).context("encode simulation JSON")?;
            writeln!(w).context("write simulation JSON")?;
        }
    }
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut scene = build_scene(&args.scene)?;

    if args.settle {
        scene.settle();
    }
    let mut ticks = 0u64;
    while ticks < args.ticks
        || (args.settle && scene.state() == typeswarm::SceneState::Settling)
    {
        scene.tick();
        ticks += 1;
    }

    let style = typeswarm::PreviewStyle {
        grid: if args.no_grid {
            None
        } else {
            typeswarm::PreviewStyle::default().grid
        },
        ..typeswarm::PreviewStyle::default()
    };
    let frame = typeswarm::render_preview(&scene, &style)?;
    frame.save_png(&args.out)?;

    eprintln!(
        "wrote {} ({} ticks, {:?})",
        args.out.display(),
        ticks,
        scene.state()
    );
    Ok(())
}

fn cmd_quotes(cmd: QuotesCommand) -> anyhow::Result<()> {
    use typeswarm::QuoteSource as _;

    match cmd {
        QuotesCommand::List { file } => {
            let quotes = typeswarm::JsonFileQuotes::new(&file).fetch()?;
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            for (i, q) in quotes.iter().enumerate() {
                writeln!(w, "{i}\t{}\t// {}", q.text, q.author).context("write quote list")?;
            }
        }
        QuotesCommand::Add { file, text, author } => {
            let quote = typeswarm::Quote::curated(&text, &author)?;
            let count = typeswarm::JsonFileQuotes::new(&file).add(quote)?;
            eprintln!("wrote {} ({count} quotes)", file.display());
        }
        QuotesCommand::Remove { file, index } => {
            let removed = typeswarm::JsonFileQuotes::new(&file).remove(index)?;
            eprintln!("removed \"{}\" from {}", removed.text, file.display());
        }
    }
    Ok(())
}
