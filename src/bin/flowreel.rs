use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "flowreel", version)]
struct Cli {
    /// Engine options JSON (layout, playback, export, threading).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level instead of warn.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print node positions as JSON.
    Layout(LayoutArgs),
    /// Print the animation timeline as JSON.
    Timeline(InputArgs),
    /// Print one visual state as JSON.
    State(StateArgs),
    /// Write every export frame as JSON lines.
    Export(ExportArgs),
    /// Play the timeline in real time, printing each state.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input diagram spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Flow direction.
    #[arg(long, value_enum)]
    orientation: Option<OrientationChoice>,

    /// Seed for the spring fallback.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false, id = "at")]
struct SnapshotArgs {
    /// 1-based animation step.
    #[arg(long)]
    step: Option<u32>,

    /// Export frame index (0-based), using the configured duration and fps.
    #[arg(long)]
    frame: Option<u64>,

    /// The terminal "everything revealed" state.
    #[arg(long = "final")]
    final_state: bool,
}

#[derive(Args, Debug)]
struct StateArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    at: SnapshotArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,

    /// Export length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Project frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Thread pool size.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Speed multiplier.
    #[arg(long)]
    speed: Option<f64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationChoice {
    TopToBottom,
    LeftToRight,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let opts = match &cli.config {
        Some(path) => flowreel::EngineOpts::from_path(path)?,
        None => flowreel::EngineOpts::default(),
    };

    match cli.cmd {
        Command::Layout(args) => cmd_layout(args, opts),
        Command::Timeline(args) => cmd_timeline(args, opts),
        Command::State(args) => cmd_state(args, opts),
        Command::Export(args) => cmd_export(args, opts),
        Command::Play(args) => cmd_play(args, opts),
    }
}

fn load(path: &Path, opts: &flowreel::EngineOpts) -> anyhow::Result<flowreel::Diagram> {
    flowreel::Diagram::from_path(path, &opts.layout)
        .with_context(|| format!("load diagram '{}'", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write JSON to stdout")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_layout(args: LayoutArgs, mut opts: flowreel::EngineOpts) -> anyhow::Result<()> {
    if let Some(o) = args.orientation {
        opts.layout.orientation = match o {
            OrientationChoice::TopToBottom => flowreel::Orientation::TopToBottom,
            OrientationChoice::LeftToRight => flowreel::Orientation::LeftToRight,
        };
    }
    if let Some(seed) = args.seed {
        opts.layout.seed = seed;
    }
    let diagram = load(&args.input.in_path, &opts)?;
    let layout = diagram.layout();
    for skipped in layout.skipped() {
        eprintln!("skipped {:?} layout: {}", skipped.strategy, skipped.failure);
    }
    eprintln!("layout strategy: {:?}", layout.strategy());
    print_json(layout)
}

fn cmd_timeline(args: InputArgs, opts: flowreel::EngineOpts) -> anyhow::Result<()> {
    let diagram = load(&args.in_path, &opts)?;
    print_json(diagram.timeline())
}

fn cmd_state(args: StateArgs, opts: flowreel::EngineOpts) -> anyhow::Result<()> {
    let diagram = load(&args.input.in_path, &opts)?;
    let state = match (args.at.step, args.at.frame) {
        (Some(step), _) => diagram.state(flowreel::Snapshot::Step(step)),
        (None, Some(frame)) => {
            let clock = opts.export.clock()?;
            diagram.state_at_frame(flowreel::FrameIndex(frame), &clock)
        }
        (None, None) => diagram.state(flowreel::Snapshot::Final),
    };
    print_json(&state)
}

fn cmd_export(args: ExportArgs, mut opts: flowreel::EngineOpts) -> anyhow::Result<()> {
    if let Some(d) = args.duration {
        opts.export.duration_secs = d;
    }
    if let Some(fps) = args.fps {
        opts.export.fps = fps;
    }
    if args.parallel {
        opts.threading.parallel = true;
    }
    if args.threads.is_some() {
        opts.threading.threads = args.threads;
    }

    let diagram = load(&args.input.in_path, &opts)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    let mut sink = flowreel::JsonLinesSink::new(BufWriter::new(file));
    let stats = diagram.export_to_sink(&opts.export, &opts.threading, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} states projected)",
        args.out.display(),
        stats.frames_total,
        stats.states_projected
    );
    Ok(())
}

fn cmd_play(args: PlayArgs, mut opts: flowreel::EngineOpts) -> anyhow::Result<()> {
    if let Some(speed) = args.speed {
        opts.playback.speed = speed;
    }
    let diagram = load(&args.input.in_path, &opts)?;
    let mut playback = diagram.playback(&opts.playback)?;
    eprintln!(
        "playing {} step(s) over {:.2}s",
        playback.cues().len(),
        diagram.timeline().total_duration() / opts.playback.speed
    );

    let start = Instant::now();
    let mut out = std::io::stdout().lock();
    loop {
        match playback.poll(start.elapsed().as_secs_f64()) {
            flowreel::Tick::Show { step, state } => {
                serde_json::to_writer(&mut out, &serde_json::json!({ "step": step, "state": state }))?;
                writeln!(out)?;
            }
            flowreel::Tick::Wait { remaining_secs } => {
                out.flush()?;
                std::thread::sleep(Duration::from_secs_f64(remaining_secs));
            }
            flowreel::Tick::Finished { state } => {
                serde_json::to_writer(&mut out, &serde_json::json!({ "final": state }))?;
                writeln!(out)?;
                break;
            }
            flowreel::Tick::Cancelled | flowreel::Tick::Done => break,
        }
    }
    out.flush()?;
    Ok(())
}
