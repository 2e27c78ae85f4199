use std::{collections::HashSet, io::Write as _, path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use signage::{
    DisplayEngine, EngineConfig, HostSimulator, ManualClock, Project, PublishCode, ScaleMode,
    Simulation, SimulatorOptions, SystemClock, TimePoint,
};

#[derive(Parser, Debug)]
#[command(name = "signage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a project document.
    Validate(ValidateArgs),
    /// Print the composed frame of a project as JSON.
    Layout(LayoutArgs),
    /// Play a project against a simulated host and print every transition as a JSON line.
    Simulate(SimulateArgs),
    /// Print a freshly generated publish code.
    PublishCode,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Pixels per canvas unit. Percent mapping is used when omitted.
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated playback length.
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Simulation step.
    #[arg(long, default_value_t = 100)]
    step_ms: u64,

    /// Source that fails to load (repeatable).
    #[arg(long)]
    fail: Vec<String>,

    /// Length of every simulated video.
    #[arg(long, default_value_t = signage::player::simulator::DEFAULT_VIDEO_SECONDS)]
    video_seconds: f64,

    /// Refuse unmuted autoplay.
    #[arg(long, default_value_t = false)]
    block_autoplay: bool,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::PublishCode => cmd_publish_code(),
    }
}

fn load_project(path: &std::path::Path) -> anyhow::Result<Project> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read project '{}'", path.display()))?;
    let project = Project::from_json_str(&s)
        .with_context(|| format!("parse project '{}'", path.display()))?;
    project
        .validate()
        .with_context(|| format!("validate project '{}'", path.display()))?;
    Ok(project)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let mut counts = std::collections::BTreeMap::new();
    for element in &project.elements {
        *counts.entry(element.element_type().as_str()).or_insert(0usize) += 1;
    }
    println!(
        "ok: '{}' {} {}x{}, {} elements",
        project.name,
        project.ratio,
        project.canvas_width,
        project.canvas_height,
        project.elements.len()
    );
    for (ty, n) in counts {
        println!("  {ty}: {n}");
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let mut engine = DisplayEngine::new(SystemClock::new(), EngineConfig::default());
    if let Some(scale) = args.scale {
        engine.set_scale_mode(ScaleMode::Pixel { scale })?;
    }
    engine.load_project(&project)?;
    let frame = engine.frame()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &frame).context("write frame json")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let length = Duration::try_from_secs_f64(args.seconds)
        .context("--seconds must be finite and >= 0")?;

    let clock = ManualClock::new();
    let mut engine = DisplayEngine::new(clock.clone(), config);
    engine.load_project(&project)?;
    let host = HostSimulator::new(SimulatorOptions {
        fail: args.fail.into_iter().collect::<HashSet<_>>(),
        video_seconds: args.video_seconds,
        block_autoplay: args.block_autoplay,
    });
    let mut sim = Simulation::new(engine, clock, host);

    let until = TimePoint::ZERO.after(length);
    let transitions = sim.run_until(until, Duration::from_millis(args.step_ms));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for t in &transitions {
        serde_json::to_writer(&mut out, t).context("write transition json")?;
        writeln!(out)?;
    }
    tracing::info!(transitions = transitions.len(), "simulation finished");
    Ok(())
}

fn cmd_publish_code() -> anyhow::Result<()> {
    let code = PublishCode::generate(&mut rand::rngs::OsRng);
    println!("{code}");
    Ok(())
}
