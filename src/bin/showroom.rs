use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use showroom::headless::{self, Call};
use showroom::{
    CategoryKind, DemoSession, Fps, FsLoader, LifecycleState, SchemaStore, SessionConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "showroom", version)]
struct Cli {
    /// Log lifecycle and palette decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a configuration schema.
    Validate(ValidateArgs),
    /// Drive a headless session and print every collaborator call.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Configuration schema JSON.
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration schema JSON (overrides the config's `schema_path`).
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Session config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Give up after this many frames.
    #[arg(long, default_value_t = 1200)]
    frames: u64,

    /// Length of the scripted cinematic in milliseconds.
    #[arg(long, default_value_t = 6000.0)]
    cinematic_ms: f64,

    /// Press "skip intro" on this frame (if still in the cinematic).
    #[arg(long)]
    skip_at_frame: Option<u64>,

    /// Palette selection `<tab>:<swatch index>`, applied in order once interactive.
    #[arg(long = "select")]
    selections: Vec<Selection>,
}

#[derive(Clone, Debug)]
struct Selection {
    tab: String,
    index: usize,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tab, index) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected <tab>:<index>, got '{s}'"))?;
        let index = index
            .trim()
            .parse()
            .map_err(|e| format!("bad swatch index in '{s}': {e}"))?;
        Ok(Self {
            tab: tab.trim().to_owned(),
            index,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let schema = SchemaStore::load(&args.schema)
        .with_context(|| format!("validate schema '{}'", args.schema.display()))?;

    for cat in &schema.categories {
        let kind = match cat.kind {
            CategoryKind::Color => "color",
            CategoryKind::Design => "design",
        };
        let default = cat
            .default_option()
            .map(|o| o.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<16} {:<6} {:<16} {} options, default {}",
            cat.id,
            kind,
            if cat.target.is_empty() { "-" } else { cat.target.as_str() },
            cat.options.len(),
            default
        );
    }
    match schema.cascade_pair() {
        Some((source, follower)) => println!("cascade {} -> {}", source.id, follower.id),
        None => println!("cascade inactive"),
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("load session config '{}'", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(schema) = &args.schema {
        cfg.schema_path = schema.clone();
    }
    let fps = Fps::new(args.fps, 1)?;
    let dt = fps.frame_duration_ms();
    let settle_frames = fps.ms_to_frames_ceil(f64::from(
        cfg.mask_fade_ms
            .max(cfg.audio_fade_out_ms)
            .max(cfg.welcome_fade_ms),
    )) + 1;

    let asset_root = cfg
        .schema_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let loader = FsLoader::new(asset_root, cfg.assets.clone());
    let (collab, transcript) =
        headless::collaborators(Box::new(loader), args.cinematic_ms, cfg.fade_ease);

    let mut session = DemoSession::new(cfg, collab)?;
    let log = transcript.clone();
    session.on_transition(move |t| log.push(Call::Transition(t)));

    let mut interactive_since = None;
    for frame in 0..args.frames {
        session.tick(dt)?;
        match session.state() {
            LifecycleState::LoadError => break,
            LifecycleState::Ready => {
                session.start_demo();
            }
            LifecycleState::Cinematic => {
                if args.skip_at_frame.is_some_and(|f| frame >= f) {
                    session.skip_intro()?;
                }
            }
            LifecycleState::Interactive => {
                let since = *interactive_since.get_or_insert(frame);
                if frame - since >= settle_frames {
                    break;
                }
            }
            LifecycleState::Loading => {}
        }
    }

    if session.state() == LifecycleState::Interactive {
        for sel in &args.selections {
            session
                .palette_mut()
                .choose(&sel.tab, sel.index)
                .with_context(|| format!("select {}:{}", sel.tab, sel.index))?;
        }
    }

    for call in transcript.calls() {
        println!("{call}");
    }
    println!("frames {}", session.frame().0);
    println!("state {:?}", session.state());
    if let Some(fps) = session.profiler().and_then(|p| p.fps()) {
        println!("fps {fps:.1}");
    }

    match session.state() {
        LifecycleState::Interactive => Ok(()),
        LifecycleState::LoadError => anyhow::bail!("session failed to load"),
        other => anyhow::bail!("session stopped in {other:?} after {} frames", args.frames),
    }
}
