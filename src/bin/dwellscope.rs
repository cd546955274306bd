use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dwellscope::{
    EngineConfig, MotionSchedule, PlaybackObserver as _, PlaybackSession, RecordingObserver,
    SampleStore, TracingObserver,
};

#[derive(Parser, Debug)]
#[command(name = "dwellscope", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play from 0 up to a time and print the frame there as JSON.
    Probe(ProbeArgs),
    /// Stream one JSON snapshot per frame (JSON lines).
    Play(PlayArgs),
    /// Summarize parsed tracks and skipped rows.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Keyframe table (`.csv`) or JSON array of rows (`.json`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine config JSON; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Precomputed motion schedule JSON.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Frame rate of the simulated host loop.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Playback time to stop at, in seconds.
    #[arg(long)]
    time: f64,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Start time in seconds.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// End time in seconds (defaults to the clock duration).
    #[arg(long)]
    to: Option<f64>,

    /// Playback speed multiplier (overrides config).
    #[arg(long)]
    speed: Option<f64>,

    /// Interleave engine events with snapshots.
    #[arg(long, default_value_t = false)]
    events: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Keyframe table (`.csv`) or JSON array of rows (`.json`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine config JSON; only the store section is used.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Play(args) => cmd_play(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => {
            EngineConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_store(path: &Path, cfg: &EngineConfig) -> anyhow::Result<SampleStore> {
    let rows = dwellscope::read_rows_from_path(path)
        .with_context(|| format!("load keyframes '{}'", path.display()))?;
    let (store, skipped) = SampleStore::parse(&rows, &cfg.store);
    for s in &skipped {
        tracing::warn!(row = s.index, reason = %s.reason, "skipped keyframe row");
    }
    Ok(store)
}

fn open_session(
    args: &SessionArgs,
    cfg: &EngineConfig,
) -> anyhow::Result<PlaybackSession<RecordingObserver>> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        anyhow::bail!("--fps must be > 0");
    }
    let store = load_store(&args.in_path, cfg)?;
    let schedule = args
        .schedule
        .as_deref()
        .map(MotionSchedule::from_path)
        .transpose()
        .context("load schedule")?;
    Ok(PlaybackSession::with_parts(
        store,
        schedule,
        cfg,
        RecordingObserver::default(),
    )?)
}

/// Tick at `fps` until `target` is reached, never overshooting it.
fn play_to(
    sess: &mut PlaybackSession<RecordingObserver>,
    target: f64,
    fps: f64,
    mut on_frame: impl FnMut(&mut PlaybackSession<RecordingObserver>) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let target = target.min(sess.clock().duration_sec());
    let frame_dt = 1.0 / fps;
    while sess.time_sec() < target {
        let speed = sess.clock().speed();
        if speed <= 0.0 {
            anyhow::bail!("speed must be > 0 to play forward");
        }
        let remaining = (target - sess.time_sec()) / speed;
        let step = sess.tick(frame_dt.min(remaining));
        on_frame(sess)?;
        if step.delta_sec() <= 0.0 {
            break;
        }
    }
    Ok(())
}

fn forward_events(sess: &mut PlaybackSession<RecordingObserver>) {
    let mut tracer = TracingObserver;
    for e in sess.observer_mut().take() {
        tracer.on_event(&e);
    }
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.session.config.as_deref())?;
    let mut sess = open_session(&args.session, &cfg)?;
    play_to(&mut sess, args.time, args.session.fps, |s| {
        forward_events(s);
        Ok(())
    })?;

    let out = serde_json::to_string_pretty(&sess.snapshot())?;
    println!("{out}");
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.session.config.as_deref())?;
    if let Some(speed) = args.speed {
        cfg.clock.speed = speed;
    }
    let mut sess = open_session(&args.session, &cfg)?;
    sess.set_time(args.from)?;
    sess.observer_mut().take();

    let to = args.to.unwrap_or(cfg.clock.duration_sec);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", serde_json::to_string(&sess.snapshot())?)?;
    play_to(&mut sess, to, args.session.fps, |s| {
        if args.events {
            for e in s.observer_mut().take() {
                writeln!(out, "{}", serde_json::to_string(&e)?)?;
            }
        } else {
            forward_events(s);
        }
        writeln!(out, "{}", serde_json::to_string(&s.snapshot())?)?;
        Ok(())
    })?;
    out.flush().context("flush stdout")?;
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let rows = dwellscope::read_rows_from_path(&args.in_path)
        .with_context(|| format!("load keyframes '{}'", args.in_path.display()))?;
    let (store, skipped) = SampleStore::parse(&rows, &cfg.store);

    let entities: Vec<serde_json::Value> = store
        .iter()
        .map(|(id, track)| {
            let (first, last) = track.span().unzip();
            serde_json::json!({
                "id": id,
                "samples": track.len(),
                "first_sec": first,
                "last_sec": last,
                "classifiable": track.is_classifiable(),
            })
        })
        .collect();
    let report = serde_json::json!({
        "rows": rows.len(),
        "entities": entities,
        "skipped": skipped,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
