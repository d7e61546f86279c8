use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use gazeguard_core::engagement::domain::engagement_config::EngagementConfig;
use gazeguard_core::engagement::domain::engagement_evaluator::GazeEngagementEvaluator;
use gazeguard_core::engagement::domain::focus_zone::compute_focus_zone;
use gazeguard_core::engagement::infrastructure::thread_alert_scheduler::ThreadAlertScheduler;
use gazeguard_core::gaze::domain::face_annotations::FaceAnnotations;
use gazeguard_core::gaze::domain::iris_gaze_classifier::IrisGazeClassifier;
use gazeguard_core::monitor::engagement_monitor::EngagementMonitor;
use gazeguard_core::monitor::infrastructure::gaze_trace::{read_trace, TraceEvent};
use gazeguard_core::monitor::infrastructure::trace_gaze_source::TraceGazeSource;
use gazeguard_core::monitor::trace_replay::replay_trace;
use gazeguard_core::orientation::domain::face_orientation::{
    facing_angle_degrees, is_focused_by_angle, rotation_by_width,
};
use gazeguard_core::recognition::domain::face_matcher::{flatten_keypoints, FaceMatcher};
use gazeguard_core::shared::constants::{KEYPOINT_MATCH_THRESHOLD, TRACE_EXTENSIONS};
use gazeguard_core::shared::point::Point;

mod config;

/// Gaze engagement, face orientation and face match checks.
#[derive(Parser)]
#[command(name = "gazeguard")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON settings file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Focus zone size as a fraction of the viewport (0.0-1.0).
    #[arg(long, global = true)]
    focus_fraction: Option<f64>,

    /// Sustained-outside time before a disengagement alert, in ms.
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Sampling cadence for `watch`, in ms.
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Face match distance threshold.
    #[arg(long, global = true)]
    match_threshold: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded gaze trace in virtual time and report alerts.
    Replay(ReplayArgs),
    /// Play a gaze trace back in real time, one sample per poll interval,
    /// until the trace ends or `--duration-ms` elapses.
    Watch(WatchArgs),
    /// Print the focus zone for a viewport.
    Zone(ViewportArgs),
    /// Classify face orientation from jaw and eye midpoints.
    Orientation {
        /// Jaw midpoint as `x,y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        jaw: Point,
        /// Eyes midpoint as `x,y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        eyes: Point,
    },
    /// Classify face rotation from cheek widths in a mirrored frame.
    Rotation {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        left_cheek: Point,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        right_cheek: Point,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        midway: Point,
        #[arg(long)]
        frame_width: f64,
    },
    /// Classify iris gaze direction for each frame of face annotations
    /// (JSON lines, one array of faces per frame).
    Iris {
        input: PathBuf,
        #[arg(long, default_value = "500")]
        frame_width: f64,
    },
    /// Compare a probe embedding against a reference (JSON arrays).
    Match {
        reference: PathBuf,
        probe: PathBuf,
        /// Inputs are arrays of `{x, y}` keypoints instead of descriptors.
        #[arg(long)]
        keypoints: bool,
    },
}

#[derive(Args)]
struct ViewportArgs {
    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<f64>,
    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<f64>,
}

#[derive(Args)]
struct ReplayArgs {
    /// Gaze trace (JSON lines).
    trace: PathBuf,
    #[command(flatten)]
    viewport: ViewportArgs,
    /// Time to keep the clock running after the last event, in ms
    /// (defaults to the debounce delay).
    #[arg(long)]
    settle_ms: Option<u64>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// Gaze trace (JSON lines).
    trace: PathBuf,
    #[command(flatten)]
    viewport: ViewportArgs,
    /// Stop watching after this many ms even if samples remain.
    #[arg(long)]
    duration_ms: Option<u64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = config::Overrides {
        focus_fraction: cli.focus_fraction,
        debounce_ms: cli.debounce_ms,
        poll_interval_ms: cli.poll_interval_ms,
        match_threshold: cli.match_threshold,
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Command::Replay(args) => run_replay(&args, &config),
        Command::Watch(args) => run_watch(&args, &config),
        Command::Zone(viewport) => run_zone(&viewport, &config),
        Command::Orientation { jaw, eyes } => {
            let angle = facing_angle_degrees(jaw, eyes);
            let label = if is_focused_by_angle(jaw, eyes) {
                "focused"
            } else {
                "not focused"
            };
            println!("angle {angle:.2} deg: {label}");
            Ok(())
        }
        Command::Rotation {
            left_cheek,
            right_cheek,
            midway,
            frame_width,
        } => {
            let rotation = rotation_by_width(left_cheek, right_cheek, midway, frame_width);
            println!("{rotation:?}");
            Ok(())
        }
        Command::Iris { input, frame_width } => run_iris(&input, frame_width),
        Command::Match {
            reference,
            probe,
            keypoints,
        } => run_match(&reference, &probe, keypoints, cli.match_threshold, &config),
    }
}

fn run_replay(args: &ReplayArgs, config: &EngagementConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_trace_path(&args.trace)?;
    let viewport = viewport_of(&args.viewport)?;
    let events = read_trace(&args.trace)?;
    let settle = Duration::from_millis(args.settle_ms.unwrap_or(config.debounce_ms));

    let report = replay_trace(&events, config, viewport, settle)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for at in &report.alerts_ms {
            println!("{at:>8}ms  disengagement alert");
        }
        println!(
            "{} samples ({} engaged, {} disengaged), {} alerts, {}ms replayed",
            report.samples,
            report.engaged_samples,
            report.disengaged_samples,
            report.alerts_ms.len(),
            report.end_ms
        );
    }
    Ok(())
}

fn run_watch(args: &WatchArgs, config: &EngagementConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_trace_path(&args.trace)?;
    let events = read_trace(&args.trace)?;
    let viewport = viewport_of(&args.viewport)?
        .or_else(|| first_viewport(&events))
        .ok_or("No viewport: pass --width/--height or add a viewport event to the trace")?;

    let evaluator = GazeEngagementEvaluator::from_config(
        Box::new(ThreadAlertScheduler::new()),
        config,
        || println!("Please focus on the screen!"),
    );
    let source = TraceGazeSource::new(&events);
    let mut monitor = EngagementMonitor::new(
        Box::new(source),
        evaluator,
        viewport,
        config.focus_fraction,
    );

    // Without --duration-ms the run ends when the trace is exhausted.
    let cancelled = Arc::new(AtomicBool::new(false));
    if let Some(limit) = args.duration_ms {
        let flag = Arc::clone(&cancelled);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(limit));
            flag.store(true, Ordering::Relaxed);
        });
    }
    let evaluated = monitor.run(config.poll_interval(), &cancelled)?;
    log::info!("Watched {evaluated} samples");
    Ok(())
}

fn run_zone(args: &ViewportArgs, config: &EngagementConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = viewport_of(args)?.ok_or("--width and --height are required")?;
    let zone = compute_focus_zone(width, height, config.focus_fraction);
    println!(
        "center ({}, {}), {}x{}, x in ({}, {}), y in ({}, {})",
        zone.center_x,
        zone.center_y,
        zone.width,
        zone.height,
        zone.left(),
        zone.right(),
        zone.top(),
        zone.bottom()
    );
    Ok(())
}

fn run_iris(input: &Path, frame_width: f64) -> Result<(), Box<dyn std::error::Error>> {
    if frame_width <= 0.0 {
        return Err(format!("Frame width must be positive, got {frame_width}").into());
    }
    let text = fs::read_to_string(input)
        .map_err(|e| format!("Cannot read {}: {e}", input.display()))?;

    let mut classifier = IrisGazeClassifier::new(frame_width);
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let faces: Vec<FaceAnnotations> = serde_json::from_str(line)
            .map_err(|e| format!("line {}: {e}", index + 1))?;
        match classifier.observe_frame(&faces) {
            Some(event) => println!("{event}"),
            None => println!("-"),
        }
    }
    Ok(())
}

fn run_match(
    reference: &Path,
    probe: &Path,
    keypoints: bool,
    threshold_flag: Option<f64>,
    config: &EngagementConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let verdict = if keypoints {
        let reference: Vec<Point> = read_json(reference)?;
        let probe: Vec<Point> = read_json(probe)?;
        let threshold = threshold_flag.unwrap_or(KEYPOINT_MATCH_THRESHOLD);
        FaceMatcher::new(flatten_keypoints(&reference), threshold).verify_keypoints(&probe)?
    } else {
        let reference: Vec<f64> = read_json(reference)?;
        let probe: Vec<f64> = read_json(probe)?;
        FaceMatcher::new(reference, config.match_threshold).verify(&probe)?
    };

    let label = if verdict.verified {
        "verified"
    } else {
        "not recognized"
    };
    println!("distance {:.4}: {label}", verdict.distance);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

fn validate_trace_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Trace file not found: {}", path.display()).into());
    }
    if !is_trace(path) {
        log::warn!(
            "{} does not have a {} extension, reading as JSON lines anyway",
            path.display(),
            TRACE_EXTENSIONS.join("/")
        );
    }
    Ok(())
}

fn viewport_of(args: &ViewportArgs) -> Result<Option<(f64, f64)>, Box<dyn std::error::Error>> {
    match (args.width, args.height) {
        (Some(w), Some(h)) => Ok(Some((w, h))),
        (None, None) => Ok(None),
        _ => Err("--width and --height must be given together".into()),
    }
}

fn first_viewport(events: &[TraceEvent]) -> Option<(f64, f64)> {
    events
        .iter()
        .find_map(|e| e.viewport)
        .map(|[w, h]| (w, h))
}

fn is_trace(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TRACE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{s}'"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(Point::new(x, y))
}
