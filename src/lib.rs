pub mod error;
pub mod models;
pub mod services;

pub use error::{AnalysisError, EngineResult};
pub use models::{AnalysisReport, AnalysisResult, Category, OverallScores, Segment, SegmentOffsets, Strategy};
pub use services::{analyze, analyze_seeded, analyze_text, AnalyzeOptions, RandomSource, ScriptedSource};

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use services::ConfigStore;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "origincheck_";
const LOGS_KEPT: usize = 30;
const EMPTY_INPUT_NOTICE: &str = "Please enter some text to analyze.";
const FAILURE_NOTICE: &str = "Analysis failed. Please try again.";

fn env_truthy(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Initialize logging with one timestamped log file per session.
/// Console output goes to stderr so stdout stays clean for JSON.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env_truthy("ORIGINCHECK_DISABLE_FILE_LOG") {
        init_console_only_logging(env_filter);
        return;
    }

    let logs_dir = match std::env::var("ORIGINCHECK_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("{}{}.log", LOG_PREFIX, timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    info!(log_file = %logs_dir.join(&log_filename).display(), version = env!("CARGO_PKG_VERSION"), "logging.initialized");

    std::thread::spawn(move || {
        cleanup_old_logs(&logs_dir, LOGS_KEPT);
    });
}

fn get_logs_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("origincheck").join("logs");
    }
    PathBuf::from("logs")
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with(LOG_PREFIX) && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

// ============ Command Line ============

const USAGE: &str = "Usage:\n  origincheck [<path>|-] [--strategy word-run|sentence] [--seed <n>] [--json] [--out <json_path>] [--save-defaults]\n\nNotes:\n  - Reads stdin when no path (or `-`) is given.\n  - Flags override the saved config; `--save-defaults` stores strategy and seed.\n  - ORIGINCHECK_DISABLE_FILE_LOG=1 keeps logs on the console only.";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input: Option<String>,
    strategy: Option<Strategy>,
    seed: Option<u64>,
    json: bool,
    out: Option<String>,
    save_defaults: bool,
    help: bool,
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    const VALUE_FLAGS: [&str; 3] = ["--strategy", "--seed", "--out"];
    const SWITCHES: [&str; 4] = ["--json", "--save-defaults", "--help", "-h"];

    let strategy = parse_arg_value(args, "--strategy")
        .map(|s| s.parse::<Strategy>())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let seed = parse_arg_value(args, "--seed")
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid --seed '{}'", s)))
        .transpose()?;

    let mut input = None;
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if SWITCHES.contains(&arg.as_str()) {
            continue;
        }
        if arg != "-" && arg.starts_with('-') {
            bail!("unknown option '{}'\n\n{}", arg, USAGE);
        }
        input.get_or_insert_with(|| arg.clone());
    }

    Ok(CliArgs {
        input,
        strategy,
        seed,
        json: has_flag(args, "--json"),
        out: parse_arg_value(args, "--out"),
        save_defaults: has_flag(args, "--save-defaults"),
        help: has_flag(args, "--help") || has_flag(args, "-h"),
    })
}

fn read_input(input: Option<&str>) -> anyhow::Result<String> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin failed")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("read file failed: {}", path)),
    }
}

/// Human-readable rendering: overview, then per-segment detail and sources.
pub fn render_text(result: &AnalysisResult, preview_chars: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Original Content         {:>3}%\n", result.overall.original_score));
    out.push_str(&format!("AI Generated             {:>3}%\n", result.overall.ai_score));
    out.push_str(&format!("Potentially Plagiarized  {:>3}%\n", result.overall.plagiarism_score));
    out.push_str("\nDetailed Analysis:\n");
    for (i, seg) in result.segments.iter().enumerate() {
        out.push_str(&format!(
            "[S{:04}] {:<12} {:>3}%  {}\n",
            i,
            seg.category.label(),
            (seg.confidence * 100.0).round() as u32,
            seg.preview(preview_chars)
        ));
        if let Some(sources) = &seg.sources {
            out.push_str(&format!("        Sources: {}\n", sources.join(", ")));
        }
    }

    let mut sourced = result.sourced_segments().peekable();
    if sourced.peek().is_some() {
        out.push_str("\nPotential sources found for plagiarized content:\n");
        for seg in sourced {
            let sources = seg.sources.as_deref().unwrap_or_default();
            out.push_str(&format!("  {}  \"{}\"\n", sources.join(", "), seg.preview(100)));
        }
    }
    out
}

fn execute(args: &[String]) -> anyhow::Result<()> {
    let cli = parse_args(args)?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let store = ConfigStore::default_config_dir().map(ConfigStore::new);
    let config = match &store {
        Some(store) => store.load().unwrap_or_else(|e| {
            warn!(error = %e, "config.load_failed");
            Default::default()
        }),
        None => Default::default(),
    };

    let strategy = cli.strategy.unwrap_or(config.analysis.strategy);
    let seed = cli.seed.or(config.analysis.seed);

    if cli.save_defaults {
        let Some(store) = &store else {
            bail!("no config directory available on this platform");
        };
        store.set_strategy(strategy).map_err(anyhow::Error::msg)?;
        store.set_seed(seed).map_err(anyhow::Error::msg)?;
        info!(path = %store.config_file().display(), "config.saved");
    }

    let text = read_input(cli.input.as_deref())?;
    info!(chars = text.chars().count(), strategy = %strategy, seeded = seed.is_some(), "cli.input_loaded");

    let analysis = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            analyze(&text, AnalyzeOptions::with_strategy(strategy).rng(&mut rng))
        }
        None => analyze(&text, AnalyzeOptions::with_strategy(strategy)),
    };

    let result = match analysis {
        Ok(result) => result,
        Err(AnalysisError::InvalidInput) => {
            eprintln!("{}", EMPTY_INPUT_NOTICE);
            bail!(AnalysisError::InvalidInput);
        }
        Err(e) => {
            error!(error = %e, "analysis.failed");
            eprintln!("{}", FAILURE_NOTICE);
            return Err(e.into());
        }
    };

    let report = AnalysisReport::new(result, strategy, seed);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report.result, config.analysis.preview_chars));
    }

    if let Some(out_path) = cli.out {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path))?;
        info!(path = %out_path, request_id = %report.request_id, "report.written");
    }

    Ok(())
}

/// Binary entry point
pub fn run() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    execute(&args)
}
