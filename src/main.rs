//! Flick spotcheck - fill the screen with solid colors to find bad pixels

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spotcheck::backend;
use spotcheck::config::Config;

#[derive(Parser, Debug)]
#[command(name = "spotcheck")]
#[command(about = "Solid color display inspection for Flick devices", long_about = None)]
struct Args {
    /// Run in a window instead of fullscreen
    #[arg(short, long)]
    windowed: bool,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/flick-spotcheck/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a gesture script headlessly instead of opening a window
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// With --replay, print the final report as JSON
    #[arg(long, requires = "replay")]
    json: bool,
}

fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("flick-spotcheck")
}

fn main() -> Result<()> {
    // Set up panic hook to log panics before crashing
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        let crash_log = state_dir().join("crash.log");
        if let Ok(mut f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&crash_log)
        {
            use std::io::Write;
            let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
        }
    }));

    let log_dir = state_dir();
    std::fs::create_dir_all(&log_dir).ok();

    let args = Args::parse();

    let file_appender = rolling::daily(&log_dir, "spotcheck.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,spotcheck=debug"
    } else {
        "warn,spotcheck=info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    info!(log_path = %log_dir.display(), "Spotcheck starting");

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    if let Some(script_path) = &args.replay {
        info!(script = %script_path.display(), "Running headless replay");
        let script = backend::headless::Script::load(script_path)
            .with_context(|| format!("loading replay script {}", script_path.display()))?;
        let report = backend::headless::run(&config, &script)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for outcome in &report.outcomes {
                println!("{}", outcome);
            }
            println!("final: {} (locked: {}, icons: {})", report.state.color, report.state.locked, report.state.icons_visible);
        }
        return Ok(());
    }

    run_window(&config, args.windowed)
}

#[cfg(feature = "sdl")]
fn run_window(config: &Config, windowed: bool) -> Result<()> {
    info!(windowed, "Running SDL backend");
    Ok(backend::sdl::run(config, windowed)?)
}

#[cfg(not(feature = "sdl"))]
fn run_window(_config: &Config, _windowed: bool) -> Result<()> {
    anyhow::bail!("built without the `sdl` feature; only --replay is available")
}
