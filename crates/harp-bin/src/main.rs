//! Harp shell entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_input::CrosstermKeys;
use core_repl::{EchoEvaluator, Session};
use core_terminal::{CrosstermTerminal, RawModeGuard};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "harp.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "harp", version, about = "Harp interactive script shell")]
struct Args {
    /// Optional configuration file path (overrides discovery of `harp.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    info!(
        target: "runtime.startup",
        config_override = args.config.is_some(),
        config_found = config.path.is_some(),
        "bootstrap_complete"
    );
    let mut session = Session::from_config(EchoEvaluator, &config);

    if !std::io::stdin().is_terminal() {
        // Redirected input: no editor, the whole stream is one statement.
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        info!(target: "runtime", len = source.len(), "batch_input");
        let mut out = std::io::stdout().lock();
        session.run_batch(&source, &mut out)?;
    } else {
        let mut guard = RawModeGuard::enter()?;
        let mut term = CrosstermTerminal::new();
        let mut keys = CrosstermKeys::new();
        let result = session.run_interactive(&mut term, &mut keys);
        guard.leave()?;
        result?;
    }

    info!(target: "runtime", "shutdown");
    Ok(())
}
