use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "overlay_tui=info,overlay_core=info";
const DEBUG_DIRECTIVES: &str = "overlay_tui=debug,overlay_core=debug";

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug {
            DEBUG_DIRECTIVES
        } else {
            DEFAULT_DIRECTIVES
        })
    })
}

/// Sends logs to `path`; the terminal belongs to the UI while it runs.
pub fn init_file_logging(path: &Path, debug: bool) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

pub fn init_stderr_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .init();
}
