mod app;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use color_eyre::Result;
use overlay_tui::cli::CliArgs;
use overlay_tui::config::init_app_config;
use overlay_tui::loader::Loader;
use overlay_tui::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config();
    let loader = Loader::new(config.geocoder_url.clone())?;

    // Without a terminal there is nothing to draw on
    if args.headless || !is_terminal() {
        logging::init_stderr_logging(config.debug);
        return event::run_headless(&loader, &config, args.layer, args.json).await;
    }

    logging::init_file_logging(&config.log_file, config.debug)?;
    tracing::info!(data = %config.data_base_url, geocoder = %config.geocoder_url, "Starting viewer");

    let mut app = App::new();
    if let Some(layer) = args.layer {
        app.select_menu(layer.index());
    }

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, &loader, &config).await;
    terminal::cleanup_terminal_state(true, true);

    if let Err(e) = &result {
        tracing::error!("Viewer exited with error: {e}");
    }
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
