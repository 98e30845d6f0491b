use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use overlay_core::{catalog, Effect, MapEvent};
use overlay_tui::config::Config;
use overlay_tui::loader::{spawn_geocode, spawn_layer_loads, Loader};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::app::{handle_key, handle_mouse, App};
use crate::ui;

// Configure event poll timeout (ms)
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    loader: &Loader,
    config: &Config,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<MapEvent>();

    // Every dataset is requested once, up front
    spawn_layer_loads(loader, catalog(&config.data_base_url), &mut app.map, &tx);

    let size = terminal.size()?;
    app.resize(size.width, size.height);

    while app.running {
        app.update();

        // Completions from background fetches
        while let Ok(completed) = rx.try_recv() {
            app.receive(completed);
        }
        start_effects(app, loader, &tx);

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            Event::Resize(width, height) => app.resize(width, height),
            _ => {}
        }
    }

    tracing::info!("Viewer closed");
    Ok(())
}

fn start_effects(app: &mut App, loader: &Loader, tx: &UnboundedSender<MapEvent>) {
    for effect in app.take_effects() {
        match effect {
            Effect::Geocode(query) => spawn_geocode(loader, query, tx),
        }
    }
}
