mod app;
mod fetch;
mod pointer;
mod ui;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use app::WebApp;
use overlay_core::domain::DEFAULT_DATA_BASE_URL;
use overlay_core::{catalog, Effect, MapEvent};
use ratzilla::event::{KeyCode, KeyEvent};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

type Shared = Rc<RefCell<WebApp>>;

fn main() -> io::Result<()> {
    let app: Shared = Rc::new(RefCell::new(WebApp::new()));

    spawn_layer_loads(&app);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = app.clone();
        move |event| {
            let effects = {
                let mut state = app.borrow_mut();
                handle_key(&mut state, &event);
                state.take_effects()
            };
            start_effects(&app, effects);
        }
    });

    terminal.draw_web(move |f| {
        app.borrow_mut().resize(f.area());
        ui::render(&app.borrow(), f);
    });

    Ok(())
}

/// One fetch per dataset, all started up front.
fn spawn_layer_loads(app: &Shared) {
    for descriptor in catalog(DEFAULT_DATA_BASE_URL) {
        if !app.borrow_mut().map.begin_load(descriptor.id) {
            continue;
        }
        let app = app.clone();
        spawn_local(async move {
            let event = fetch::load_layer(&descriptor).await;
            app.borrow_mut().receive(event);
        });
    }
}

fn start_effects(app: &Shared, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Geocode(query) => {
                let app = app.clone();
                spawn_local(async move {
                    let event = fetch::geocode(&query).await;
                    app.borrow_mut().receive(event);
                });
            }
        }
    }
}

fn handle_key(app: &mut WebApp, event: &KeyEvent) {
    if app.map.notice().is_some() {
        if matches!(event.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dispatch(MapEvent::DismissNotice);
        }
        return;
    }

    if app.searching {
        match event.code {
            KeyCode::Char(c) => app.search_input.push(c),
            KeyCode::Backspace => {
                app.search_input.pop();
            }
            KeyCode::Enter => app.submit_search(),
            KeyCode::Esc => app.cancel_search(),
            _ => {}
        }
        return;
    }

    match event.code {
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('0') => app.reset_view(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select_menu(digit as usize - 1);
            }
        }
        KeyCode::Tab => app.next_menu(),
        KeyCode::Enter => app.select_menu(app.menu_index),
        KeyCode::Char('m') => app.dispatch(MapEvent::ActivateMeasure),
        KeyCode::Char('r') => app.dispatch(MapEvent::ResetDistance),
        KeyCode::Char(' ') => app.click_pointer(),
        KeyCode::Left => app.move_pointer(-1, 0),
        KeyCode::Right => app.move_pointer(1, 0),
        KeyCode::Up => app.move_pointer(0, -1),
        KeyCode::Down => app.move_pointer(0, 1),
        KeyCode::Char('h') => app.pan(-1.0, 0.0),
        KeyCode::Char('l') => app.pan(1.0, 0.0),
        KeyCode::Char('k') => app.pan(0.0, 1.0),
        KeyCode::Char('j') => app.pan(0.0, -1.0),
        KeyCode::Char('+' | '=') => app.zoom(1.0),
        KeyCode::Char('-') => app.zoom(-1.0),
        KeyCode::Esc => app.pointer_left(),
        _ => {}
    }
}
