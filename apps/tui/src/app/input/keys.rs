use crate::app::input::helpers::{digit_index, wrap_decrement, wrap_increment};
use crate::app::state::{App, InputMode, PAN_STEP_CELLS};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use overlay_core::{DatasetId, MapEvent};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // Notices block everything else until dismissed.
    if app.map.notice().is_some() {
        handle_notice_input(app, key.code);
        return;
    }

    if handle_help_toggle(app, key.code) {
        return;
    }

    match app.input_mode {
        InputMode::Search => handle_search_input(app, key.code),
        InputMode::Browse => handle_browse_input(app, key.code),
    }
}

fn handle_notice_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.dispatch(MapEvent::DismissNotice),
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    let toggle = key == KeyCode::F(1)
        || (key == KeyCode::Char('?') && app.input_mode == InputMode::Browse);
    if toggle {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.search_input.push(c),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => {
            app.search_input.clear();
            app.input_mode = InputMode::Browse;
        }
        _ => {}
    }
}

fn handle_browse_input(app: &mut App, key: KeyCode) {
    let menu_len = DatasetId::ALL.len();
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Up => app.menu_index = wrap_decrement(app.menu_index, menu_len),
        KeyCode::Down => app.menu_index = wrap_increment(app.menu_index, menu_len),
        KeyCode::Enter => app.select_menu(app.menu_index),
        KeyCode::Char('0') => app.reset_view(),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(index) = digit_index(c) {
                app.select_menu(index);
            }
        }
        KeyCode::Char('/') => app.input_mode = InputMode::Search,
        KeyCode::Char('m') => app.dispatch(MapEvent::ActivateMeasure),
        KeyCode::Char(' ') => app.click_center(),
        KeyCode::Char('r') => app.dispatch(MapEvent::ResetDistance),
        KeyCode::Char('h') | KeyCode::Left => app.pan(-PAN_STEP_CELLS, 0.0),
        KeyCode::Char('l') | KeyCode::Right => app.pan(PAN_STEP_CELLS, 0.0),
        KeyCode::Char('k') => app.pan(0.0, PAN_STEP_CELLS),
        KeyCode::Char('j') => app.pan(0.0, -PAN_STEP_CELLS),
        KeyCode::Char('+' | '=') => app.zoom(1.0),
        KeyCode::Char('-') => app.zoom(-1.0),
        KeyCode::Esc => app.dispatch(MapEvent::PointerLeft),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::distance::Cursor;
    use overlay_core::search::GeocodeResult;
    use overlay_core::Effect;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        let mut app = App::new();
        app.resize(120, 40);
        app
    }

    #[test]
    fn arrows_wrap_through_the_menu() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.menu_index, 6);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.menu_index, 0);
    }

    #[test]
    fn digit_keys_select_layers() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.menu_index, 2);
        assert_eq!(app.map.pending(), Some(DatasetId::Roads));
    }

    #[test]
    fn typing_a_search_ends_in_a_geocode_request() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        for c in "Galle".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Browse);
        assert_eq!(app.take_effects(), vec![Effect::Geocode("Galle".to_string())]);
    }

    #[test]
    fn q_is_text_while_searching() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.search_input, "q");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn notice_swallows_keys_until_dismissed() {
        let mut app = app();
        app.receive(MapEvent::SearchResolved(Ok(Vec::<GeocodeResult>::new())));
        assert!(app.map.notice().is_some());

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.map.cursor(), Cursor::Default);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.map.notice(), None);
    }

    #[test]
    fn measuring_from_the_keyboard() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.map.cursor(), Cursor::Crosshair);

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.map.measure_line().is_some());
        assert_ne!(app.map.distance_readout(), "Distance: -");

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.map.distance_readout(), "Distance: -");
        assert!(app.map.measure_markers().is_empty());
    }

    #[test]
    fn help_toggles_and_blocks_other_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = app();
        app.input_mode = InputMode::Search;
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}
