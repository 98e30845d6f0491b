use crate::app::state::App;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help || app.map.notice().is_some() {
        return;
    }

    let (column, row) = (mouse.column, mouse.row);
    let over_map = app.projection().cell_to_latlng(column, row).is_some();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if over_map {
                app.click_cell(column, row);
            } else if let Some(index) = app.menu_row_at(column, row) {
                app.select_menu(index);
            }
        }
        MouseEventKind::Moved | MouseEventKind::Drag(_) => app.hover_cell(column, row),
        MouseEventKind::ScrollUp if over_map => app.zoom(1.0),
        MouseEventKind::ScrollDown if over_map => app.zoom(-1.0),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use overlay_core::{DatasetId, MapEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.resize(120, 40);
        app
    }

    #[test]
    fn clicking_a_menu_row_selects_that_layer() {
        let mut app = app();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 3, 5));
        assert_eq!(app.menu_index, 4);
        assert_eq!(app.map.pending(), Some(DatasetId::Training));
    }

    #[test]
    fn two_map_clicks_measure_when_armed() {
        let mut app = app();
        app.dispatch(MapEvent::ActivateMeasure);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 50, 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 90, 30));

        assert_eq!(app.map.measure_markers().len(), 2);
        assert!(app.map.distance_readout().ends_with(" km"));
    }

    #[test]
    fn hover_tracks_the_pointer_over_the_map() {
        let mut app = app();
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 60, 12));
        assert_eq!(app.hover, Some((60, 12)));

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 5, 12));
        assert_eq!(app.hover, None);
    }

    #[test]
    fn scrolling_zooms_only_over_the_map() {
        let mut app = app();
        let zoom = app.map.view().zoom;
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 5, 20));
        assert!((app.map.view().zoom - zoom).abs() < f64::EPSILON);

        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 60, 20));
        assert!((app.map.view().zoom - (zoom + 1.0)).abs() < f64::EPSILON);
    }
}
