use crate::app::App;
use crate::ui::layout::main_layout;
use crate::ui::screens::help::render_help_popup;
use crate::ui::widgets::bar::render_bottom_bar;
use crate::ui::widgets::info::render_info_panel;
use crate::ui::widgets::legend::render_legend;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::menu::render_layer_menu;
use crate::ui::widgets::popup::render_notice;
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let layout = main_layout(area, app.map.info_visible());

    render_layer_menu(app, f, layout.menu);
    render_legend(app, f, layout.legend);
    if let Some(info) = layout.info {
        render_info_panel(app, f, info);
    }
    render_map(app, f, layout.map);
    render_bottom_bar(app, f, layout.bottom_bar);

    if app.show_help {
        render_help_popup(f, area);
    }

    if let Some(notice) = app.map.notice() {
        render_notice(notice, f, area);
    }
}
