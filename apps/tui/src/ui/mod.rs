// UI module for the overlay viewer
// Handles all rendering; state changes live in `app`

pub mod layout;
pub mod screens;
pub mod widgets;

use crate::app::App;
use overlay_core::color::Rgb;
use ratatui::style::Color;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f);
}

pub const fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}
