pub mod bar;
pub mod info;
pub mod legend;
pub mod map;
pub mod menu;
pub mod popup;
