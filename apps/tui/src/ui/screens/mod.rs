pub mod help;
pub mod main;
