// App module for the overlay viewer
// Holds UI state around the shared map state and routes input into it

pub mod input;
pub mod state;

pub use input::{handle_key, handle_mouse};
pub use state::{App, InputMode};
