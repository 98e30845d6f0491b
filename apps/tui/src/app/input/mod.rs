mod helpers;
mod keys;
mod mouse;

pub use keys::handle_key;
pub use mouse::handle_mouse;
