// Export the non-UI modules for use in the binary and tests
pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
