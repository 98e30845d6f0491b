use clap::{CommandFactory, Parser};
use overlay_core::DatasetId;

#[derive(Debug, Parser)]
#[command(name = "overlay-viewer", version, about = "Thematic overlay map viewer")]
pub struct CliArgs {
    /// Load every dataset, print a summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the base URL the GeoJSON files are fetched from
    #[arg(long = "data-url", value_name = "URL")]
    pub data_url: Option<String>,

    /// Override the geocoding endpoint
    #[arg(long = "geocoder-url", value_name = "URL")]
    pub geocoder_url: Option<String>,

    /// Override the log file path
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Layer to select on startup
    #[arg(long, value_name = "KEY")]
    pub layer: Option<DatasetId>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.data_url {
            std::env::set_var("OVERLAY_DATA_BASE_URL", url);
        }
        if let Some(url) = &self.geocoder_url {
            std::env::set_var("OVERLAY_GEOCODER_URL", url);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("OVERLAY_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
