use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "crimewatch", version, about = "Crime alert dashboard TUI")]
pub struct CliArgs {
    /// Fetch alerts once, print a summary, and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON (implies --headless)
    #[arg(long)]
    pub json: bool,

    /// Upload an image for analysis and exit
    #[arg(long, value_name = "PATH")]
    pub upload: Option<PathBuf>,

    /// Start with live monitoring paused
    #[arg(long)]
    pub paused: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the API base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the poll interval in seconds
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl CliArgs {
    /// `--json` only makes sense without a terminal UI, so it implies
    /// headless on its own.
    pub const fn headless_requested(&self) -> bool {
        self.headless || self.json
    }

    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.base_url {
            std::env::set_var("CRIMEWATCH_API_BASE", url);
        }
        if let Some(secs) = self.interval {
            std::env::set_var("CRIMEWATCH_POLL_SECS", secs.to_string());
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
