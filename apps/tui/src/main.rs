mod api;
mod app;
mod cli;
mod config;
mod domain;
mod event;
mod terminal;
mod ui;

use std::time::Instant;

use app::App;
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = cli::CliArgs::parse();
    args.apply_env_overrides();

    let config = config::init_app_config();
    if config.debug {
        eprintln!(
            "Using API base {} with a {}s poll interval",
            config.base_url,
            config.poll_interval.as_secs()
        );
    }

    let client = api::ApiClient::new(config.base_url.clone())?;

    // One-shot modes bypass the terminal UI entirely
    if let Some(path) = args.upload.as_deref() {
        return event::run_headless_upload(&client, path).await;
    }
    if args.headless_requested() || !is_terminal() {
        return event::run_headless(&client, args.json).await;
    }

    // Initialize application state
    let mut app = App::new(config);
    if args.paused {
        // The initial fetch still happens; only the period is off.
        app.toggle_live(Instant::now());
    }

    // Setup terminal
    let mut terminal = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, client).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    // Return the result
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
