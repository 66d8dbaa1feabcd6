use std::io::Stdout;
use std::path::Path;
use std::time::Instant;

use chrono::Local;
use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{Alert, AlertStats};
use crate::app::upload::{Selection, UploadEvent, UploadMachine};
use crate::app::{handle_input, App};
use crate::ui;

/// Completions from in-flight requests. A result that arrives after
/// the loop is torn down is dropped with the channel, never applied.
#[derive(Debug)]
enum AppEvent {
    AlertsFetched(Result<Vec<Alert>, ApiError>),
    UploadFinished(Result<(), ApiError>),
}

fn spawn_fetch(client: &ApiClient, tx: &mpsc::UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch_alerts().await;
        let _ = tx.send(AppEvent::AlertsFetched(result));
    });
}

fn spawn_upload(client: &ApiClient, tx: &mpsc::UnboundedSender<AppEvent>, selection: Selection) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client
            .upload_image(&selection.path, &selection.file_name, selection.content_type)
            .await;
        let _ = tx.send(AppEvent::UploadFinished(result));
    });
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: ApiClient,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut upload_machine = UploadMachine::new();

    loop {
        let now = Instant::now();

        // Update animations and expire the self-clearing banner
        app.update();
        app.tick_banners(now);

        // Start a fetch when the period elapsed, a refresh was asked
        // for, or the post-upload one-shot came due
        if app.take_fetch_trigger(now) {
            spawn_fetch(&client, &tx);
        }

        // Kick off a requested upload; the machine refuses a second
        // Start while one is in flight
        if app.upload.requested {
            app.upload.requested = false;
            if let Some(selection) = app.upload.selection.clone() {
                if upload_machine
                    .process_event(&UploadEvent::Start, app, now)
                    .is_ok()
                {
                    spawn_upload(&client, &tx, selection);
                }
            }
        }

        // Apply request completions in arrival order (last-write-wins
        // for overlapping fetches, as the service contract allows)
        while let Ok(app_event) = rx.try_recv() {
            let applied_at = Instant::now();
            match app_event {
                AppEvent::AlertsFetched(result) => {
                    app.apply_alerts(result, Local::now());
                }
                AppEvent::UploadFinished(Ok(())) => {
                    let _ = upload_machine.process_event(&UploadEvent::Finished, app, applied_at);
                    let _ = upload_machine.process_event(&UploadEvent::Reset, app, applied_at);
                }
                AppEvent::UploadFinished(Err(err)) => {
                    let _ = upload_machine.process_event(
                        &UploadEvent::Failed(err.to_string()),
                        app,
                        applied_at,
                    );
                    let _ = upload_machine.process_event(&UploadEvent::Reset, app, applied_at);
                }
            }
        }

        // Draw the UI with better error context
        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // Handle events with improved error context
        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events for now
                }
            }
        }
    }

    Ok(())
}

/// Run a single fetch and print a summary (no UI)
pub async fn run_headless(client: &ApiClient, json: bool) -> Result<()> {
    let alerts = client.fetch_alerts().await?;
    let summary = build_headless_summary(&alerts);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_headless_summary(&summary);
    }

    Ok(())
}

/// Run the two-phase upload once and report the outcome (no UI)
pub async fn run_headless_upload(client: &ApiClient, path: &Path) -> Result<()> {
    let selection =
        Selection::from_path(path).map_err(|message| color_eyre::eyre::eyre!(message))?;

    println!(
        "Uploading {} ({:.2} KB, {})...",
        selection.file_name,
        selection.size_kb(),
        selection.content_type
    );

    client
        .upload_image(&selection.path, &selection.file_name, selection.content_type)
        .await?;

    println!("Upload successful. The dashboard will pick up new alerts shortly.");
    Ok(())
}

fn render_headless_summary(summary: &HeadlessSummary) {
    println!("\nCrime Alert Summary");
    println!("===================");
    println!("Total alerts: {}", summary.stats.total);
    println!("High priority: {}", summary.stats.high);
    println!("Normal: {}", summary.stats.normal);
    println!("Fetched at: {}", summary.fetched_at);

    if summary.recent.is_empty() {
        println!("\nNo alerts found.");
        return;
    }

    println!("\nRecent Alerts:");
    for alert in &summary.recent {
        println!(
            "- {} | {} | {} | {}",
            alert.id, alert.level, alert.key, alert.timestamp
        );
    }
}

fn build_headless_summary(alerts: &[Alert]) -> HeadlessSummary {
    let recent = alerts
        .iter()
        .enumerate()
        .take(5)
        .map(|(index, alert)| HeadlessAlert {
            id: alert.display_id(index),
            level: alert.alert_level.as_str().to_string(),
            key: alert.key.clone(),
            timestamp: alert.timestamp.clone(),
        })
        .collect();

    HeadlessSummary {
        stats: AlertStats::collect(alerts),
        fetched_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        recent,
    }
}

#[derive(serde::Serialize)]
struct HeadlessSummary {
    stats: AlertStats,
    fetched_at: String,
    recent: Vec<HeadlessAlert>,
}

#[derive(serde::Serialize)]
struct HeadlessAlert {
    id: String,
    level: String,
    key: String,
    timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::build_headless_summary;
    use crate::api::models::Alert;

    #[test]
    fn summary_caps_recent_alerts_at_five() {
        let alerts: Vec<Alert> = serde_json::from_str(
            r#"[
                {"AlertId":"1","alert_level":"HIGH","key":"gun_01.jpg"},
                {"alert_level":"NORMAL","key":"a.jpg"},
                {"alert_level":"NORMAL","key":"b.jpg"},
                {"alert_level":"NORMAL","key":"c.jpg"},
                {"alert_level":"NORMAL","key":"d.jpg"},
                {"alert_level":"NORMAL","key":"e.jpg"}
            ]"#,
        )
        .unwrap();

        let summary = build_headless_summary(&alerts);
        assert_eq!(summary.stats.total, 6);
        assert_eq!(summary.stats.high, 1);
        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.recent[0].id, "1");
        // Positional fallback when the service omitted the id.
        assert_eq!(summary.recent[1].id, "1");
    }
}
