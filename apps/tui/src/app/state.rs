use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::api::error::ApiError;
use crate::api::models::{Alert, AlertStats};
use crate::app::poll::PollSchedule;
use crate::app::upload::Selection;
use crate::config::AppConfig;

/// How long the upload success banner stays up before clearing itself.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);

/// Delay before the single follow-up fetch after a successful upload,
/// giving the backend time to run detection on the new image.
pub const REPOLL_DELAY: Duration = Duration::from_secs(3);

/// Transient client-side upload bookkeeping. Lives from file
/// selection until an explicit clear, a completed upload, or a new
/// selection replacing it.
#[derive(Debug, Default)]
pub struct UploadState {
    pub selection: Option<Selection>,
    pub uploading: bool,
    pub success_until: Option<Instant>,
    pub error: Option<String>,
    pub entering_path: bool,
    pub path_input: String,
    pub requested: bool,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub alerts: Vec<Alert>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_update: Option<DateTime<Local>>,
    pub live: bool,
    pub poll: PollSchedule,
    pub refresh_requested: bool,
    /// One-shot re-poll deadline armed by a successful upload.
    pub repoll_at: Option<Instant>,
    pub upload: UploadState,
    pub selected_alert: usize,
    pub show_help: bool,
    pub animation_counter: f64,
    pub last_frame: Instant,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut poll = PollSchedule::new(config.poll_interval);
        poll.restart(Instant::now());

        Self {
            running: true,
            alerts: Vec::new(),
            loading: true,
            error: None,
            last_update: None,
            live: true,
            poll,
            refresh_requested: true,
            repoll_at: None,
            upload: UploadState::default(),
            selected_alert: 0,
            show_help: false,
            animation_counter: 0.0,
            last_frame: Instant::now(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    pub fn stats(&self) -> AlertStats {
        AlertStats::collect(&self.alerts)
    }

    /// Pause or resume live monitoring. Resuming triggers exactly one
    /// immediate fetch and re-arms the period; pausing cancels it.
    pub fn toggle_live(&mut self, now: Instant) {
        if self.live {
            self.live = false;
            self.poll.disarm();
        } else {
            self.live = true;
            self.refresh_requested = true;
            self.poll.restart(now);
        }
    }

    /// Manual refresh, honored whether or not live monitoring is on.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
        self.loading = true;
    }

    /// Decides whether a fetch should start this tick: a manual or
    /// resume request, the post-upload one-shot, or the elapsed
    /// period. Each reason fires at most once.
    pub fn take_fetch_trigger(&mut self, now: Instant) -> bool {
        let mut due = false;

        if self.refresh_requested {
            self.refresh_requested = false;
            due = true;
        }
        if matches!(self.repoll_at, Some(at) if now >= at) {
            self.repoll_at = None;
            due = true;
        }
        if self.live && self.poll.take_due(now) {
            due = true;
        }

        due
    }

    /// Applies a fetch completion. Results land in arrival order; a
    /// late response overwrites a newer one (last-write-wins, the
    /// original behavior).
    pub fn apply_alerts(&mut self, result: Result<Vec<Alert>, ApiError>, fetched_at: DateTime<Local>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.alerts = items;
                self.last_update = Some(fetched_at);
                self.error = None;
                if self.selected_alert >= self.alerts.len() {
                    self.selected_alert = self.alerts.len().saturating_sub(1);
                }
            }
            Err(err) => {
                // Displayed alerts stay stale rather than vanishing.
                self.error = Some(err.to_string());
            }
        }
    }

    /// Validates and records a file chosen for upload. A rejected
    /// path never populates the selection.
    pub fn select_file(&mut self, raw_path: &str) {
        match Selection::from_path(Path::new(raw_path.trim())) {
            Ok(selection) => {
                self.upload.selection = Some(selection);
                self.upload.error = None;
                self.upload.success_until = None;
            }
            Err(message) => {
                self.upload.error = Some(message);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.upload.selection = None;
        self.upload.error = None;
        self.upload.success_until = None;
    }

    pub fn apply_upload_success(&mut self, now: Instant) {
        self.upload.uploading = false;
        self.upload.selection = None;
        self.upload.error = None;
        self.upload.success_until = Some(now + SUCCESS_BANNER_TTL);
        self.repoll_at = Some(now + REPOLL_DELAY);
    }

    pub fn apply_upload_failure(&mut self, message: String) {
        self.upload.uploading = false;
        self.upload.error = Some(message);
        // Selection is kept so the user can retry without re-choosing.
    }

    /// Expires the self-clearing success banner.
    pub fn tick_banners(&mut self, now: Instant) {
        if matches!(self.upload.success_until, Some(until) if now >= until) {
            self.upload.success_until = None;
        }
    }

    pub fn select_previous_alert(&mut self) {
        self.selected_alert = self.selected_alert.saturating_sub(1);
    }

    pub fn select_next_alert(&mut self) {
        if !self.alerts.is_empty() && self.selected_alert < self.alerts.len() - 1 {
            self.selected_alert += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, SUCCESS_BANNER_TTL};
    use crate::api::error::ApiError;
    use crate::api::models::Alert;
    use crate::config::AppConfig;
    use chrono::Local;
    use std::time::{Duration, Instant};

    fn test_app() -> App {
        App::new(AppConfig {
            base_url: "https://api.example.com/prod".to_string(),
            poll_interval: Duration::from_secs(5),
            debug: false,
        })
    }

    fn sample_alerts(count: usize) -> Vec<Alert> {
        let mut json = String::from("[");
        for i in 0..count {
            if i > 0 {
                json.push(',');
            }
            json.push_str(&format!(
                r#"{{"AlertId":"{i}","alert_level":"NORMAL","key":"street_{i}.jpg"}}"#
            ));
        }
        json.push(']');
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn startup_requests_exactly_one_immediate_fetch() {
        let mut app = test_app();
        let now = Instant::now();

        assert!(app.take_fetch_trigger(now));
        assert!(!app.take_fetch_trigger(now));
    }

    #[test]
    fn toggling_live_off_then_on_fetches_once_and_restores_the_period() {
        let mut app = test_app();
        let start = Instant::now();
        app.take_fetch_trigger(start); // consume the startup fetch

        app.toggle_live(start);
        assert!(!app.live);
        assert!(!app.poll.is_armed());
        assert!(!app.take_fetch_trigger(start + Duration::from_secs(60)));

        let resumed = start + Duration::from_secs(61);
        app.toggle_live(resumed);
        assert!(app.live);

        // Exactly one immediate fetch...
        assert!(app.take_fetch_trigger(resumed));
        assert!(!app.take_fetch_trigger(resumed + Duration::from_secs(1)));
        // ...and the restored period, without a duplicate schedule.
        assert!(app.take_fetch_trigger(resumed + Duration::from_secs(5)));
        assert!(!app.take_fetch_trigger(resumed + Duration::from_secs(6)));
    }

    #[test]
    fn manual_refresh_works_while_paused() {
        let mut app = test_app();
        let now = Instant::now();
        app.take_fetch_trigger(now);
        app.toggle_live(now);

        app.request_refresh();
        assert!(app.take_fetch_trigger(now));
        assert!(!app.take_fetch_trigger(now + Duration::from_secs(60)));
    }

    #[test]
    fn fetch_failure_keeps_stale_alerts() {
        let mut app = test_app();
        app.apply_alerts(Ok(sample_alerts(3)), Local::now());
        assert_eq!(app.alerts.len(), 3);
        assert!(app.error.is_none());

        app.apply_alerts(
            Err(ApiError::status("API Error", 502)),
            Local::now(),
        );
        assert_eq!(app.alerts.len(), 3);
        assert_eq!(app.error.as_deref(), Some("API Error: 502"));
    }

    #[test]
    fn each_poll_fully_replaces_the_collection() {
        let mut app = test_app();
        app.apply_alerts(Ok(sample_alerts(5)), Local::now());
        app.selected_alert = 4;

        app.apply_alerts(Ok(sample_alerts(2)), Local::now());
        assert_eq!(app.alerts.len(), 2);
        // Cursor is clamped back into range.
        assert_eq!(app.selected_alert, 1);
    }

    #[test]
    fn empty_result_clears_the_collection_without_error() {
        let mut app = test_app();
        app.apply_alerts(Ok(sample_alerts(2)), Local::now());
        app.apply_alerts(Ok(Vec::new()), Local::now());

        assert!(app.alerts.is_empty());
        assert!(app.error.is_none());
        assert_eq!(app.selected_alert, 0);
    }

    #[test]
    fn rejected_selection_populates_error_not_selection() {
        let mut app = test_app();
        app.select_file("/tmp/report.pdf");

        assert!(app.upload.selection.is_none());
        assert_eq!(
            app.upload.error.as_deref(),
            Some("Please select a valid image file")
        );
    }

    #[test]
    fn success_banner_expires_on_its_own() {
        let mut app = test_app();
        let now = Instant::now();
        app.apply_upload_success(now);
        assert!(app.upload.success_until.is_some());

        app.tick_banners(now + SUCCESS_BANNER_TTL - Duration::from_millis(1));
        assert!(app.upload.success_until.is_some());

        app.tick_banners(now + SUCCESS_BANNER_TTL);
        assert!(app.upload.success_until.is_none());
    }

    #[test]
    fn upload_repoll_fires_exactly_once() {
        let mut app = test_app();
        let now = Instant::now();
        app.take_fetch_trigger(now);
        app.toggle_live(now); // pause so only the one-shot can fire

        app.apply_upload_success(now);
        assert!(!app.take_fetch_trigger(now + Duration::from_secs(2)));
        assert!(app.take_fetch_trigger(now + Duration::from_secs(3)));
        assert!(!app.take_fetch_trigger(now + Duration::from_secs(60)));
    }
}
