use std::time::Instant;

use crossterm::event::KeyCode;

use crate::app::state::App;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if app.upload.entering_path {
        handle_path_entry(app, key);
        return;
    }

    if handle_help_toggle(app, key) {
        return;
    }

    handle_dashboard_input(app, key);
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || key == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

fn handle_path_entry(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.upload.entering_path = false;
            app.upload.path_input.clear();
        }
        KeyCode::Enter => {
            let raw = app.upload.path_input.clone();
            app.upload.entering_path = false;
            app.upload.path_input.clear();
            if !raw.trim().is_empty() {
                app.select_file(&raw);
            }
        }
        KeyCode::Backspace => {
            app.upload.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.upload.path_input.push(c);
        }
        _ => {}
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('p' | ' ') => {
            app.toggle_live(Instant::now());
        }
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('o') => {
            app.upload.entering_path = true;
            app.upload.error = None;
        }
        KeyCode::Char('u') | KeyCode::Enter => {
            // Inert while an upload is already in flight.
            if app.upload.selection.is_some() && !app.upload.uploading {
                app.upload.requested = true;
            }
        }
        KeyCode::Char('x') => {
            app.clear_selection();
        }
        KeyCode::Up => {
            app.select_previous_alert();
        }
        KeyCode::Down => {
            app.select_next_alert();
        }
        _ => {}
    }
}
