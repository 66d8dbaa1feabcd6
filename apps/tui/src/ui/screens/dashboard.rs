use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::screens::help::render_help_popup;
use crate::ui::widgets::cards::{render_alert_list, render_stat_cards};
use crate::ui::widgets::map::render_alert_map;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let layout = build_layout(f);

    if app.show_help {
        render_help_popup(f);
        return;
    }

    render_header(app, f, layout[0]);
    render_stat_cards(app, f, layout[1]);
    render_body(app, f, layout[2]);
    render_status_section(app, f, layout[3]);
    render_shortcuts(f, layout[4]);
}

fn build_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with live indicator
            Constraint::Length(4), // Stat cards
            Constraint::Min(10),   // Alerts, upload panel, map
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec()
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let header_block = Block::default()
        .title("== Crime Analysis Dashboard ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(header_block, area);

    let inner = area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let title = Paragraph::new(Text::from(vec![
        TextLine::from(vec![
            Span::styled(
                "Crime Analysis ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Dashboard",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(Span::styled(
            "Real-time AI-powered threat detection",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);

    f.render_widget(
        Paragraph::new(Text::from(vec![
            live_indicator_line(app),
            last_update_line(app),
        ]))
        .alignment(Alignment::Right),
        chunks[1],
    );
}

fn live_indicator_line(app: &App) -> TextLine<'static> {
    if app.live {
        let blink = (app.animation_counter * 2.0).sin() > 0.0;
        TextLine::from(vec![
            Span::styled(
                if blink { "● " } else { "○ " },
                Style::default().fg(Color::Green),
            ),
            Span::styled("Live Monitoring", Style::default().fg(Color::Green)),
        ])
    } else {
        TextLine::from(vec![
            Span::styled("● ", Style::default().fg(Color::DarkGray)),
            Span::styled("Paused", Style::default().fg(Color::Gray)),
        ])
    }
}

fn last_update_line(app: &App) -> TextLine<'static> {
    let text = app.last_update.map_or_else(
        || "Waiting for first update...".to_string(),
        |at| format!("Last updated: {}", at.format("%H:%M:%S")),
    );
    TextLine::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

fn render_body(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_alert_list(app, f, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(6)])
        .split(columns[1]);

    render_upload_section(app, f, right[0]);
    render_alert_map(app, f, right[1]);
}

fn render_upload_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Upload Image for Analysis ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(Text::from(upload_lines(app)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn upload_lines(app: &App) -> Vec<TextLine<'_>> {
    let mut lines = Vec::new();

    if app.upload.success_until.is_some() {
        lines.push(TextLine::from(Span::styled(
            "Upload successful! Processing image...",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(TextLine::from(Span::styled(
            "Dashboard will update in a few seconds.",
            Style::default().fg(Color::Green),
        )));
        lines.push(TextLine::from(""));
    }

    if let Some(error) = &app.upload.error {
        lines.push(TextLine::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
        lines.push(TextLine::from(""));
    }

    if app.upload.entering_path {
        lines.push(TextLine::from(Span::styled(
            "Enter image path:",
            Style::default().fg(Color::Green),
        )));
        let cursor = if (app.animation_counter * 2.0).sin() > 0.0 {
            "█"
        } else {
            " "
        };
        lines.push(TextLine::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::styled(
                app.upload.path_input.as_str(),
                Style::default().fg(Color::White),
            ),
            Span::styled(cursor, Style::default().fg(Color::White)),
        ]));
        lines.push(TextLine::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(Color::Gray),
        )));
        return lines;
    }

    if let Some(selection) = &app.upload.selection {
        lines.push(info_line("File", &selection.file_name));
        lines.push(info_line("Size", &format!("{:.2} KB", selection.size_kb())));
        lines.push(info_line("Type", selection.content_type));
        lines.push(TextLine::from(""));
        if app.upload.uploading {
            lines.push(TextLine::from(Span::styled(
                "Uploading...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(TextLine::from(Span::styled(
                "[u] Upload & Analyze   [x] Clear",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }
    } else {
        lines.push(TextLine::from(Span::styled(
            "No file selected",
            Style::default().fg(Color::Gray),
        )));
        lines.push(TextLine::from(Span::styled(
            "Press 'o' to choose an image",
            Style::default().fg(Color::Gray),
        )));
        lines.push(TextLine::from(Span::styled(
            "Supported: JPG, PNG, GIF (Max 5MB)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn info_line<'a>(label: &'a str, value: &str) -> TextLine<'a> {
    TextLine::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if let Some(error) = &app.error {
        Text::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if app.loading && app.alerts.is_empty() {
        Text::from(Span::styled(
            "Loading alerts...",
            Style::default().fg(Color::Gray),
        ))
    } else {
        let mode = if app.live {
            format!("refreshing every {}s", app.poll.interval().as_secs())
        } else {
            "paused, press 'p' to resume".to_string()
        };
        Text::from(Span::styled(
            format!("Monitoring {} alerts ({mode})", app.alerts.len()),
            Style::default().fg(Color::Green),
        ))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts = TextLine::from(Span::styled(
        "q Quit | p Pause/Resume | r Refresh | o Choose image | u Upload | x Clear | Up/Down Select | ? Help",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}
