use chrono::DateTime;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::models::{Alert, LabelEntry};
use crate::app::App;
use crate::domain::AlertLevel;
use crate::ui::widgets::map::level_color;

/// Labels shown per alert card before truncation.
const MAX_LABELS: usize = 8;

pub fn render_stat_cards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let stats = app.stats();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    render_stat_card(f, cards[0], stats.total, "Total Alerts", Color::White);
    render_stat_card(
        f,
        cards[1],
        stats.high,
        AlertLevel::High.label(),
        level_color(AlertLevel::High),
    );
    render_stat_card(
        f,
        cards[2],
        stats.normal,
        AlertLevel::Normal.label(),
        level_color(AlertLevel::Normal),
    );
}

fn render_stat_card(f: &mut Frame<'_>, area: Rect, value: usize, label: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = Text::from(vec![
        TextLine::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(label, Style::default().fg(Color::Gray))),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub fn render_alert_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" Recent Alerts ({}) ", app.alerts.len()))
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.alerts.is_empty() {
        let message = if app.loading {
            "Loading alerts..."
        } else {
            "No alerts found\nUpload an image to generate alerts"
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(inner);

    render_alert_rows(app, f, split[0]);

    if let Some(alert) = app.alerts.get(app.selected_alert) {
        render_alert_details(alert, f, split[1]);
    }
}

fn render_alert_rows(app: &App, f: &mut Frame<'_>, area: Rect) {
    let max_visible = area.height as usize;
    let offset = scroll_offset(app.alerts.len(), max_visible, app.selected_alert);

    let lines: Vec<TextLine<'_>> = app
        .alerts
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible)
        .map(|(index, alert)| alert_row(alert, index == app.selected_alert))
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn alert_row<'a>(alert: &'a Alert, selected: bool) -> TextLine<'a> {
    let badge_color = level_color(alert.alert_level);
    let row_style = if selected {
        Style::default()
            .bg(Color::Rgb(30, 41, 59))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    TextLine::from(vec![
        Span::styled(if selected { "> " } else { "  " }, row_style),
        Span::styled(
            format!("[{}] ", alert.alert_level.as_str()),
            row_style.fg(badge_color),
        ),
        Span::styled(
            format!("{}  ", format_timestamp(&alert.timestamp)),
            row_style.fg(Color::Gray),
        ),
        Span::styled(alert.key.as_str(), row_style.fg(Color::White)),
    ])
}

fn render_alert_details(alert: &Alert, f: &mut Frame<'_>, area: Rect) {
    let mut lines = vec![TextLine::from(vec![
        Span::styled("File: ", Style::default().fg(Color::Gray)),
        Span::styled(alert.key.as_str(), Style::default().fg(Color::White)),
    ])];

    if !alert.suspicious().is_empty() {
        lines.push(TextLine::from(vec![
            Span::styled(
                "Suspicious: ",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                alert.suspicious().join(", "),
                Style::default().fg(Color::LightRed),
            ),
        ]));
    }

    if !alert.labels().is_empty() {
        let rendered = alert
            .labels()
            .iter()
            .take(MAX_LABELS)
            .map(format_label)
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(TextLine::from(vec![
            Span::styled("Labels: ", Style::default().fg(Color::Gray)),
            Span::styled(rendered, Style::default().fg(Color::Cyan)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// "gun (97%)" with the confidence rounded to a whole percent.
#[allow(clippy::cast_possible_truncation)]
pub fn format_label(entry: &LabelEntry) -> String {
    format!("{} ({}%)", entry.name, entry.confidence.round() as i64)
}

/// Renders the timestamp in local-friendly form when it parses,
/// otherwise shows the raw string the service sent.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |parsed| parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index - max_visible_rows + 1;
    }

    0
}

#[cfg(test)]
mod tests {
    use super::{format_label, format_timestamp, render_stat_cards, scroll_offset};
    use crate::api::models::LabelEntry;
    use crate::app::App;
    use crate::config::AppConfig;
    use crate::domain::AlertLevel;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn test_app() -> App {
        App::new(AppConfig {
            base_url: "https://api.example.com/prod".to_string(),
            poll_interval: Duration::from_secs(5),
            debug: false,
        })
    }

    #[test]
    fn stat_cards_carry_the_level_labels() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(66, 4)).unwrap();
        terminal
            .draw(|f| render_stat_cards(&app, f, f.area()))
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(rendered.contains("Total Alerts"));
        assert!(rendered.contains(AlertLevel::High.label()));
        assert!(rendered.contains(AlertLevel::Normal.label()));
    }

    #[test]
    fn labels_render_rounded_confidence() {
        let entry = LabelEntry {
            name: "gun".to_string(),
            confidence: 97.2,
        };
        assert_eq!(format_label(&entry), "gun (97%)");

        let entry = LabelEntry {
            name: "knife".to_string(),
            confidence: 88.6,
        };
        assert_eq!(format_label(&entry), "knife (89%)");
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(
            format_timestamp("2025-01-01T00:00:00Z"),
            "2025-01-01 00:00:00"
        );
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn scroll_keeps_the_selection_visible() {
        assert_eq!(scroll_offset(3, 10, 2), 0);
        assert_eq!(scroll_offset(20, 10, 0), 0);
        assert_eq!(scroll_offset(20, 10, 9), 0);
        assert_eq!(scroll_offset(20, 10, 10), 1);
        assert_eq!(scroll_offset(20, 10, 19), 10);
    }
}
