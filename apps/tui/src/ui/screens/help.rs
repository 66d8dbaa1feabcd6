use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::widgets::popup::{centered_rect, ClearWidget};

pub fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(ClearWidget, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn shortcut_line(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" - {description}"), Style::default()),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(vec![Span::styled(
            "Crime Analysis Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        TextLine::from(""),
        TextLine::from(
            "Polls the alert service for detections, maps them schematically, and uploads new images for analysis.",
        ),
        TextLine::from(""),
        TextLine::from(vec![Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        shortcut_line("?", "Toggle this help popup"),
        shortcut_line("p / Space", "Pause or resume live monitoring"),
        shortcut_line("r", "Refresh alerts now (works while paused)"),
        shortcut_line("o", "Choose an image file for upload"),
        shortcut_line("u / Enter", "Upload the selected image"),
        shortcut_line("x", "Clear the selected image"),
        shortcut_line("Up / Down", "Select an alert card"),
        shortcut_line("Esc", "Cancel input / close this popup"),
        shortcut_line("q", "Quit application"),
        TextLine::from(""),
        TextLine::from(vec![Span::styled(
            "Alert Levels:",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        TextLine::from("  HIGH   - a suspicious object was detected in the image"),
        TextLine::from("  NORMAL - the image was analyzed without findings"),
        TextLine::from(""),
        TextLine::from(vec![Span::styled(
            "CLI Options:",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
