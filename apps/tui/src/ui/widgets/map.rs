use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::domain::AlertLevel;

/// Map markers cap, matching the card list's schematic view.
const MAX_MARKERS: usize = 20;

pub const fn level_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::High => Color::Red,
        AlertLevel::Normal => Color::Green,
    }
}

/// Pseudo-location for an alert on the schematic map: a keyword base
/// point plus an index-derived jitter, clamped into the frame. The
/// service reports no real coordinates; this is purely schematic.
pub fn marker_position(key: &str, index: usize) -> (f64, f64) {
    let (base_x, base_y) = if key.contains("knife") {
        (30.0, 45.0)
    } else if key.contains("gun") {
        (65.0, 30.0)
    } else if key.contains("street") {
        (50.0, 70.0)
    } else {
        (50.0, 50.0)
    };

    let offset = (index % 10) * 2;
    #[allow(clippy::cast_precision_loss)]
    let x = (base_x + (offset % 15) as f64 - 7.0).min(95.0);
    #[allow(clippy::cast_precision_loss)]
    let y = (base_y + (offset / 3) as f64 - 7.0).min(95.0);

    (x, y)
}

pub fn render_alert_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    if area.width < 8 || area.height < 6 {
        return;
    }

    let block = Block::default()
        .title(" Live Alert Map ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.alerts.is_empty() {
        let paragraph = Paragraph::new("No alerts to map")
            .alignment(ratatui::layout::Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    render_canvas(app, f, split[0]);
    render_legend(app, f, split[1]);
}

fn render_canvas(app: &App, f: &mut Frame<'_>, area: Rect) {
    let pulse_on = (app.animation_counter * 2.0).sin() > 0.0;

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                // Background grid
                for step in 1..5 {
                    let offset = f64::from(step) * 20.0;
                    ctx.draw(&CanvasLine {
                        x1: offset,
                        y1: 0.0,
                        x2: offset,
                        y2: 100.0,
                        color: Color::DarkGray,
                    });
                    ctx.draw(&CanvasLine {
                        x1: 0.0,
                        y1: offset,
                        x2: 100.0,
                        y2: offset,
                        color: Color::DarkGray,
                    });
                }

                let district = Style::default().fg(Color::Gray);
                ctx.print(2.0, 97.0, TextLine::styled("North District", district));
                ctx.print(70.0, 2.0, TextLine::styled("South District", district));
                ctx.print(70.0, 97.0, TextLine::styled("East District", district));
                ctx.print(2.0, 2.0, TextLine::styled("West District", district));

                for (index, alert) in app.alerts.iter().take(MAX_MARKERS).enumerate() {
                    let (x, y) = marker_position(&alert.key, index);
                    // The pseudo-locations measure y from the top;
                    // canvas y grows upward.
                    let cy = 100.0 - y;
                    let is_high = alert.alert_level.is_high();

                    if is_high && !pulse_on {
                        continue;
                    }

                    ctx.draw(&Circle {
                        x,
                        y: cy,
                        radius: 1.5,
                        color: level_color(alert.alert_level),
                    });
                    if is_high {
                        ctx.print(
                            x,
                            cy,
                            TextLine::styled(
                                "!",
                                Style::default()
                                    .fg(Color::Red)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        );
                    }
                }
            })
            .x_bounds([0.0, 100.0])
            .y_bounds([0.0, 100.0]),
        area,
    );
}

fn render_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let stats = app.stats();
    let legend = TextLine::from(vec![
        Span::styled("● ", Style::default().fg(level_color(AlertLevel::High))),
        Span::styled(
            format!("{} ({})", AlertLevel::High.label(), stats.high),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("   "),
        Span::styled("● ", Style::default().fg(level_color(AlertLevel::Normal))),
        Span::styled(
            format!("{} ({})", AlertLevel::Normal.label(), stats.normal),
            Style::default().fg(Color::Gray),
        ),
    ]);

    f.render_widget(Paragraph::new(legend), area);
}

#[cfg(test)]
mod tests {
    use super::marker_position;

    #[test]
    fn keyword_bases_place_the_marker() {
        // offset 0 shifts both axes by -7 from the base point
        assert_eq!(marker_position("gun_01.jpg", 0), (58.0, 23.0));
        assert_eq!(marker_position("knife_02.jpg", 0), (23.0, 38.0));
        assert_eq!(marker_position("street_cam.jpg", 0), (43.0, 63.0));
        assert_eq!(marker_position("unknown.jpg", 0), (43.0, 43.0));
    }

    #[test]
    fn index_jitter_wraps_every_ten() {
        assert_eq!(
            marker_position("gun_01.jpg", 3),
            marker_position("gun_01.jpg", 13)
        );
        // index 3 -> offset 6: x + 6 - 7, y + 2 - 7
        assert_eq!(marker_position("gun_01.jpg", 3), (64.0, 25.0));
    }

    #[test]
    fn positions_stay_inside_the_frame() {
        for index in 0..40 {
            for key in ["gun.jpg", "knife.jpg", "street.jpg", "other.jpg"] {
                let (x, y) = marker_position(key, index);
                assert!(x >= 0.0 && x <= 95.0, "x out of range: {x}");
                assert!(y >= 0.0 && y <= 95.0, "y out of range: {y}");
            }
        }
    }
}
