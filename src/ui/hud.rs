use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::config::Theme;
use crate::game::EngineStatus;

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";

/// Renders the one-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, status: &EngineStatus, theme: &Theme) -> Rect {
    let [play_area, info_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let info_area = inset_horizontal(info_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(info_line(status, usize::from(info_area.width), theme))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.hud_muted)),
        info_area,
    );

    play_area
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

/// `Score | Hi | Length | Speed`, switching to one-letter labels when space is short.
fn info_line(status: &EngineStatus, available_width: usize, theme: &Theme) -> Line<'static> {
    let values = [
        status.score.to_string(),
        status.high_score.to_string(),
        status.snake_len.to_string(),
        status.difficulty.to_string(),
    ];
    let compact = info_width(&values, false) > available_width;
    let labels = if compact {
        ["S", "H", "L", "V"]
    } else {
        ["Score", "Hi", "Length", "Speed"]
    };

    // A freshly beaten record is highlighted until the next game starts.
    let high_score_color = if status.is_new_high_score() {
        Color::Yellow
    } else {
        theme.hud_value
    };

    let mut spans = Vec::with_capacity(values.len() * 3);
    for (index, (label, value)) in labels.iter().zip(values).enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        let color = if index == 1 {
            high_score_color
        } else {
            theme.hud_value
        };
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, Style::default().fg(color)));
    }

    Line::from(spans)
}

fn info_width(values: &[String; 4], compact: bool) -> usize {
    let label_width: usize = if compact {
        4
    } else {
        ["Score", "Hi", "Length", "Speed"]
            .iter()
            .map(|label| label.len())
            .sum()
    };

    label_width
        + values.len() * 2 // ": "
        + values.iter().map(|value| value.chars().count()).sum::<usize>()
        + (values.len() - 1) * SEPARATOR.chars().count()
}
