use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::game::{EngineStatus, GameOverReason};

const POPUP_WIDTH: u16 = 36;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, status: &EngineStatus, theme: &Theme) {
    let lines = vec![
        Line::from("SNAKE").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("High score: {}", status.high_score)),
        Line::from(format!("Speed: {}", status.difficulty)),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[1]/[2]/[3] Speed  [Q] Quit"),
        Line::from("Arrows/WASD to move").style(Style::default().fg(theme.menu_footer)),
    ];

    render_popup(frame, area, " start ", lines);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from("PAUSED").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("[P]/[Enter] Resume"),
        Line::from("[R] Restart  [Q] Quit"),
    ];

    render_popup(frame, area, " pause ", lines);
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    status: &EngineStatus,
    theme: &Theme,
) {
    let is_new_high = status.is_new_high_score();
    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {}", status.score)),
        Line::from(format!("High score: {}", status.high_score)),
        Line::from(cause_text(status.game_over_reason)),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter]/[Space] Play Again"),
        Line::from("[Q] Quit"),
    ];

    render_popup(frame, area, " game over ", lines);
}

fn cause_text(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::WallCollision) => "Cause: hit wall",
        Some(GameOverReason::SelfCollision) => "Cause: hit yourself",
        Some(GameOverReason::BoardFull) => "Cause: board filled",
        None => "",
    }
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'_>>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered_popup(area, POPUP_WIDTH, height);
    frame.render_widget(Clear, popup);

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(title)),
        popup,
    );
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let [mid] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);

    let [center] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{cause_text, centered_popup};
    use crate::game::GameOverReason;

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 60, 20);

        assert_eq!(centered_popup(area, 36, 10), Rect::new(12, 5, 36, 10));
        assert_eq!(centered_popup(Rect::new(0, 0, 20, 6), 36, 10), Rect::new(0, 0, 20, 6));
    }

    #[test]
    fn every_reason_has_a_cause_line() {
        assert_eq!(cause_text(Some(GameOverReason::SelfCollision)), "Cause: hit yourself");
        assert_eq!(cause_text(Some(GameOverReason::BoardFull)), "Cause: board filled");
        assert_eq!(cause_text(None), "");
    }
}
