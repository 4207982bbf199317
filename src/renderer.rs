use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{Grid, Theme, GLYPH_CELL, GLYPH_FOOD};
use crate::frame::{FrameView, Renderer};
use crate::game::{EngineStatus, Lifecycle};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Terminal columns used by one board cell.
const CELL_WIDTH: u16 = 2;

/// Engine-side renderer for the terminal: marks the screen stale so the host
/// loop redraws on its next pass.
#[derive(Debug, Clone, Default)]
pub struct RedrawLatch {
    dirty: bool,
    frames: u64,
}

impl RedrawLatch {
    /// Creates a latch that asks for an initial draw.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirty: true,
            frames: 0,
        }
    }

    /// Marks the screen stale for reasons outside the engine (input, resize).
    pub fn request(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Number of frames the engine has produced.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for RedrawLatch {
    fn on_frame(&mut self, _frame: &FrameView<'_>) {
        self.dirty = true;
        self.frames += 1;
    }
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, view: &FrameView<'_>, status: &EngineStatus, theme: &Theme) {
    let area = frame.area();
    let play_area = render_hud(frame, area, status, theme);
    let board_area = board_rect(play_area, view.grid);

    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().bg(theme.play_bg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_food(frame, inner, view, theme);
    render_snake(frame, inner, view, theme);

    match status.lifecycle {
        Lifecycle::Idle => render_start_menu(frame, play_area, status, theme),
        Lifecycle::Paused => render_pause_menu(frame, play_area, theme),
        Lifecycle::GameOver => render_game_over_menu(frame, play_area, status, theme),
        Lifecycle::Running => {}
    }
}

/// Centres a bordered square board inside `area`, clipped to what fits.
fn board_rect(area: Rect, grid: Grid) -> Rect {
    let width = grid
        .tile_count()
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.tile_count().saturating_add(2).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    board
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, view: &FrameView<'_>, theme: &Theme) {
    let Some((x, y)) = logical_to_terminal(inner, view.grid, view.food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, view: &FrameView<'_>, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for segment in view.snake_cells() {
        let Some((x, y)) = logical_to_terminal(inner, view.grid, segment) else {
            continue;
        };

        let style = if view.is_head(segment) {
            Style::new()
                .fg(theme.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(theme.snake_body)
        };
        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

fn logical_to_terminal(inner: Rect, grid: Grid, position: Position) -> Option<(u16, u16)> {
    if !grid.contains(position) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use super::{logical_to_terminal, render, RedrawLatch};
    use crate::config::{Difficulty, Grid, THEME_CLASSIC};
    use crate::frame::{FrameView, Renderer};
    use crate::game::{EngineStatus, GameOverReason, Lifecycle};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    fn status(lifecycle: Lifecycle) -> EngineStatus {
        EngineStatus {
            lifecycle,
            score: 30,
            high_score: 30,
            previous_high_score: 20,
            difficulty: Difficulty::Normal,
            snake_len: 3,
            tick_count: 12,
            game_over_reason: Some(GameOverReason::WallCollision),
        }
    }

    fn screen_text(lifecycle: Lifecycle) -> String {
        let grid = Grid::new(10).expect("grid should be valid");
        let snake = Snake::initial(grid);
        let view = FrameView {
            grid,
            snake: &snake,
            food: Position::new(1, 1),
        };

        let mut terminal =
            Terminal::new(TestBackend::new(60, 20)).expect("test terminal should build");
        terminal
            .draw(|frame| render(frame, &view, &status(lifecycle), &THEME_CLASSIC))
            .expect("draw should succeed");

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn game_over_screen_shows_cause_and_new_high_score() {
        let text = screen_text(Lifecycle::GameOver);

        assert!(text.contains("GAME OVER"));
        assert!(text.contains("hit wall"));
        assert!(text.contains("New high score!"));
    }

    #[test]
    fn idle_and_paused_screens_show_their_menus() {
        assert!(screen_text(Lifecycle::Idle).contains("SNAKE"));
        assert!(screen_text(Lifecycle::Paused).contains("PAUSED"));
        assert!(!screen_text(Lifecycle::Running).contains("PAUSED"));
    }

    #[test]
    fn cells_map_to_two_terminal_columns() {
        let grid = Grid::new(10).expect("grid should be valid");
        let inner = Rect::new(5, 3, 20, 10);

        assert_eq!(
            logical_to_terminal(inner, grid, Position::new(0, 0)),
            Some((5, 3))
        );
        assert_eq!(
            logical_to_terminal(inner, grid, Position::new(9, 9)),
            Some((23, 12))
        );
        assert_eq!(logical_to_terminal(inner, grid, Position::new(10, 0)), None);
    }

    #[test]
    fn latch_is_raised_by_frames_and_cleared_by_take() {
        let grid = Grid::new(10).expect("grid should be valid");
        let snake = Snake::from_segments(vec![Position::new(2, 2)], Direction::Up);
        let mut latch = RedrawLatch::new();

        assert!(latch.take());
        assert!(!latch.take());

        latch.on_frame(&FrameView {
            grid,
            snake: &snake,
            food: Position::new(0, 0),
        });
        assert!(latch.take());
        assert_eq!(latch.frames(), 1);
    }
}
