use crate::config::Grid;
use crate::snake::{Position, Snake};

/// Read-only picture of the board handed to a [`Renderer`].
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub grid: Grid,
    pub snake: &'a Snake,
    pub food: Position,
}

impl FrameView<'_> {
    /// Snake cells from head to tail.
    pub fn snake_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.snake.segments().copied()
    }

    #[must_use]
    pub fn is_head(&self, cell: Position) -> bool {
        self.snake.head() == cell
    }
}

/// Draws frames produced by the engine. Nothing is read back.
pub trait Renderer {
    fn on_frame(&mut self, frame: &FrameView<'_>);
}

impl Renderer for () {
    fn on_frame(&mut self, _frame: &FrameView<'_>) {}
}
