use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ratatui::style::Color;
use thiserror::Error;

use crate::snake::Position;

/// Default drawing-surface edge length in pixels.
pub const DEFAULT_CANVAS_PX: u32 = 400;

/// Default cell edge length in pixels.
pub const DEFAULT_CELL_PX: u32 = 20;

/// Smallest board that fits the starting snake plus one food cell.
pub const MIN_TILE_COUNT: u16 = 4;

/// Segment count of a freshly started snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Score granted per food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Invalid construction-time settings.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("board of {tile_count} tiles per side is below the minimum board size")]
    TileCountTooSmall { tile_count: u32 },
    #[error("board of {tile_count} tiles per side exceeds the largest supported board")]
    TileCountTooLarge { tile_count: u32 },
    #[error("cell size must be non-zero")]
    ZeroCellSize,
    #[error("unknown difficulty `{0}` (expected easy, normal or hard)")]
    UnknownDifficulty(String),
}

/// Immutable square board addressed by `(x, y)` with `0 <= x, y < tile_count`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    tile_count: u16,
}

impl Grid {
    /// Creates a board with `tile_count` cells per side.
    pub fn new(tile_count: u16) -> Result<Self, ConfigError> {
        if tile_count < MIN_TILE_COUNT {
            return Err(ConfigError::TileCountTooSmall {
                tile_count: u32::from(tile_count),
            });
        }

        Ok(Self { tile_count })
    }

    /// Derives the board from a drawing surface and cell size in pixels.
    pub fn from_canvas(canvas_px: u32, cell_px: u32) -> Result<Self, ConfigError> {
        if cell_px == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        let tile_count = canvas_px / cell_px;
        let tile_count =
            u16::try_from(tile_count).map_err(|_| ConfigError::TileCountTooLarge { tile_count })?;
        Self::new(tile_count)
    }

    #[must_use]
    pub fn tile_count(self) -> u16 {
        self.tile_count
    }

    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.tile_count) * usize::from(self.tile_count)
    }

    /// Returns true when `position` lies on the board.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        let side = i32::from(self.tile_count);
        (0..side).contains(&position.x) && (0..side).contains(&position.y)
    }

    /// Returns the centre cell, where a new snake's head is placed.
    #[must_use]
    pub fn center(self) -> Position {
        let half = i32::from(self.tile_count / 2);
        Position { x: half, y: half }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            tile_count: (DEFAULT_CANVAS_PX / DEFAULT_CELL_PX) as u16,
        }
    }
}

/// Selectable game speed. Slower levels tick at larger intervals.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Tick interval for this level.
    #[must_use]
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(match self {
            Self::Easy => 150,
            Self::Normal => 100,
            Self::Hard => 60,
        })
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "slow" => Ok(Self::Easy),
            "normal" | "medium" => Ok(Self::Normal),
            "hard" | "fast" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Construction parameters for an [`Engine`](crate::game::Engine).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct EngineSettings {
    pub grid: Grid,
    pub difficulty: Difficulty,
    /// Fixed RNG seed for reproducible food placement; `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// Colours used by the terminal front end.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_value: Color,
    pub hud_muted: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Classic green snake on black.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::White,
    hud_value: Color::White,
    hud_muted: Color::DarkGray,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Glyph drawn for one board cell; two columns keep cells roughly square.
pub const GLYPH_CELL: &str = "██";

/// Glyph drawn for food.
pub const GLYPH_FOOD: &str = "◖◗";

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ConfigError, Difficulty, Grid, MIN_TILE_COUNT};
    use crate::snake::Position;

    #[test]
    fn grid_from_default_canvas_has_twenty_tiles() {
        let grid = Grid::from_canvas(400, 20).expect("default canvas should be valid");

        assert_eq!(grid.tile_count(), 20);
        assert_eq!(grid.total_cells(), 400);
        assert_eq!(grid, Grid::default());
    }

    #[test]
    fn grid_from_canvas_truncates_partial_cells() {
        let grid = Grid::from_canvas(410, 20).expect("canvas should be valid");
        assert_eq!(grid.tile_count(), 20);
    }

    #[test]
    fn grid_rejects_tiny_boards_and_zero_cells() {
        assert_eq!(
            Grid::new(MIN_TILE_COUNT - 1),
            Err(ConfigError::TileCountTooSmall { tile_count: 3 })
        );
        assert_eq!(Grid::from_canvas(400, 0), Err(ConfigError::ZeroCellSize));
        assert!(Grid::from_canvas(60, 20).is_err());
    }

    #[test]
    fn oversized_canvas_is_reported_as_too_large() {
        assert_eq!(
            Grid::from_canvas(70_000, 1),
            Err(ConfigError::TileCountTooLarge { tile_count: 70_000 })
        );
        assert_eq!(
            Grid::from_canvas(u32::from(u16::MAX), 1).map(Grid::tile_count),
            Ok(u16::MAX)
        );
    }

    #[test]
    fn grid_contains_only_cells_inside_bounds() {
        let grid = Grid::new(20).expect("grid should be valid");

        assert!(grid.contains(Position { x: 0, y: 0 }));
        assert!(grid.contains(Position { x: 19, y: 19 }));
        assert!(!grid.contains(Position { x: 20, y: 5 }));
        assert!(!grid.contains(Position { x: 5, y: -1 }));
        assert_eq!(grid.center(), Position { x: 10, y: 10 });
    }

    #[test]
    fn slower_difficulty_has_larger_interval() {
        assert!(Difficulty::Easy.tick_interval() > Difficulty::Normal.tick_interval());
        assert!(Difficulty::Normal.tick_interval() > Difficulty::Hard.tick_interval());
        assert_eq!(Difficulty::default().tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(
            "turbo".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty("turbo".to_owned()))
        );
    }
}
