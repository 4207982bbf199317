use rand::Rng;

use crate::config::{Grid, POINTS_PER_FOOD};
use crate::snake::{Position, Snake};

/// Food cell currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        POINTS_PER_FOOD
    }

    /// Places food on a free cell, or returns `None` when the snake fills the board.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, grid: Grid, snake: &Snake) -> Option<Self> {
        spawn_position(rng, grid, snake).map(Self::new)
    }
}

/// Draws uniformly random cells until one is not occupied by the snake.
///
/// Expected O(1) draws while the snake covers a small share of the board.
/// A completely covered board has no answer and yields `None` up front.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(rng: &mut R, grid: Grid, snake: &Snake) -> Option<Position> {
    if snake.len() >= grid.total_cells() {
        return None;
    }

    let side = i32::from(grid.tile_count());
    loop {
        let candidate = Position {
            x: rng.gen_range(0..side),
            y: rng.gen_range(0..side),
        };

        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::Grid;
    use crate::input::Direction;

    use super::{spawn_position, Food};
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = Grid::new(6).expect("grid should be valid");
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
            ],
            Direction::Right,
        );

        for _ in 0..100 {
            let food_position =
                spawn_position(&mut rng, grid, &snake).expect("board has free cells");
            assert!(!snake.occupies(food_position));
            assert!(grid.contains(food_position));
        }
    }

    #[test]
    fn food_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = Grid::new(4).expect("grid should be valid");
        let segments: Vec<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position { x, y }))
            .filter(|position| *position != Position { x: 3, y: 3 })
            .collect();
        let snake = Snake::from_segments(segments, Direction::Right);

        let food = Food::spawn(&mut rng, grid, &snake).expect("one cell is free");

        assert_eq!(food.position, Position { x: 3, y: 3 });
    }

    #[test]
    fn full_board_has_no_food_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = Grid::new(4).expect("grid should be valid");
        let segments: Vec<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position { x, y }))
            .collect();
        let snake = Snake::from_segments(segments, Direction::Right);

        assert_eq!(Food::spawn(&mut rng, grid, &snake), None);
    }

    #[test]
    fn same_seed_places_food_identically() {
        let grid = Grid::new(20).expect("grid should be valid");
        let snake = Snake::initial(grid);

        let first = Food::spawn(&mut StdRng::seed_from_u64(99), grid, &snake);
        let second = Food::spawn(&mut StdRng::seed_from_u64(99), grid, &snake);

        assert_eq!(first, second);
        assert_eq!(first.map(Food::points), Some(10));
    }
}
