use std::collections::VecDeque;
use std::fmt;

use crate::config::{Grid, INITIAL_SNAKE_LENGTH};
use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Snake body (head first) plus its two direction slots.
///
/// `direction` is the heading applied by the last tick. `pending` holds the
/// latest accepted turn request and is committed at the start of the next
/// tick, so at most one turn takes effect per tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending: Direction,
}

impl Snake {
    /// Creates the starting snake: head at the board centre, body trailing left.
    #[must_use]
    pub fn initial(grid: Grid) -> Self {
        let head = grid.center();
        let body = (0..INITIAL_SNAKE_LENGTH)
            .map(|offset| Position {
                x: head.x - offset as i32,
                y: head.y,
            })
            .collect();

        Self {
            body,
            direction: Direction::Right,
            pending: Direction::Right,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        Self {
            body: VecDeque::from(segments),
            direction,
            pending: direction,
        }
    }

    /// Stores `direction` as the pending turn unless it lies on the current axis.
    ///
    /// Returns whether the request was accepted. Accepted requests overwrite
    /// any earlier pending turn.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending = direction;
        true
    }

    /// Makes the pending turn the current heading.
    pub fn commit_direction(&mut self) {
        self.direction = self.pending;
    }

    /// Returns the cell the head would enter moving in the current heading.
    #[must_use]
    pub fn next_head(&self) -> Position {
        self.head().step(self.direction)
    }

    /// Pushes `head` as the new front segment, dropping the tail unless `grow`.
    pub fn advance(&mut self, head: Position, grow: bool) {
        self.body.push_front(head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    ///
    /// # Panics
    ///
    /// Panics if the body is empty; every constructor used by the engine
    /// guarantees at least one segment.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the last segment.
    #[must_use]
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if two segments share a cell.
    #[must_use]
    pub fn has_overlapping_segments(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(index, segment)| self.body.iter().skip(index + 1).any(|other| other == segment))
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the heading applied by the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the turn that the next tick will commit.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Grid;
    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn initial_snake_trails_left_of_centre() {
        let snake = Snake::initial(Grid::new(20).expect("grid should be valid"));

        let segments: Vec<Position> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![Position::new(10, 10), Position::new(9, 10), Position::new(8, 10)]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.pending_direction(), Direction::Right);
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = Snake::initial(Grid::new(20).expect("grid should be valid"));

        let next = snake.next_head();
        snake.advance(next, false);

        assert_eq!(snake.head(), Position::new(11, 10));
        assert_eq!(snake.tail(), Some(Position::new(9, 10)));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn advance_with_growth_keeps_previous_tail() {
        let mut snake = Snake::initial(Grid::new(20).expect("grid should be valid"));

        let next = snake.next_head();
        snake.advance(next, true);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Some(Position::new(8, 10)));
    }

    #[test]
    fn reversal_request_is_rejected() {
        let mut snake = Snake::from_segments(vec![Position::new(5, 5)], Direction::Up);

        assert!(!snake.request_turn(Direction::Down));
        snake.commit_direction();

        assert_eq!(snake.next_head(), Position::new(5, 4));
    }

    #[test]
    fn pending_turn_only_applies_after_commit() {
        let mut snake = Snake::from_segments(vec![Position::new(5, 5)], Direction::Right);

        assert!(snake.request_turn(Direction::Down));
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.next_head(), Position::new(6, 5));

        snake.commit_direction();
        assert_eq!(snake.next_head(), Position::new(5, 6));
    }

    #[test]
    fn later_request_overwrites_pending_turn() {
        let mut snake = Snake::from_segments(vec![Position::new(5, 5)], Direction::Right);

        assert!(snake.request_turn(Direction::Up));
        assert!(snake.request_turn(Direction::Down));
        snake.commit_direction();

        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn overlapping_segments_are_detected() {
        let straight = Snake::from_segments(
            vec![Position::new(2, 2), Position::new(1, 2)],
            Direction::Right,
        );
        let folded = Snake::from_segments(
            vec![Position::new(2, 2), Position::new(1, 2), Position::new(2, 2)],
            Direction::Right,
        );

        assert!(!straight.has_overlapping_segments());
        assert!(folded.has_overlapping_segments());
    }
}
