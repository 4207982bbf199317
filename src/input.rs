use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Difficulty;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector `(dx, dy)`; `y` grows downwards.
    #[must_use]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a cardinal unit vector back to a direction.
    ///
    /// Returns `None` for the zero vector, diagonals and any component
    /// outside `-1..=1`.
    #[must_use]
    pub fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns true for `Left` and `Right`.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Returns whether `next` may replace the pending turn while moving in `current`.
///
/// A proposal on the axis the snake already travels along is refused. That
/// rules out the 180° reversal into the neck and leaves perpendicular turns.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    current.is_horizontal() != next.is_horizontal()
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Start from the title screen, resume from pause or play again after game over.
    Confirm,
    Pause,
    Restart,
    Speed(Difficulty),
    Quit,
}

/// Translates one key press into a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => GameInput::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc | KeyCode::Char('p' | 'P') => GameInput::Pause,
        KeyCode::Char('r' | 'R') => GameInput::Restart,
        KeyCode::Char('1') => GameInput::Speed(Difficulty::Easy),
        KeyCode::Char('2') => GameInput::Speed(Difficulty::Normal),
        KeyCode::Char('3') => GameInput::Speed(Difficulty::Hard),
        KeyCode::Char('q' | 'Q') => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Keyboard reader for the terminal front end.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one key press and maps it.
    ///
    /// Non-key events and unmapped keys yield `Ok(None)`.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{direction_change_is_valid, map_key, Direction, GameInput};
    use crate::config::Difficulty;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn from_vector_rejects_non_cardinal_vectors() {
        assert_eq!(Direction::from_vector(1, 0), Some(Direction::Right));
        assert_eq!(Direction::from_vector(0, -1), Some(Direction::Up));
        assert_eq!(Direction::from_vector(0, 0), None);
        assert_eq!(Direction::from_vector(1, 1), None);
        assert_eq!(Direction::from_vector(2, 0), None);
    }

    #[test]
    fn same_axis_changes_are_rejected() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Right, Direction::Left));
        assert!(!direction_change_is_valid(Direction::Right, Direction::Right));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Right, Direction::Down));
    }

    #[test]
    fn keys_map_to_game_inputs() {
        assert_eq!(
            map_key(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(map_key(press(KeyCode::Enter)), Some(GameInput::Confirm));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(GameInput::Pause));
        assert_eq!(
            map_key(press(KeyCode::Char('3'))),
            Some(GameInput::Speed(Difficulty::Hard))
        );
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(GameInput::Quit));

        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(release), None);
    }
}
