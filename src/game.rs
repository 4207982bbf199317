use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::{Difficulty, EngineSettings, Grid};
use crate::feedback::{Cue, FeedbackSink};
use crate::food::Food;
use crate::frame::{FrameView, Renderer};
use crate::input::{Direction, GameInput};
use crate::score::HighScoreStore;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::snake::{Position, Snake};

/// Coarse mode of the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Lifecycle {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFull,
}

/// What one call to [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The engine was not running, or the timer handle was stale.
    Skipped,
    Moved,
    Ate,
    GameOver(GameOverReason),
}

/// Rejected board setup passed to one of the scenario setters.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum PlacementError {
    #[error("snake must have at least one segment")]
    EmptySnake,
    #[error("cell {0} is outside the board")]
    OutOfBounds(Position),
    #[error("snake segments overlap")]
    OverlappingSnake,
    #[error("food at {0} lies on the snake")]
    FoodOnSnake(Position),
}

/// Copyable summary for HUDs and menus.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EngineStatus {
    pub lifecycle: Lifecycle,
    pub score: u32,
    pub high_score: u32,
    /// High score as it stood when the current game started.
    pub previous_high_score: u32,
    pub difficulty: Difficulty,
    pub snake_len: usize,
    pub tick_count: u64,
    pub game_over_reason: Option<GameOverReason>,
}

impl EngineStatus {
    /// Returns true once the current game beat the stored best.
    #[must_use]
    pub fn is_new_high_score(&self) -> bool {
        self.score > self.previous_high_score
    }
}

/// External collaborators owned by an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct Collaborators<R, F, S, T> {
    pub renderer: R,
    pub feedback: F,
    pub store: S,
    pub scheduler: T,
}

/// Tick-driven snake simulation and its lifecycle state machine.
///
/// All mutation happens inside [`tick`](Self::tick) or one of the command
/// methods, each of which runs to completion before the next is called.
#[derive(Debug)]
pub struct Engine<R, F, S, T> {
    grid: Grid,
    snake: Snake,
    food: Food,
    score: u32,
    high_score: u32,
    previous_high_score: u32,
    difficulty: Difficulty,
    lifecycle: Lifecycle,
    game_over_reason: Option<GameOverReason>,
    tick_count: u64,
    timer: Option<TimerHandle>,
    rng: StdRng,
    renderer: R,
    feedback: F,
    store: S,
    scheduler: T,
}

impl<R, F, S, T> Engine<R, F, S, T>
where
    R: Renderer,
    F: FeedbackSink,
    S: HighScoreStore,
    T: Scheduler,
{
    /// Builds an idle engine with a fresh board and the stored high score.
    ///
    /// An unreadable store degrades to a high score of 0.
    pub fn new(settings: EngineSettings, collaborators: Collaborators<R, F, S, T>) -> Self {
        let Collaborators {
            renderer,
            feedback,
            mut store,
            scheduler,
        } = collaborators;

        let high_score = store.read_high_score().unwrap_or_else(|error| {
            log::warn!("high score unavailable, starting from 0: {error}");
            0
        });

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let grid = settings.grid;
        let snake = Snake::initial(grid);
        let food = initial_food(&mut rng, grid, &snake);

        log::info!(
            "engine ready: {0}x{0} board, {1} speed, high score {high_score}",
            grid.tile_count(),
            settings.difficulty
        );

        Self {
            grid,
            snake,
            food,
            score: 0,
            high_score,
            previous_high_score: high_score,
            difficulty: settings.difficulty,
            lifecycle: Lifecycle::Idle,
            game_over_reason: None,
            tick_count: 0,
            timer: None,
            rng,
            renderer,
            feedback,
            store,
            scheduler,
        }
    }

    /// Idle -> Running with a freshly reset board. No-op in any other state.
    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            log::debug!("start ignored while {:?}", self.lifecycle);
            return;
        }

        self.reset_board();
        self.lifecycle = Lifecycle::Running;
        self.arm_timer();
        self.feedback.on_event(Cue::Start);
        self.render();
        log::info!("game started at {} speed", self.difficulty);
    }

    /// Running -> Paused. No-op in any other state.
    pub fn pause(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            log::debug!("pause ignored while {:?}", self.lifecycle);
            return;
        }

        self.disarm_timer();
        self.lifecycle = Lifecycle::Paused;
    }

    /// Paused -> Running at the current speed. No-op in any other state.
    pub fn resume(&mut self) {
        if self.lifecycle != Lifecycle::Paused {
            log::debug!("resume ignored while {:?}", self.lifecycle);
            return;
        }

        self.lifecycle = Lifecycle::Running;
        self.arm_timer();
    }

    /// Flips between Running and Paused.
    pub fn toggle_pause(&mut self) {
        match self.lifecycle {
            Lifecycle::Running => self.pause(),
            Lifecycle::Paused => self.resume(),
            other => log::debug!("pause toggle ignored while {other:?}"),
        }
    }

    /// Halts any game in progress and returns to Idle. The board keeps its contents.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Idle {
            return;
        }

        self.disarm_timer();
        self.lifecycle = Lifecycle::Idle;
        log::info!("game stopped with score {}", self.score);
    }

    /// Stop followed by start: always ends Running on a fresh board.
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Requests a turn along `(dx, dy)`, applied at the next tick.
    ///
    /// Non-cardinal vectors and turns along the current axis are ignored.
    /// Returns whether the pending direction was updated.
    pub fn request_direction(&mut self, dx: i32, dy: i32) -> bool {
        let Some(direction) = Direction::from_vector(dx, dy) else {
            log::debug!("ignoring non-cardinal direction ({dx}, {dy})");
            return false;
        };

        self.request_turn(direction)
    }

    /// Same as [`request_direction`](Self::request_direction) for a named direction.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        let accepted = self.snake.request_turn(direction);
        if !accepted {
            log::debug!(
                "rejected turn {direction:?} while heading {:?}",
                self.snake.direction()
            );
        }
        accepted
    }

    /// Changes the tick interval. A running game is re-armed immediately.
    pub fn set_speed(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        log::debug!("speed set to {difficulty} ({:?})", difficulty.tick_interval());

        if self.lifecycle == Lifecycle::Running {
            self.arm_timer();
        }
    }

    /// Ticks if `handle` is the schedule this engine armed last.
    pub fn fire(&mut self, handle: TimerHandle) -> TickOutcome {
        if self.timer != Some(handle) {
            log::debug!("ignoring stale timer {handle:?}");
            return TickOutcome::Skipped;
        }

        self.tick()
    }

    /// Advances the simulation by one step while Running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.lifecycle != Lifecycle::Running {
            return TickOutcome::Skipped;
        }

        self.snake.commit_direction();
        let candidate = self.snake.next_head();

        if !self.grid.contains(candidate) {
            self.enter_game_over(GameOverReason::WallCollision);
            return TickOutcome::GameOver(GameOverReason::WallCollision);
        }

        if self.snake.occupies(candidate) {
            self.enter_game_over(GameOverReason::SelfCollision);
            return TickOutcome::GameOver(GameOverReason::SelfCollision);
        }

        let ate = candidate == self.food.position;
        self.snake.advance(candidate, ate);
        self.tick_count += 1;
        log::trace!("tick {}: head at {candidate}", self.tick_count);

        if !ate {
            self.render();
            return TickOutcome::Moved;
        }

        self.score += self.food.points();
        self.feedback.on_event(Cue::Eat);

        match Food::spawn(&mut self.rng, self.grid, &self.snake) {
            Some(food) => {
                self.food = food;
                self.render();
                TickOutcome::Ate
            }
            None => {
                self.render();
                self.enter_game_over(GameOverReason::BoardFull);
                TickOutcome::GameOver(GameOverReason::BoardFull)
            }
        }
    }

    /// Applies one input event from the front end. `Quit` is the host's concern.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                self.request_turn(direction);
            }
            GameInput::Confirm => match self.lifecycle {
                Lifecycle::Idle => self.start(),
                Lifecycle::Paused => self.resume(),
                Lifecycle::GameOver => self.restart(),
                Lifecycle::Running => {}
            },
            GameInput::Pause => self.toggle_pause(),
            GameInput::Restart => self.restart(),
            GameInput::Speed(difficulty) => self.set_speed(difficulty),
            GameInput::Quit => {}
        }
    }

    /// Replaces the snake. Rejected if empty, off the board, self-overlapping
    /// or covering the current food.
    pub fn set_snake(&mut self, snake: Snake) -> Result<(), PlacementError> {
        if snake.is_empty() {
            return Err(PlacementError::EmptySnake);
        }
        if let Some(cell) = snake.segments().find(|cell| !self.grid.contains(**cell)) {
            return Err(PlacementError::OutOfBounds(*cell));
        }
        if snake.has_overlapping_segments() {
            return Err(PlacementError::OverlappingSnake);
        }
        if snake.occupies(self.food.position) {
            return Err(PlacementError::FoodOnSnake(self.food.position));
        }

        self.snake = snake;
        Ok(())
    }

    /// Moves the food. Rejected if off the board or on the snake.
    pub fn set_food(&mut self, position: Position) -> Result<(), PlacementError> {
        if !self.grid.contains(position) {
            return Err(PlacementError::OutOfBounds(position));
        }
        if self.snake.occupies(position) {
            return Err(PlacementError::FoodOnSnake(position));
        }

        self.food = Food::new(position);
        Ok(())
    }

    /// Overrides the current score, e.g. to resume a recorded session.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn reset_board(&mut self) {
        self.snake = Snake::initial(self.grid);
        self.food = initial_food(&mut self.rng, self.grid, &self.snake);
        self.score = 0;
        self.tick_count = 0;
        self.game_over_reason = None;
        self.previous_high_score = self.high_score;
    }

    fn enter_game_over(&mut self, reason: GameOverReason) {
        self.disarm_timer();
        self.lifecycle = Lifecycle::GameOver;
        self.game_over_reason = Some(reason);
        self.feedback.on_event(Cue::GameOver);
        log::info!("game over ({reason:?}) with score {}", self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            match self.store.write_high_score(self.score) {
                Ok(()) => log::info!("new high score {} saved", self.score),
                Err(error) => log::warn!("failed to save high score {}: {error}", self.score),
            }
        }
    }

    /// Cancels the current schedule and arms one at the current speed.
    fn arm_timer(&mut self) {
        self.disarm_timer();
        self.timer = Some(
            self.scheduler
                .schedule_repeating(self.difficulty.tick_interval()),
        );
    }

    fn disarm_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn render(&mut self) {
        let view = FrameView {
            grid: self.grid,
            snake: &self.snake,
            food: self.food.position,
        };
        self.renderer.on_frame(&view);
    }
}

impl<R, F, S, T> Engine<R, F, S, T> {
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.difficulty.tick_interval()
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.food
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    /// Successful moves in the current game.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Handle of the armed schedule, if any.
    #[must_use]
    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            lifecycle: self.lifecycle,
            score: self.score,
            high_score: self.high_score,
            previous_high_score: self.previous_high_score,
            difficulty: self.difficulty,
            snake_len: self.snake.len(),
            tick_count: self.tick_count,
            game_over_reason: self.game_over_reason,
        }
    }

    #[must_use]
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            grid: self.grid,
            snake: &self.snake,
            food: self.food.position,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }
}

/// Food for a fresh board. A legal grid always leaves room beside the starting snake.
fn initial_food(rng: &mut StdRng, grid: Grid, snake: &Snake) -> Food {
    Food::spawn(rng, grid, snake).unwrap_or_else(|| {
        log::warn!("no free cell for food on a fresh board");
        Food::new(grid.center())
    })
}
