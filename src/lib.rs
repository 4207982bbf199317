pub mod config;
pub mod feedback;
pub mod food;
pub mod frame;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
