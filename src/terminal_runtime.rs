use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Theme;
use crate::frame::FrameView;
use crate::game::EngineStatus;
use crate::renderer;

type SnakeTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw-mode, alternate-screen terminal that draws engine frames in one theme.
///
/// The screen is restored when the session drops and when the process panics.
pub struct TerminalSession {
    terminal: SnakeTerminal,
    theme: &'static Theme,
}

impl TerminalSession {
    pub fn enter(theme: &'static Theme) -> io::Result<Self> {
        restore_screen_on_panic();
        take_over_screen()?;

        match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(terminal) => {
                log::debug!("terminal session started");
                Ok(Self { terminal, theme })
            }
            Err(error) => {
                let _ = release_screen();
                Err(error)
            }
        }
    }

    /// Redraws the board, HUD and any menu for the current engine state.
    pub fn draw(&mut self, view: &FrameView<'_>, status: &EngineStatus) -> io::Result<()> {
        let theme = self.theme;
        self.terminal
            .draw(|frame| renderer::render(frame, view, status, theme))?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = release_screen() {
            log::warn!("failed to restore terminal: {error}");
        }
    }
}

fn take_over_screen() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide).inspect_err(|_| {
        let _ = disable_raw_mode();
    })
}

fn release_screen() -> io::Result<()> {
    let raw_mode = disable_raw_mode();
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    raw_mode
}

fn restore_screen_on_panic() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = release_screen();
        previous(info);
    }));
}
