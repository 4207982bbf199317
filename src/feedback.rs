use std::io::{self, Write};

/// Gameplay moments a front end may acknowledge with a sound or flash.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Cue {
    Start,
    Eat,
    GameOver,
}

/// Fire-and-forget receiver of gameplay cues.
pub trait FeedbackSink {
    fn on_event(&mut self, cue: Cue);
}

impl FeedbackSink for () {
    fn on_event(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell on `Eat` and `GameOver`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    muted: bool,
}

impl TerminalBell {
    #[must_use]
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    #[must_use]
    pub fn rings_for(self, cue: Cue) -> bool {
        !self.muted && matches!(cue, Cue::Eat | Cue::GameOver)
    }
}

impl FeedbackSink for TerminalBell {
    fn on_event(&mut self, cue: Cue) {
        if !self.rings_for(cue) {
            return;
        }

        let mut stdout = io::stdout();
        if let Err(error) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            log::warn!("terminal bell failed: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cue, TerminalBell};

    #[test]
    fn bell_skips_start_and_respects_mute() {
        let bell = TerminalBell::new(false);
        assert!(!bell.rings_for(Cue::Start));
        assert!(bell.rings_for(Cue::Eat));
        assert!(bell.rings_for(Cue::GameOver));

        let muted = TerminalBell::new(true);
        assert!(!muted.rings_for(Cue::GameOver));
    }
}
