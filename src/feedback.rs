//! Fire-and-forget sound and haptic cues

use std::io::{Stderr, Write, stderr};

/// Receiver for gameplay cues. Implementations must not block and must not
/// fail the game; errors are swallowed.
pub trait Feedback: Send {
    /// Snake ate food (the "crunch")
    fn food_eaten(&mut self);

    /// A direction change was accepted (light tap)
    fn direction_changed(&mut self) {}
}

/// Feedback sink that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Feedback for Silent {
    fn food_eaten(&mut self) {}
}

/// Rings the terminal bell when food is eaten
pub struct TerminalBell<W: Write + Send = Stderr> {
    out: W,
}

impl TerminalBell<Stderr> {
    pub fn new() -> Self {
        Self { out: stderr() }
    }
}

impl Default for TerminalBell<Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Feedback for TerminalBell<W> {
    fn food_eaten(&mut self) {
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}
