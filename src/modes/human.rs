use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::render::Renderer;
use crate::session::Session;

/// Redraw rate, independent of the game speed
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal game
pub struct HumanMode {
    session: Session,
    tick_interval: Duration,
    renderer: Renderer,
    input_handler: InputHandler,
    swipes: SwipeTracker,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(session: Session, tick_interval: Duration) -> Self {
        Self {
            session,
            tick_interval,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipes: SwipeTracker::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut render_timer = interval(RENDER_INTERVAL);

        info!(tick_ms = self.tick_interval.as_millis() as u64, "game loop started");

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    if self.session.engine().is_running() {
                        self.session.tick();
                    }
                }

                _ = render_timer.tick() => {
                    let running = self.session.engine().is_running();
                    self.session.metrics_mut().update(running);
                    let snapshot = self.session.snapshot();
                    let high_score = self.session.high_score();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, high_score, self.session.metrics());
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action);
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.swipes.handle_mouse_event(mouse) {
                    self.apply(KeyAction::Turn(direction));
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                self.session.set_direction(direction);
            }
            KeyAction::Restart => {
                // Restarting mid-round would throw the score away
                if !self.session.engine().is_running() {
                    self.session.restart();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Silent;
    use crate::game::{Direction, GameConfig, SnakeEngine};
    use crate::storage::MemoryScoreStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn mode() -> HumanMode {
        let config = GameConfig::small();
        let session = Session::new(
            SnakeEngine::with_seed(&config, 5),
            Box::new(MemoryScoreStore::default()),
            Box::new(Silent),
            None,
        );
        HumanMode::new(session, config.tick_interval())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_turns_snake() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.session.engine().pending_direction(), Direction::Up);
    }

    #[test]
    fn test_swipe_turns_snake() {
        let mut mode = mode();
        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 20, 10));
        mode.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 13));
        assert_eq!(mode.session.engine().pending_direction(), Direction::Down);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut mode = mode();
        mode.session.tick();
        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.session.engine().ticks(), 1);
    }
}
