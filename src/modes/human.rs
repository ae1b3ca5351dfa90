use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{stderr, Stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::commentary::CommentaryService;
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction, PointerCell};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::Session;

/// Simulation ticks at ~60 Hz
const TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Render at 30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    pointer: Arc<PointerCell>,
    /// Canvas rect from the last layout, for mapping mouse cells
    canvas: Rect,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(
        config: GameConfig,
        service: Arc<dyn CommentaryService>,
        commentary_timeout: Duration,
    ) -> Self {
        let session = Session::new(config, service, commentary_timeout);
        // Start with the pointer dead ahead so the organism glides forward
        let head = session.state().head_position();
        let pointer = Arc::new(PointerCell::new(head.advanced(0.0, 100.0)));

        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pointer,
            canvas: Rect::default(),
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

        self.canvas = self.renderer.layout(terminal.get_frame().area()).canvas;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(TICK_INTERVAL);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut render_timer = interval(RENDER_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Simulation tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.canvas = self.renderer.layout(frame.area()).canvas;
                        self.renderer.render(frame, &self.session, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
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
            Event::Mouse(mouse) => {
                if let Some(point) =
                    self.input_handler
                        .handle_mouse_event(mouse, self.canvas, self.session.viewport())
                {
                    self.pointer.store(point);
                }
            }
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Restart => self.reset_game(),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Resize(width, height) => {
                self.canvas = self.renderer.layout(Rect::new(0, 0, width, height)).canvas;
            }
            _ => {}
        }
    }

    fn update_game(&mut self) {
        let pointer = self.pointer.load();
        if let Some(event) = self.session.tick(pointer) {
            self.metrics.on_run_end(&event);
        }
    }

    fn reset_game(&mut self) {
        self.session.reset();
        self.metrics.on_run_start();
        let head = self.session.state().head_position();
        self.pointer.store(head.advanced(0.0, 100.0));
        info!(epoch = self.session.epoch(), "player restarted");
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
    use crate::commentary::OfflineCommentary;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

    fn mode() -> HumanMode {
        HumanMode::new(
            GameConfig::seeded(8),
            Arc::new(OfflineCommentary),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(!mode.session.state().is_terminated);
        assert_eq!(mode.session.state().score, 0);
        assert_eq!(mode.pointer.load().x, 580.0);
    }

    #[test]
    fn test_mouse_moves_pointer() {
        let mut mode = mode();
        mode.canvas = Rect::new(0, 0, 96, 54);

        mode.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));

        let pointer = mode.pointer.load();
        assert!((pointer.x - 5.0).abs() < 1e-3);
        assert!((pointer.y - 5.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_game_reset() {
        let mut mode = mode();
        mode.update_game();
        assert_eq!(mode.session.frame(), 1);

        mode.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('r'),
            KeyModifiers::NONE,
        )));

        assert_eq!(mode.session.epoch(), 1);
        assert_eq!(mode.session.state().steps, 0);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(mode.should_quit);
    }
}
