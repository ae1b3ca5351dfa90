use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::game::{Point, Viewport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::Restart,
            _ => KeyAction::None,
        }
    }

    /// Translate a mouse event over `canvas` into a viewport-space pointer.
    ///
    /// Cells outside the canvas still map (to coordinates beyond the edges) so
    /// the organism keeps chasing a pointer that has left the play area.
    pub fn handle_mouse_event(
        &self,
        mouse: MouseEvent,
        canvas: Rect,
        viewport: Viewport,
    ) -> Option<Point> {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                cell_to_viewport(mouse.column, mouse.row, canvas, viewport)
            }
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Centre of terminal cell (`column`, `row`) in viewport coordinates
pub fn cell_to_viewport(column: u16, row: u16, canvas: Rect, viewport: Viewport) -> Option<Point> {
    if canvas.width == 0 || canvas.height == 0 {
        return None;
    }

    let fx = (f64::from(column) - f64::from(canvas.x) + 0.5) / f64::from(canvas.width);
    let fy = (f64::from(row) - f64::from(canvas.y) + 0.5) / f64::from(canvas.height);
    Some(Point::new(fx * viewport.width, fy * viewport.height))
}
