//! Swipe recognition for pointer drags
//!
//! A drag shorter than [`MIN_SWIPE_DISTANCE`] points is ignored. Longer drags
//! turn the snake along the dominant axis; equal axes count as vertical.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Minimum drag length, in points, recognized as a swipe
pub const MIN_SWIPE_DISTANCE: f32 = 10.0;

/// Points covered by one terminal column
pub const POINTS_PER_COLUMN: f32 = 4.0;
/// Points covered by one terminal row (rows are about twice as tall)
pub const POINTS_PER_ROW: f32 = 8.0;

/// Direction for a drag of (`dx`, `dy`) points, y growing downwards
pub fn swipe_direction(dx: f32, dy: f32) -> Option<Direction> {
    if dx.hypot(dy) < MIN_SWIPE_DISTANCE {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Turns left-button drags in the terminal into swipes
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a mouse event; returns a direction when a drag ends as a swipe
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row) = self.origin.take()?;
                let dx = (f32::from(event.column) - f32::from(column)) * POINTS_PER_COLUMN;
                let dy = (f32::from(event.row) - f32::from(row)) * POINTS_PER_ROW;
                swipe_direction(dx, dy)
            }
            _ => None,
        }
    }
}
