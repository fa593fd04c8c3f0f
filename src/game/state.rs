use super::action::Direction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Bounded rectangular play area, measured in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Quantize a pixel play area into cells of `cell_size`, leaving `inset`
    /// pixels free on every side. Always yields at least one cell.
    pub fn from_play_area(width_px: f32, height_px: f32, cell_size: f32, inset: f32) -> Self {
        let cells = |extent: f32| {
            let usable = (extent - 2.0 * inset).max(0.0);
            if cell_size > 0.0 {
                ((usable / cell_size).floor() as usize).max(1)
            } else {
                1
            }
        };
        Self::new(cells(width_px), cells(height_px))
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Fold a position that left the grid back in from the opposite edge
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(
            pos.x.rem_euclid(self.width as i32),
            pos.y.rem_euclid(self.height as i32),
        )
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: VecDeque<Position>,
    /// Direction applied on the last tick
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = VecDeque::with_capacity(length.max(1));
        body.push_back(head);

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push_back(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check whether a head moving onto `pos` would hit the body.
    ///
    /// Unless the snake is growing, the tail cell is vacated in the same
    /// tick and does not count.
    pub fn would_collide(&self, pos: Position, growing: bool) -> bool {
        let checked = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(checked).any(|&segment| segment == pos)
    }

    /// Put a new head on the snake, dropping the tail unless it grows
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// What occupies a cell in a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Head,
    Body,
    /// Body segment lying over food that was eaten recently
    Digesting,
    Food,
}

/// Immutable picture of the game handed to renderers after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Position,
    /// Cells of recently eaten food that are still under the body
    pub digesting: Vec<Position>,
    pub score: u32,
    pub direction: Direction,
    pub status: GameStatus,
    pub ticks: u64,
}

impl Snapshot {
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn cell(&self, pos: Position) -> CellKind {
        if pos == self.head() {
            CellKind::Head
        } else if self.snake.contains(&pos) {
            if self.digesting.contains(&pos) {
                CellKind::Digesting
            } else {
                CellKind::Body
            }
        } else if pos == self.food {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }
}
