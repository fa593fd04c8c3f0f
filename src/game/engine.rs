use super::{
    action::Direction,
    config::GameConfig,
    state::{GameStatus, Grid, Position, Snake, Snapshot},
};
use rand::{SeedableRng, rngs::StdRng, seq::IteratorRandom};
use tracing::{debug, info, warn};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// The snake moved one cell and kept its length
    Moved,
    /// The snake moved onto the food and grew by one cell
    AteFood,
    /// The snake ran into itself; the round is over
    GameOver,
}

impl TickEvent {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickEvent::GameOver)
    }
}

/// Eaten food cell still travelling down the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Digesting {
    position: Position,
    remaining_ticks: usize,
}

/// The game engine that handles all game logic
///
/// The engine has no notion of time: whoever owns it calls [`tick`] at a
/// fixed rate and [`set_direction`] whenever input arrives in between.
///
/// [`tick`]: SnakeEngine::tick
/// [`set_direction`]: SnakeEngine::set_direction
pub struct SnakeEngine {
    grid: Grid,
    snake: Snake,
    food: Position,
    pending_direction: Direction,
    score: u32,
    ticks: u64,
    status: GameStatus,
    digesting: Vec<Digesting>,
    rng: StdRng,
}

impl SnakeEngine {
    /// Create a new engine, seeded from the config or from OS entropy
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(Grid::new(config.grid_width, config.grid_height), rng)
    }

    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(
            Grid::new(config.grid_width, config.grid_height),
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(grid: Grid, rng: StdRng) -> Self {
        let center = grid.center();
        let mut engine = Self {
            grid,
            snake: Snake::new(center, Direction::Right, 1),
            food: center,
            pending_direction: Direction::Right,
            score: 0,
            ticks: 0,
            status: GameStatus::Running,
            digesting: Vec::new(),
            rng,
        };
        engine.reset();
        engine
    }

    /// Reset the game to its initial state
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.center(), Direction::Right, 1);
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.ticks = 0;
        self.status = GameStatus::Running;
        self.digesting.clear();
        self.spawn_food();
        info!(
            width = self.grid.width,
            height = self.grid.height,
            "new round started"
        );
    }

    /// Buffer a direction for the next tick.
    ///
    /// Returns false when the request was dropped: either it reverses the
    /// direction the snake is currently travelling in, or the round is over.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status == GameStatus::GameOver || self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickEvent {
        if self.status == GameStatus::GameOver {
            return TickEvent::GameOver;
        }

        self.snake.direction = self.pending_direction;
        let new_head = self
            .grid
            .wrap(self.snake.head().moved_in_direction(self.snake.direction));
        let ate_food = new_head == self.food;

        if self.snake.would_collide(new_head, ate_food) {
            self.status = GameStatus::GameOver;
            info!(score = self.score, length = self.snake.len(), "snake hit itself");
            return TickEvent::GameOver;
        }

        self.digest();
        self.snake.advance_to(new_head, ate_food);
        self.ticks += 1;

        if !ate_food {
            return TickEvent::Moved;
        }

        self.score += 1;
        self.digesting.push(Digesting {
            position: new_head,
            remaining_ticks: self.snake.len(),
        });
        debug!(score = self.score, x = new_head.x, y = new_head.y, "food eaten");
        self.spawn_food();
        TickEvent::AteFood
    }

    /// Move the food to a uniformly random cell not covered by the snake.
    ///
    /// Free cells are enumerated rather than sampled, so this terminates on
    /// any board. A completely filled board leaves the food where it was.
    pub fn spawn_food(&mut self) {
        let snake = &self.snake;
        match self
            .grid
            .cells()
            .filter(|&cell| !snake.contains(cell))
            .choose(&mut self.rng)
        {
            Some(cell) => self.food = cell,
            None => warn!(length = self.snake.len(), "no free cell left for food"),
        }
    }

    /// Put the food on a specific free cell; returns false if the cell is
    /// outside the grid or under the snake
    pub fn place_food(&mut self, pos: Position) -> bool {
        if !self.grid.contains(pos) || self.snake.contains(pos) {
            return false;
        }
        self.food = pos;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            snake: self.snake.body.iter().copied().collect(),
            food: self.food,
            digesting: self.digesting.iter().map(|d| d.position).collect(),
            score: self.score,
            direction: self.snake.direction,
            status: self.status,
            ticks: self.ticks,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Direction applied on the last tick
    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Direction the next tick will use
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn digest(&mut self) {
        self.digesting.retain_mut(|d| {
            d.remaining_ticks -= 1;
            d.remaining_ticks > 0
        });
    }
}
