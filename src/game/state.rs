use super::direction::Direction;

/// A pixel position on the playing field, always block-aligned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position one block away in the given direction
    pub fn stepped(&self, direction: Direction, block: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * block,
            y: self.y + dy * block,
        }
    }
}

/// Snake body stored in a fixed-capacity slot array.
///
/// `body[0]` is the head. Only the first `len` slots are live; the slot at
/// `len` is slack and holds whatever the last shift left there (the
/// position the tail vacated). It never exceeds `capacity`, the number of
/// cells on the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: Vec<Position>,
    pub len: usize,
    /// Committed movement direction, updated once per tick
    pub direction: Direction,
}

impl Snake {
    /// A new two-segment snake parked at the origin
    pub fn new(capacity: usize) -> Self {
        Self {
            body: vec![Position::default(); capacity],
            len: 2,
            direction: Direction::Right,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Live segments, head first
    pub fn segments(&self) -> &[Position] {
        &self.body[..self.len]
    }

    pub fn capacity(&self) -> usize {
        self.body.len()
    }

    /// Shift every segment one slot toward the tail. The copy spills one
    /// slot past `len` when capacity allows, leaving the vacated tail
    /// position in the slack slot.
    pub fn shift(&mut self) {
        for i in (1..=self.len).rev() {
            if i < self.body.len() {
                self.body[i] = self.body[i - 1];
            }
        }
    }

    /// One movement step: shift the body, then move the head one block in
    /// `direction`, which becomes the committed direction.
    pub fn advance(&mut self, direction: Direction, block: i32) {
        self.shift();
        self.body[0] = self.body[0].stepped(direction, block);
        self.direction = direction;
    }

    /// Extend by one segment. The newly live slot already holds the
    /// position the last shift spilled into it, so the tail stays put.
    pub fn grow(&mut self) {
        if self.len < self.body.len() {
            self.len += 1;
        }
    }

    /// Head-against-body scan, from index `len` down to 1. Index `len` is
    /// the slack slot, so re-entering the cell the tail just vacated also
    /// counts as a collision.
    pub fn hits_self(&self) -> bool {
        for i in (1..=self.len).rev() {
            if i < self.body.len() && self.body[0] == self.body[i] {
                return true;
            }
        }
        false
    }
}

/// Whether a game is still accepting ticks. The transition to `Over` is
/// one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Over,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub run_state: RunState,
    /// Tick interval currently in effect, in milliseconds
    pub tick_ms: u64,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Point-in-time copy of everything the renderer needs. Built while
    /// the caller holds the state lock, so it is never torn.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            segments: self.snake.segments().to_vec(),
            food: self.food,
            score: self.score,
            run_state: self.run_state,
        }
    }
}

/// A consistent copy of the renderable state
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    /// Live segments only, head first
    pub segments: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub run_state: RunState,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }
}
