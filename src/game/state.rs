use super::food::Food;
use super::geometry::{Point, Segment};

/// The player-controlled organism
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub segments: Vec<Segment>,
}

impl Snake {
    /// Lay out a straight body trailing away from `head` against `angle`
    pub fn new(head: Point, angle: f64, length: usize, spacing: f64) -> Self {
        let length = length.max(1);
        let segments = (0..length)
            .map(|i| {
                let back = head.advanced(angle, -(i as f64) * spacing);
                Segment::new(back.x, back.y, angle)
            })
            .collect();

        Self { segments }
    }

    /// Get the head segment
    pub fn head(&self) -> Segment {
        self.segments[0]
    }

    /// Get the tail segment (last segment)
    pub fn tail(&self) -> Segment {
        self.segments[self.segments.len() - 1]
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One complete, immutable snapshot of a run
///
/// The engine never edits a committed snapshot; each step builds the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Vec<Food>,
    /// Distance travelled per step
    pub speed: f64,
    pub score: u32,
    /// Organism length metric, grows in fixed increments per meal
    pub length_stat: u32,
    pub steps: u32,
    pub is_terminated: bool,
    /// Current species name, only ever changed by commentary replies
    pub species: String,
    /// Milestone labels already awarded, oldest first
    pub evolution_history: Vec<String>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Vec<Food>,
        length_stat: u32,
        speed: f64,
        species: impl Into<String>,
    ) -> Self {
        Self {
            snake,
            food,
            speed,
            score: 0,
            length_stat,
            steps: 0,
            is_terminated: false,
            species: species.into(),
            evolution_history: Vec::new(),
        }
    }

    pub fn head_position(&self) -> Point {
        self.snake.head().position()
    }

    /// Snapshot with a freshly awarded species
    pub fn evolved(&self, species: impl Into<String>, milestone: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.species = species.into();
        next.evolution_history.push(milestone.into());
        next
    }

    /// Distance from the head to the closest food item, if any
    pub fn nearest_food_distance(&self) -> Option<f64> {
        let head = self.snake.segments.first()?.position();
        self.food
            .iter()
            .map(|f| head.distance_to(f.position()))
            .min_by(|a, b| a.total_cmp(b))
    }
}
