use std::iter;

use super::{
    collision::{self, CollisionType},
    config::GameConfig,
    food::{Food, FoodSpawner},
    geometry::{self, Point, Viewport},
    state::{GameState, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Food eaten this step, if any
    pub eaten: Option<Food>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Emitted exactly once per run, on the step that ends it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminationEvent {
    pub score: u32,
    pub length_stat: u32,
    pub cause: CollisionType,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The snapshot to commit
    pub state: GameState,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn frozen(state: GameState) -> Self {
        Self {
            state,
            terminated: true,
            info: StepInfo {
                eaten: None,
                collision_type: None,
            },
        }
    }

    /// The termination event, if this step ended the run
    pub fn termination(&self) -> Option<TerminationEvent> {
        self.info.collision_type.map(|cause| TerminationEvent {
            score: self.state.score,
            length_stat: self.state.length_stat,
            cause,
        })
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    spawner: FoodSpawner,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let spawner = FoodSpawner::new(&config);
        Self { config, spawner }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state in the configured viewport
    pub fn reset(&mut self) -> GameState {
        let viewport = self.config.viewport();
        self.reset_in(viewport)
    }

    /// Reset the game to initial state, centred in `viewport`
    pub fn reset_in(&mut self, viewport: Viewport) -> GameState {
        let snake = Snake::new(
            viewport.center(),
            0.0,
            self.config.initial_length,
            self.config.segment_spacing,
        );
        let food = self.spawner.spawn_batch(viewport, self.config.food_count);
        let length_stat = u32::try_from(self.config.initial_length).unwrap_or(u32::MAX);

        GameState::new(
            snake,
            food,
            length_stat,
            self.config.speed_for(length_stat),
            self.config.initial_species.clone(),
        )
    }

    /// Execute one step of the game
    ///
    /// `state` is never modified; the next snapshot comes back in the result.
    pub fn step(&mut self, state: &GameState, pointer: Point, viewport: Viewport) -> StepResult {
        if state.is_terminated {
            return StepResult::frozen(state.clone());
        }

        // Steer toward the pointer, keeping the heading when it sits on the head
        let mut head = state.snake.head();
        if let Some(target) = geometry::bearing(head.position(), pointer) {
            let steered = geometry::steer_toward(head.angle, target, self.config.turn_rate);
            head.angle = geometry::normalize_angle_delta(steered);
        }

        let moved = head.position().advanced(head.angle, state.speed);
        head.x = moved.x;
        head.y = moved.y;

        if !collision::in_bounds(moved, viewport) {
            let mut next = state.clone();
            next.is_terminated = true;
            next.steps += 1;

            return StepResult {
                state: next,
                terminated: true,
                info: StepInfo {
                    eaten: None,
                    collision_type: Some(CollisionType::Wall),
                },
            };
        }

        // Each segment chases the one ahead of it, already moved this step
        let mut segments = Vec::with_capacity(state.snake.len() + self.config.segments_per_meal);
        segments.push(head);
        for &follower in &state.snake.segments[1..] {
            let leader = segments[segments.len() - 1].position();
            segments.push(geometry::chase(
                leader,
                follower,
                self.config.segment_spacing,
            ));
        }

        let mut food = state.food.clone();
        let mut score = state.score;
        let mut length_stat = state.length_stat;
        let mut speed = state.speed;
        let mut eaten = None;

        if let Some(index) = collision::find_food(moved, &food, self.config.pickup_radius) {
            let meal = food.remove(index);
            food.push(self.spawner.spawn(viewport));

            score = score.saturating_add(meal.value);
            length_stat = length_stat.saturating_add(self.config.growth_per_meal);
            speed = self.config.speed_for(length_stat);

            let tail = segments[segments.len() - 1];
            segments.extend(iter::repeat(tail).take(self.config.segments_per_meal));

            eaten = Some(meal);
        }

        let bitten = collision::hits_body(
            moved,
            &segments,
            self.config.self_collision_skip,
            self.config.self_collision_radius,
        );

        let next = GameState {
            snake: Snake { segments },
            food,
            speed,
            score,
            length_stat,
            steps: state.steps + 1,
            is_terminated: bitten,
            species: state.species.clone(),
            evolution_history: state.evolution_history.clone(),
        };

        StepResult {
            state: next,
            terminated: bitten,
            info: StepInfo {
                eaten,
                collision_type: bitten.then_some(CollisionType::SelfCollision),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::food::{ColorToken, FoodKind};
    use crate::game::geometry::Segment;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn food_at(id: &str, x: f64, y: f64, value: u32) -> Food {
        Food {
            id: id.to_string(),
            x,
            y,
            kind: FoodKind::Fruit,
            color: ColorToken::Red,
            value,
        }
    }

    fn far_food() -> Vec<Food> {
        vec![
            food_at("a", 700.0, 500.0, 5),
            food_at("b", 650.0, 520.0, 5),
            food_at("c", 720.0, 450.0, 12),
        ]
    }

    fn state_with(snake: Snake, food: Vec<Food>, speed: f64) -> GameState {
        GameState::new(snake, food, 15, speed, "Primitive Hatchling")
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let state = engine.reset();

        assert!(!state.is_terminated);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 15);
        assert_eq!(state.food.len(), 3);
        assert_eq!(state.length_stat, 15);
        assert!((state.speed - 2.65).abs() < EPS);
        assert_eq!(state.head_position(), Point::new(480.0, 270.0));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let snake = Snake::new(Point::new(100.0, 100.0), 0.0, 3, 8.0);
        let state = state_with(snake, far_food(), 5.0);

        let result = engine.step(&state, Point::new(200.0, 100.0), viewport());
        let head = result.state.snake.head();

        assert!(!result.terminated);
        assert!((head.x - 105.0).abs() < EPS);
        assert!((head.y - 100.0).abs() < EPS);
        assert_eq!(result.state.steps, 1);
        // The input snapshot is untouched
        assert_eq!(state.snake.head().x, 100.0);
    }

    #[test]
    fn test_body_follows_head() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let snake = Snake::new(Point::new(100.0, 100.0), 0.0, 4, 8.0);
        let state = state_with(snake, far_food(), 5.0);

        let result = engine.step(&state, Point::new(200.0, 100.0), viewport());
        let segments = &result.state.snake.segments;

        for pair in segments.windows(2) {
            let gap = pair[1].distance_to(pair[0].position());
            assert!((gap - 8.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pointer_on_head_keeps_heading() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let snake = Snake::new(Point::new(100.0, 100.0), 0.5, 3, 8.0);
        let state = state_with(snake, far_food(), 2.0);

        let result = engine.step(&state, Point::new(100.0, 100.0), viewport());
        assert_eq!(result.state.snake.head().angle, 0.5);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let snake = Snake::new(Point::new(0.5, 300.0), PI, 3, 8.0);
        let mut state = state_with(snake, far_food(), 5.0);
        state.score = 17;

        let result = engine.step(&state, Point::new(-100.0, 300.0), viewport());

        assert!(result.terminated);
        assert!(result.state.is_terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(result.state.snake, state.snake);

        let event = result.termination().unwrap();
        assert_eq!(event.score, 17);
        assert_eq!(event.length_stat, 15);
        assert_eq!(event.cause, CollisionType::Wall);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::new(GameConfig::seeded(9));
        let snake = Snake::new(Point::new(100.0, 100.0), 0.0, 15, 8.0);
        let food = vec![
            food_at("untouched-1", 700.0, 500.0, 5),
            food_at("meal", 110.0, 100.0, 12),
            food_at("untouched-2", 650.0, 520.0, 5),
        ];
        let state = state_with(snake, food, 5.0);

        let result = engine.step(&state, Point::new(200.0, 100.0), viewport());
        let next = &result.state;

        assert_eq!(result.info.eaten.as_ref().unwrap().id, "meal");
        assert_eq!(next.food.len(), 3);
        assert!(next.food.iter().all(|f| f.id != "meal"));
        assert!(next.food.iter().any(|f| f.id == "untouched-1"));
        assert!(next.food.iter().any(|f| f.id == "untouched-2"));
        assert_eq!(next.score, 12);
        assert_eq!(next.length_stat, 17);
        assert_eq!(next.snake.len(), 17);
        assert!((next.speed - 2.67).abs() < EPS);

        // New segments are clones of the tail
        let tail = next.snake.segments[14];
        assert_eq!(next.snake.segments[15], tail);
        assert_eq!(next.snake.segments[16], tail);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        // A tightly coiled body: every segment stacked under the head
        let snake = Snake {
            segments: vec![Segment::new(100.0, 100.0, 0.0); 25],
        };
        let state = state_with(snake, far_food(), 5.0);

        let result = engine.step(&state, Point::new(200.0, 100.0), viewport());

        assert!(result.terminated);
        assert!(result.state.is_terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(result.termination().unwrap().length_stat, 15);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::new(GameConfig::seeded(1));
        let mut state = engine.reset();
        state.is_terminated = true;

        for pointer in [Point::new(0.0, 0.0), Point::new(900.0, 10.0)] {
            let result = engine.step(&state, pointer, viewport());
            assert!(result.terminated);
            assert_eq!(result.termination(), None);
            assert_eq!(result.state, state);
        }
    }

    #[test]
    fn test_food_count_and_score_invariants() {
        let mut engine = GameEngine::new(GameConfig::seeded(5));
        let viewport = GameConfig::default().viewport();
        let mut state = engine.reset();

        for _ in 0..2_000 {
            if state.is_terminated {
                break;
            }
            // Chase whichever food is listed first
            let target = state.food[0].position();
            let result = engine.step(&state, target, viewport);

            assert_eq!(result.state.food.len(), 3);
            assert!(result.state.score >= state.score);
            assert!(result.state.speed >= state.speed);
            assert!(result.state.snake.len() >= state.snake.len());
            state = result.state;
        }
        assert!(state.score > 0);
    }
}
