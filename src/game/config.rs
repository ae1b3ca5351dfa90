use serde::{Deserialize, Serialize};

use super::geometry::Viewport;
use super::milestone::{self, Milestone};

/// Configuration for the simulation
///
/// Every tunable constant of the step engine lives here. Missing fields fall
/// back to the defaults when loaded from a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playable area
    pub viewport_width: f64,
    /// Height of the playable area
    pub viewport_height: f64,

    /// Number of body segments at spawn (also the starting `length_stat`)
    pub initial_length: usize,
    /// Distance each segment keeps from the one ahead of it
    pub segment_spacing: f64,
    /// Fraction of the angular gap to the pointer closed per step, in (0, 1]
    pub turn_rate: f64,

    /// Speed with zero length
    pub base_speed: f64,
    /// Length units per extra unit of speed. Larger values slow the ramp.
    pub speed_scale: f64,

    /// Food items kept alive at all times
    pub food_count: usize,
    /// Gap kept between spawned food and the viewport edges
    pub spawn_margin: f64,
    /// Score for a fruit
    pub fruit_value: u32,
    /// Score for an insect
    pub insect_value: u32,

    /// Head-to-food distance that counts as eating
    pub pickup_radius: f64,
    /// Head-to-body distance that counts as a self bite
    pub self_collision_radius: f64,
    /// Segments nearest the head excluded from self-collision
    pub self_collision_skip: usize,

    /// `length_stat` gained per meal
    pub growth_per_meal: u32,
    /// Body segments appended per meal
    pub segments_per_meal: usize,

    /// Species name before the first evolution
    pub initial_species: String,
    /// Evolution ladder, ascending by length
    pub milestones: Vec<Milestone>,

    /// Fixed RNG seed for reproducible food placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 540.0,
            initial_length: 15,
            segment_spacing: 8.0,
            turn_rate: 0.08,
            base_speed: 2.5,
            speed_scale: 100.0,
            food_count: 3,
            spawn_margin: 50.0,
            fruit_value: 5,
            insect_value: 12,
            pickup_radius: 25.0,
            self_collision_radius: 10.0,
            self_collision_skip: 20,
            growth_per_meal: 2,
            segments_per_meal: 2,
            initial_species: "Primitive Hatchling".to_string(),
            milestones: milestone::default_milestones(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom viewport size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Default::default()
        }
    }

    /// Default configuration with a fixed seed, for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Speed for a given organism length
    pub fn speed_for(&self, length_stat: u32) -> f64 {
        self.base_speed + f64::from(length_stat) / self.speed_scale
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            ));
        }

        if self.initial_length == 0 {
            return Err("initial_length must be at least 1".to_string());
        }

        if !(self.turn_rate > 0.0 && self.turn_rate <= 1.0) {
            return Err(format!(
                "turn_rate must be in (0, 1], got {}",
                self.turn_rate
            ));
        }

        if self.segment_spacing <= 0.0 {
            return Err(format!(
                "segment_spacing must be positive, got {}",
                self.segment_spacing
            ));
        }

        if self.base_speed < 0.0 {
            return Err(format!(
                "base_speed must be non-negative, got {}",
                self.base_speed
            ));
        }

        if self.speed_scale <= 0.0 {
            return Err(format!(
                "speed_scale must be positive, got {}",
                self.speed_scale
            ));
        }

        if self.food_count == 0 {
            return Err("food_count must be at least 1".to_string());
        }

        if self.pickup_radius <= 0.0 || self.self_collision_radius <= 0.0 {
            return Err("collision radii must be positive".to_string());
        }

        if self.self_collision_radius >= self.pickup_radius {
            return Err(format!(
                "self_collision_radius ({}) must be smaller than pickup_radius ({})",
                self.self_collision_radius, self.pickup_radius
            ));
        }

        // Index 0 is the head itself
        if self.self_collision_skip == 0 {
            return Err("self_collision_skip must be at least 1".to_string());
        }

        if !milestone::is_ascending(&self.milestones) {
            return Err("milestones must be strictly ascending by length".to_string());
        }

        Ok(())
    }
}
