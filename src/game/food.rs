use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::geometry::{Point, Viewport};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// What kind of meal a food item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Fruit,
    Insect,
    /// Reserved for event food; never spawned
    Special,
}

/// Colour token the renderer resolves to a concrete colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    Red,
    Amber,
    Violet,
}

/// A consumable item on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub kind: FoodKind,
    pub color: ColorToken,
    pub value: u32,
}

impl Food {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Produces food at random spots inside the viewport
///
/// Owns its RNG so that a seeded spawner replays the exact same sequence of
/// meals, which is what the scenario tests lean on.
pub struct FoodSpawner {
    rng: ChaCha8Rng,
    margin: f64,
    fruit_value: u32,
    insect_value: u32,
}

impl FoodSpawner {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            rng,
            margin: config.spawn_margin,
            fruit_value: config.fruit_value,
            insect_value: config.insect_value,
        }
    }

    /// Spawn one food item somewhere inside the inset rectangle
    pub fn spawn(&mut self, viewport: Viewport) -> Food {
        let kind = if self.rng.gen_bool(0.5) {
            FoodKind::Fruit
        } else {
            FoodKind::Insect
        };

        let x = self.sample_axis(viewport.width);
        let y = self.sample_axis(viewport.height);

        Food {
            id: self.next_id(),
            x,
            y,
            kind,
            color: self.color_for(kind),
            value: self.value_for(kind),
        }
    }

    /// Spawn the opening batch of `count` items
    pub fn spawn_batch(&mut self, viewport: Viewport, count: usize) -> Vec<Food> {
        (0..count).map(|_| self.spawn(viewport)).collect()
    }

    pub fn value_for(&self, kind: FoodKind) -> u32 {
        match kind {
            FoodKind::Fruit => self.fruit_value,
            FoodKind::Insect => self.insect_value,
            FoodKind::Special => self.insect_value * 2,
        }
    }

    pub fn color_for(&self, kind: FoodKind) -> ColorToken {
        match kind {
            FoodKind::Fruit => ColorToken::Red,
            FoodKind::Insect => ColorToken::Amber,
            FoodKind::Special => ColorToken::Violet,
        }
    }

    /// Uniform coordinate in `[margin, extent - margin)`, or the middle of the
    /// axis when it is too narrow to hold the margin
    fn sample_axis(&mut self, extent: f64) -> f64 {
        let low = self.margin;
        let high = extent - self.margin;
        if high > low {
            self.rng.gen_range(low..high)
        } else {
            extent / 2.0
        }
    }

    fn next_id(&mut self) -> String {
        (0..ID_LEN)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}
