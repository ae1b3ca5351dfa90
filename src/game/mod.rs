//! Core simulation module
//!
//! This module contains all the simulation logic without any I/O or rendering dependencies.
//! Every step takes a snapshot and the live pointer and returns the next snapshot.

pub mod collision;
pub mod config;
pub mod engine;
pub mod food;
pub mod geometry;
pub mod milestone;
pub mod state;

// Re-export commonly used types
pub use collision::CollisionType;
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult, TerminationEvent};
pub use food::{ColorToken, Food, FoodKind, FoodSpawner};
pub use geometry::{Point, Segment, Viewport};
pub use milestone::Milestone;
pub use state::{GameState, Snake};
