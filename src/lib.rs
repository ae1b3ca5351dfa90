//! BioSnake - a pointer-steered organism simulation for the terminal
//!
//! This library provides:
//! - Core simulation logic (game module): steering, chain kinematics, food, collisions
//! - Scene composition and TUI rendering (render module)
//! - Mouse and keyboard input (input module)
//! - Evolution and obituary flavor text (commentary module)
//! - The per-run simulation context (session module)
//! - The interactive terminal mode (modes module)

pub mod commentary;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
pub mod settings;
