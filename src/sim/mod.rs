//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = 1/60 s)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod maze;
pub mod rules;
pub mod state;
pub mod tick;

pub use collision::{Aabb, forgiving_overlap};
pub use difficulty::{Difficulty, SpecialEvent};
pub use maze::{MazeError, MazeEvent, MazeGrid, MazePhase, MazeState};
pub use rules::{ObstacleKind, Ruleset};
pub use state::{GameEvent, GamePhase, GameState, Laser, Obstacle, Player, TrailPoint};
pub use tick::{TickInput, spawn_obstacle, tick};
