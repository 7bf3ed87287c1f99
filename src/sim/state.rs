//! Dodger game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::difficulty::{Difficulty, SpecialEvent};
use super::rules::{ObstacleKind, Ruleset};
use crate::GameKind;
use crate::consts::*;

/// Current phase of a dodger round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player was caught; the round is frozen
    GameOver,
}

/// Things that happened during a tick, for audio/visual layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LaserFired,
    /// An obstacle left the screen on the trailing edge
    ObstacleAvoided,
    /// An obstacle was destroyed by the laser
    ObstacleLasered,
    /// "It's my special day!" - spawn boost begins
    SpecialEvent,
    /// The player was caught; round over
    Caught,
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: PLAYER_SIZE,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Clamp horizontally and wrap vertically.
    ///
    /// The player may leave the top edge by `WRAP_THRESHOLD` of its size
    /// before reappearing at the bottom, and leaves the bottom once
    /// `bottom_wrap` of its size remains on screen.
    pub fn wrap(&mut self, bottom_wrap: f32) {
        let top_exit = self.size * WRAP_THRESHOLD;
        let bottom_exit = self.size * bottom_wrap;

        if self.pos.y < -top_exit {
            self.pos.y = SCREEN_HEIGHT - bottom_exit;
        } else if self.pos.y + bottom_exit > SCREEN_HEIGHT {
            self.pos.y = -top_exit;
        }

        self.pos.x = self.pos.x.clamp(0.0, SCREEN_WIDTH - self.size);
    }
}

/// Trail point for laser rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// The player's laser projectile (at most one on screen)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Recent positions, oldest first
    pub trail: Vec<TrailPoint>,
}

impl Laser {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Record the current position, then move right.
    /// Returns false once the laser has left the screen.
    pub fn advance(&mut self) -> bool {
        self.trail.push(TrailPoint { pos: self.pos });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
        self.pos.x += LASER_SPEED;
        self.pos.x <= SCREEN_WIDTH
    }
}

/// An incoming obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Whether the obstacle has fully left the screen on the left
    pub fn is_past_trailing_edge(&self) -> bool {
        self.pos.x + self.size < 0.0
    }
}

/// Complete state of one dodger round
#[derive(Debug, Clone)]
pub struct GameState {
    pub kind: GameKind,
    pub rules: Ruleset,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub laser: Option<Laser>,
    /// Active obstacles (in spawn order)
    pub obstacles: Vec<Obstacle>,
    pub difficulty: Difficulty,
    pub special: SpecialEvent,
    /// Obstacles avoided or destroyed (the score)
    pub tasks_avoided: u32,
    /// Events from the most recent ticks, drained by frontends
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new round of the given dodger with the given seed
    pub fn new(kind: GameKind, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let special = SpecialEvent::new(&mut rng);
        Self {
            kind,
            rules: Ruleset::for_game(kind),
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::default(),
            laser: None,
            obstacles: Vec::new(),
            difficulty: Difficulty::default(),
            special,
            tasks_avoided: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whether the special-event banner should be drawn
    pub fn banner_visible(&self) -> bool {
        self.special.banner_visible(self.time_ticks)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
