//! Special Day - three small arcade games sharing one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (dodger rounds, maze rounds, collisions)
//! - `leaderboard`: Top-5 score list and initials entry
//! - `session`: Title / playing / name entry / leaderboard flow
//! - `persistence`: JSON storage (files natively, LocalStorage on web)
//! - `settings`: Player preferences
//! - `platform`: Clock and seeding helpers

pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use leaderboard::{Initials, InitialsEntry, Leaderboard};
pub use session::{Round, Session, SessionKey, SessionPhase};
pub use settings::{Settings, SoundCue};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 100.0;
    pub const PLAYER_START_X: f32 = 10.0;
    pub const PLAYER_START_Y: f32 = SCREEN_HEIGHT / 2.0 - PLAYER_SIZE / 2.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Fraction of the player that may leave the top edge before wrapping
    pub const WRAP_THRESHOLD: f32 = 0.35;

    /// Laser speed (pixels per tick)
    pub const LASER_SPEED: f32 = 7.0;
    /// Laser trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 10;

    /// Obstacle speed (pixels per tick)
    pub const BASE_OBSTACLE_SPEED: f32 = 2.0;
    pub const MAX_OBSTACLE_SPEED: f32 = 4.0;
    /// Per-tick speed increase (0.005 spread over one second)
    pub const SPEED_INCREMENT: f32 = 0.005 / TICKS_PER_SECOND as f32;

    /// Spawn probability per tick
    pub const BASE_SPAWN_RATE: f32 = 0.02;
    pub const MAX_SPAWN_RATE: f32 = 0.12;
    /// Boosted spawn rate during a special event (triple, capped at 0.1)
    pub const BOOST_SPAWN_RATE: f32 = if BASE_SPAWN_RATE * 3.0 < 0.1 {
        BASE_SPAWN_RATE * 3.0
    } else {
        0.1
    };

    /// Special event timing (seconds)
    pub const SPECIAL_INTERVAL_MIN_SECS: u32 = 20;
    pub const SPECIAL_INTERVAL_MAX_SECS: u32 = 30;
    pub const SPECIAL_BOOST_SECS: u32 = 10;
    pub const SPECIAL_BANNER_SECS: u32 = 5;
    /// Difficulty ramps while 15s < time since last special < 45s
    pub const RAMP_WINDOW_START_SECS: u32 = 15;
    pub const RAMP_WINDOW_END_SECS: u32 = 45;

    /// Collision forgiveness (fraction of size trimmed per side)
    pub const COLLISION_BUFFER: f32 = 0.2;

    /// Leaderboard capacity
    pub const LEADERBOARD_SIZE: usize = 5;
}

/// Convert whole seconds to simulation ticks
#[inline]
pub const fn secs_to_ticks(secs: u32) -> u64 {
    secs as u64 * consts::TICKS_PER_SECOND as u64
}

/// Which of the three games is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    /// Original dodger: tall laser, three obstacle kinds
    Classic,
    /// Special Day Dodger: trailing laser, six obstacle kinds
    SpecialDay,
    /// Find-the-character maze against a countdown
    Maze,
}

impl GameKind {
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Classic | GameKind::SpecialDay => "Special Day Dodger",
            GameKind::Maze => "Maddie Paddy",
        }
    }

    /// Heading shown above the leaderboard
    pub fn leaderboard_heading(&self) -> &'static str {
        match self {
            GameKind::Classic => "LEADERBOARD - TASKS AVOIDED",
            GameKind::SpecialDay => "LEADERBOARD - MOST AVOIDANT LEGENDS",
            GameKind::Maze => "LEADERBOARD - LEAST PANICKY PERCY",
        }
    }

    /// Storage key for the leaderboard (file name natively).
    /// Both dodgers share one board.
    pub fn leaderboard_key(&self) -> &'static str {
        match self {
            GameKind::Classic | GameKind::SpecialDay => "leaderboard.json",
            GameKind::Maze => "leaderboard_2.json",
        }
    }

    /// Format a score for display (maze scores are remaining seconds)
    pub fn format_score(&self, score: u32) -> String {
        match self {
            GameKind::Classic | GameKind::SpecialDay => score.to_string(),
            GameKind::Maze => format!("{}:{:02}", score / 60, score % 60),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameKind::Classic),
            "special-day" | "specialday" | "special" => Some(GameKind::SpecialDay),
            "maze" => Some(GameKind::Maze),
            _ => None,
        }
    }
}
