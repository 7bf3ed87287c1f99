//! Per-game rule sets for the two dodgers
//!
//! Both dodgers run the same tick; everything that differs between them is
//! data in a [`Ruleset`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GameKind;
use crate::consts::*;

/// Obstacle sprite identity (renderers map this to an image)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Spreadsheet,
    Flowers,
    Invitation,
    Rings,
    Tux,
    List,
}

impl ObstacleKind {
    /// Asset name for renderers
    pub fn sprite(&self) -> &'static str {
        match self {
            ObstacleKind::Spreadsheet => "spreadsheet",
            ObstacleKind::Flowers => "flowers",
            ObstacleKind::Invitation => "invitation",
            ObstacleKind::Rings => "rings",
            ObstacleKind::Tux => "tux",
            ObstacleKind::List => "list",
        }
    }
}

/// Where the laser appears relative to the player box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserOrigin {
    /// Horizontally centered on the player's top edge
    TopCenter,
    /// Centered on the player
    Center,
}

/// Everything that differs between the two dodgers
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub laser_size: Vec2,
    pub laser_origin: LaserOrigin,
    /// Whether destroying an obstacle with the laser counts as avoided
    pub laser_hit_scores: bool,
    /// Spawnable obstacles and their sizes
    pub obstacle_pool: &'static [(ObstacleKind, f32)],
    /// Fraction of the player that must pass the bottom edge before wrapping
    pub bottom_wrap: f32,
    /// Per-tick spawn rate increase inside the ramp window
    pub ramp_spawn_step: f32,
    /// Per-tick speed increase inside the ramp window
    pub ramp_speed_step: f32,
}

const CLASSIC_POOL: &[(ObstacleKind, f32)] = &[
    (ObstacleKind::Spreadsheet, 60.0),
    (ObstacleKind::Flowers, 100.0),
    (ObstacleKind::Invitation, 60.0),
];

const SPECIAL_DAY_POOL: &[(ObstacleKind, f32)] = &[
    (ObstacleKind::Flowers, 100.0),
    (ObstacleKind::Spreadsheet, 50.0),
    (ObstacleKind::Invitation, 60.0),
    (ObstacleKind::Rings, 40.0),
    (ObstacleKind::Tux, 100.0),
    (ObstacleKind::List, 50.0),
];

/// Ramp spread so the full range is covered in 30 seconds
const RAMP_TICKS: f32 = 30.0 * TICKS_PER_SECOND as f32;

impl Ruleset {
    pub fn classic() -> Self {
        Self {
            laser_size: Vec2::new(20.0, 40.0),
            laser_origin: LaserOrigin::TopCenter,
            laser_hit_scores: false,
            obstacle_pool: CLASSIC_POOL,
            bottom_wrap: 0.65,
            ramp_spawn_step: (MAX_SPAWN_RATE - BASE_SPAWN_RATE) / RAMP_TICKS,
            ramp_speed_step: (MAX_OBSTACLE_SPEED - BASE_OBSTACLE_SPEED) / RAMP_TICKS,
        }
    }

    pub fn special_day() -> Self {
        Self {
            laser_size: Vec2::new(5.0, 5.0),
            laser_origin: LaserOrigin::Center,
            laser_hit_scores: true,
            obstacle_pool: SPECIAL_DAY_POOL,
            bottom_wrap: WRAP_THRESHOLD,
            ramp_spawn_step: 0.001,
            ramp_speed_step: 0.01,
        }
    }

    /// Rules for a dodger game; the maze has no dodger rules and falls back
    /// to Special Day.
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::Classic => Self::classic(),
            GameKind::SpecialDay | GameKind::Maze => Self::special_day(),
        }
    }

    /// Laser spawn position for a player at `player_pos`
    pub fn laser_spawn(&self, player_pos: Vec2) -> Vec2 {
        // Offsets are whole pixels, matching sprite-grid placement
        let half_player = (PLAYER_SIZE / 2.0).floor();
        let half_w = (self.laser_size.x / 2.0).floor();
        let half_h = (self.laser_size.y / 2.0).floor();
        match self.laser_origin {
            LaserOrigin::TopCenter => Vec2::new(player_pos.x + half_player - half_w, player_pos.y),
            LaserOrigin::Center => Vec2::new(
                player_pos.x + half_player - half_w,
                player_pos.y + half_player - half_h,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_laser_from_top() {
        let rules = Ruleset::classic();
        let pos = rules.laser_spawn(Vec2::new(10.0, 250.0));
        assert_eq!(pos, Vec2::new(50.0, 250.0));
    }

    #[test]
    fn test_special_day_laser_from_center() {
        let rules = Ruleset::special_day();
        let pos = rules.laser_spawn(Vec2::new(10.0, 250.0));
        assert_eq!(pos, Vec2::new(58.0, 298.0));
    }

    #[test]
    fn test_pools() {
        assert_eq!(Ruleset::classic().obstacle_pool.len(), 3);
        assert_eq!(Ruleset::special_day().obstacle_pool.len(), 6);
        assert!(Ruleset::special_day().obstacle_pool.iter().all(|&(_, size)| size <= 100.0));
    }

    #[test]
    fn test_classic_ramp_covers_range_in_thirty_seconds() {
        let rules = Ruleset::classic();
        let total = rules.ramp_speed_step * 30.0 * 60.0;
        assert!((total - 2.0).abs() < 1e-3);
    }
}
