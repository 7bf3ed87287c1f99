//! Idle/demo mode - a simple bot that plays a dodger round
//!
//! Purely a function of the current state, so autoplayed rounds stay
//! deterministic for a given seed.

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// How far ahead of the player obstacles are considered threats (pixels)
const LOOKAHEAD: f32 = 260.0;
/// Extra vertical clearance kept around the player's hitbox
const CLEARANCE: f32 = 12.0;

/// Pick held keys for the next tick
pub fn steer(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;
    let hitbox = player.bounds().inset(COLLISION_BUFFER);
    let top = hitbox.min.y - CLEARANCE;
    let bottom = hitbox.max().y + CLEARANCE;
    let center_y = hitbox.center().y;

    // Nearest obstacle ahead that shares the player's lane
    let threat = state
        .obstacles
        .iter()
        .filter(|o| {
            let b = o.bounds().inset(COLLISION_BUFFER);
            b.max().x > hitbox.min.x
                && b.min.x < hitbox.max().x + LOOKAHEAD
                && b.min.y < bottom
                && b.max().y > top
        })
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(obstacle) = threat {
        let obstacle_center = obstacle.bounds().center().y;
        // Dodge toward the side with more room; wrapping covers the edges
        if obstacle_center >= center_y {
            input.up = true;
        } else {
            input.down = true;
        }
    }

    // Hold position near the left edge to maximise reaction distance
    if player.pos.x > PLAYER_START_X {
        input.left = true;
    }

    // Shoot anything sitting on the laser's row
    if state.laser.is_none() {
        let laser_pos = state.rules.laser_spawn(player.pos);
        let laser_top = laser_pos.y;
        let laser_bottom = laser_pos.y + state.rules.laser_size.y;
        input.fire = state.obstacles.iter().any(|o| {
            o.pos.x > player.pos.x + player.size && o.pos.y < laser_bottom && o.pos.y + o.size > laser_top
        });
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameKind;
    use crate::sim::rules::ObstacleKind;
    use crate::sim::state::Obstacle;
    use crate::sim::tick::tick;
    use glam::Vec2;

    fn with_obstacle(y: f32, x: f32) -> GameState {
        let mut state = GameState::new(GameKind::SpecialDay, 5);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Tux,
            pos: Vec2::new(x, y),
            size: 100.0,
        });
        state
    }

    #[test]
    fn test_dodges_away_from_threat_below_center() {
        // Player spans y 250..350, obstacle slightly lower
        let state = with_obstacle(280.0, 200.0);
        let input = steer(&state);
        assert!(input.up);
        assert!(!input.down);
    }

    #[test]
    fn test_dodges_away_from_threat_above_center() {
        let state = with_obstacle(220.0, 200.0);
        let input = steer(&state);
        assert!(input.down);
    }

    #[test]
    fn test_ignores_distant_obstacles() {
        let state = with_obstacle(250.0, 700.0);
        let input = steer(&state);
        assert!(!input.up && !input.down);
        // but shoots at them
        assert!(input.fire);
    }

    #[test]
    fn test_autopilot_lets_lane_obstacle_pass() {
        // Below the laser row but inside the player's lane
        let mut state = with_obstacle(310.0, 400.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input);
            state.obstacles.retain(|o| o.id == 1);
        }
        assert!(!state.is_over());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.tasks_avoided, 1);
        assert!(state.player.pos.y < PLAYER_START_Y);
    }
}
