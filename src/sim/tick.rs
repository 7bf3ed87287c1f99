//! Fixed timestep simulation tick
//!
//! Core dodger loop that advances a round deterministically.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::collision::forgiving_overlap;
use super::difficulty;
use super::state::{GameEvent, GamePhase, GameState, Laser, Obstacle};
use crate::consts::*;

/// Held keys for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire the laser (ignored while one is in flight)
    pub fire: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// Movement direction in screen space (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let dx = self.right as i32 - self.left as i32;
        let dy = self.down as i32 - self.up as i32;
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let input = if input.autopilot {
        autopilot::steer(state)
    } else {
        *input
    };

    state.time_ticks += 1;

    // Player movement
    state.player.pos += input.direction() * PLAYER_SPEED;
    state.player.wrap(state.rules.bottom_wrap);

    if input.fire && state.laser.is_none() {
        let pos = state.rules.laser_spawn(state.player.pos);
        state.laser = Some(Laser::new(pos, state.rules.laser_size));
        state.events.push(GameEvent::LaserFired);
    }

    // Laser flight
    let laser_alive = state.laser.as_mut().map(|laser| laser.advance());
    if laser_alive == Some(false) {
        state.laser = None;
    }

    // Obstacles move left; those past the trailing edge count as avoided
    let speed = state.difficulty.obstacle_speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }
    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_past_trailing_edge());
    let avoided = (before - state.obstacles.len()) as u32;
    if avoided > 0 {
        state.tasks_avoided += avoided;
        for _ in 0..avoided {
            state.events.push(GameEvent::ObstacleAvoided);
        }
    }

    if state.rng.random::<f32>() < state.difficulty.spawn_rate {
        spawn_obstacle(state);
    }

    let now = state.time_ticks;
    if difficulty::update(
        &mut state.difficulty,
        &mut state.special,
        &state.rules,
        now,
        &mut state.rng,
    ) {
        state.events.push(GameEvent::SpecialEvent);
    }

    // Player vs obstacles (forgiving boxes); first overlap ends the round
    let player_box = state.player.bounds();
    if state
        .obstacles
        .iter()
        .any(|o| forgiving_overlap(&player_box, &o.bounds(), COLLISION_BUFFER))
    {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::Caught);
        log::info!(
            "{:?} round over after {} ticks: {} tasks avoided",
            state.kind,
            state.time_ticks,
            state.tasks_avoided
        );
        return;
    }

    // Laser vs obstacles (full boxes); one hit per shot
    if let Some(laser) = &state.laser {
        let laser_box = laser.bounds();
        if let Some(hit) = state
            .obstacles
            .iter()
            .position(|o| laser_box.overlaps(&o.bounds()))
        {
            state.obstacles.remove(hit);
            state.laser = None;
            if state.rules.laser_hit_scores {
                state.tasks_avoided += 1;
            }
            state.events.push(GameEvent::ObstacleLasered);
        }
    }
}

/// Spawn one obstacle at the right edge with a random kind and row
pub fn spawn_obstacle(state: &mut GameState) {
    let pool = state.rules.obstacle_pool;
    if pool.is_empty() {
        return;
    }
    let (kind, size) = pool[state.rng.random_range(0..pool.len())];
    let max_y = (SCREEN_HEIGHT - size).max(0.0) as u32;
    let y = state.rng.random_range(0..=max_y) as f32;

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec2::new(SCREEN_WIDTH, y),
        size,
    });
}
