//! Difficulty ramp and the periodic special event
//!
//! All timers count simulation ticks, so a seeded run replays exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rules::Ruleset;
use crate::consts::*;
use crate::secs_to_ticks;

/// Current spawn probability and obstacle speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Probability of spawning an obstacle this tick
    pub spawn_rate: f32,
    /// Leftward obstacle speed (pixels per tick)
    pub obstacle_speed: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            spawn_rate: BASE_SPAWN_RATE,
            obstacle_speed: BASE_OBSTACLE_SPEED,
        }
    }
}

impl Difficulty {
    /// Monotonic per-tick speed increase
    pub fn apply_base_ramp(&mut self) {
        self.set_speed(self.obstacle_speed + SPEED_INCREMENT);
    }

    /// Extra ramp applied while inside the ramp window
    pub fn apply_window_ramp(&mut self, rules: &Ruleset) {
        self.set_spawn_rate(self.spawn_rate + rules.ramp_spawn_step);
        self.set_speed(self.obstacle_speed + rules.ramp_speed_step);
    }

    pub fn set_spawn_rate(&mut self, rate: f32) {
        self.spawn_rate = rate.clamp(BASE_SPAWN_RATE, MAX_SPAWN_RATE);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.obstacle_speed = speed.clamp(BASE_OBSTACLE_SPEED, MAX_OBSTACLE_SPEED);
    }
}

/// Scheduler for the "special day" event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    /// Tick of the last trigger (or round start)
    pub last_trigger: u64,
    /// Ticks until the next trigger, measured from `last_trigger`
    pub interval: u64,
    /// Banner visible until this tick
    pub banner_until: Option<u64>,
    /// Spawn boost active until this tick
    pub boost_until: Option<u64>,
    /// Number of events triggered this round
    pub count: u32,
}

impl SpecialEvent {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            last_trigger: 0,
            interval: Self::draw_interval(rng),
            banner_until: None,
            boost_until: None,
            count: 0,
        }
    }

    /// Random whole-second interval in [20, 30]
    pub fn draw_interval<R: Rng>(rng: &mut R) -> u64 {
        secs_to_ticks(rng.random_range(SPECIAL_INTERVAL_MIN_SECS..=SPECIAL_INTERVAL_MAX_SECS))
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_trigger)
    }

    /// Whether the difficulty ramp window is open
    pub fn in_ramp_window(&self, now: u64) -> bool {
        let elapsed = self.elapsed(now);
        elapsed > secs_to_ticks(RAMP_WINDOW_START_SECS) && elapsed < secs_to_ticks(RAMP_WINDOW_END_SECS)
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.elapsed(now) > self.interval
    }

    /// Fire the event at `now` and schedule the next one
    pub fn trigger<R: Rng>(&mut self, now: u64, rng: &mut R) {
        self.banner_until = Some(now + secs_to_ticks(SPECIAL_BANNER_SECS));
        self.boost_until = Some(now + secs_to_ticks(SPECIAL_BOOST_SECS));
        self.last_trigger = now;
        self.interval = Self::draw_interval(rng);
        self.count += 1;
    }

    pub fn is_boosted(&self, now: u64) -> bool {
        self.boost_until.is_some_and(|until| now <= until)
    }

    pub fn banner_visible(&self, now: u64) -> bool {
        self.banner_until.is_some_and(|until| now < until)
    }
}

/// Advance difficulty by one tick. Returns true if the special event fired.
pub fn update<R: Rng>(
    difficulty: &mut Difficulty,
    event: &mut SpecialEvent,
    rules: &Ruleset,
    now: u64,
    rng: &mut R,
) -> bool {
    difficulty.apply_base_ramp();

    if event.in_ramp_window(now) {
        difficulty.apply_window_ramp(rules);
    }

    let fired = event.is_due(now);
    if fired {
        event.trigger(now, rng);
        difficulty.set_spawn_rate(BOOST_SPAWN_RATE);
        log::debug!("Special event #{} at tick {}", event.count, now);
    }

    if !event.is_boosted(now) {
        difficulty.set_spawn_rate(BASE_SPAWN_RATE);
    }

    fired
}
