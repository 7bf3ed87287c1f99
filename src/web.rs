//! Browser bindings
//!
//! `WebGame` runs a Special Day session against LocalStorage. JavaScript
//! forwards key presses and animation frames, then draws from the JSON
//! snapshot.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::persistence::LocalStore;
use crate::platform;
use crate::session::{Session, SessionKey, SessionPhase};
use crate::settings::SoundCue;
use crate::sim::{GameState, Laser, Obstacle, Player, TickInput};
use crate::GameKind;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Special Day starting...");
}

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    name: &'a str,
    score: u32,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    phase: &'static str,
    title: &'static str,
    leaderboard_heading: &'static str,
    time_ticks: u64,
    score: u32,
    banner: bool,
    player: &'a Player,
    laser: Option<&'a Laser>,
    show_trail: bool,
    obstacles: Vec<ObstacleView<'a>>,
    leaderboard: Vec<LeaderboardRow<'a>>,
    /// Letters typed so far while entering initials
    initials: Option<&'a str>,
    last_rank: Option<usize>,
    muted: bool,
}

#[derive(Serialize)]
struct ObstacleView<'a> {
    sprite: &'static str,
    #[serde(flatten)]
    obstacle: &'a Obstacle,
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<GameState>,
    input: TickInput,
    accumulator: f32,
    last_time: f64,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = platform::fresh_seed();
        let round = GameState::new(GameKind::SpecialDay, seed);
        Self {
            session: Session::new(round, Box::new(LocalStore::new()), seed),
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: 0.0,
        }
    }

    /// Forward a `KeyboardEvent.key` value
    pub fn key_down(&mut self, key: &str) {
        let typing = matches!(self.session.phase(), SessionPhase::NameEntry(_));
        let mapped = match key {
            "Enter" => Some(SessionKey::Enter),
            "Escape" => Some(SessionKey::Escape),
            "Backspace" => Some(SessionKey::Backspace),
            "m" | "M" if !typing => Some(SessionKey::ToggleMute),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(SessionKey::Char(c)),
                    _ => None,
                }
            }
        };
        if let Some(key) = mapped {
            self.session.key(key);
        }
    }

    /// Run exactly one simulation tick with the given held keys
    pub fn tick(&mut self, left: bool, right: bool, up: bool, down: bool, fire: bool) {
        self.input = TickInput {
            left,
            right,
            up,
            down,
            fire,
            autopilot: false,
        };
        self.session.tick(&self.input);
    }

    /// Update held keys; applied by subsequent `frame` calls
    pub fn set_input(&mut self, left: bool, right: bool, up: bool, down: bool, fire: bool) {
        self.input = TickInput {
            left,
            right,
            up,
            down,
            fire,
            autopilot: false,
        };
    }

    /// Advance by an animation-frame timestamp (ms), running as many fixed
    /// ticks as have elapsed
    pub fn frame(&mut self, time: f64) {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time;
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.session.tick(&self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Cues raised since the last call as `[[name, volume], ...]`
    pub fn drain_cues_json(&mut self) -> String {
        let cues: Vec<(&str, f32)> = self
            .session
            .drain_cues()
            .into_iter()
            .map(|(cue, volume)| (cue_name(cue), volume))
            .collect();
        serde_json::to_string(&cues).unwrap_or_else(|_| "[]".into())
    }

    /// Everything a renderer needs for the current frame
    pub fn snapshot_json(&self) -> String {
        let session = &self.session;
        let round = session.round();
        let kind = round.kind;
        let snapshot = Snapshot {
            phase: match session.phase() {
                SessionPhase::Title => "title",
                SessionPhase::Playing => "playing",
                SessionPhase::NameEntry(_) => "name-entry",
                SessionPhase::Leaderboard => "leaderboard",
            },
            title: kind.title(),
            leaderboard_heading: kind.leaderboard_heading(),
            time_ticks: round.time_ticks,
            score: round.tasks_avoided,
            banner: round.banner_visible(),
            player: &round.player,
            laser: round.laser.as_ref(),
            show_trail: session.settings().show_trail(),
            obstacles: round
                .obstacles
                .iter()
                .map(|obstacle| ObstacleView {
                    sprite: obstacle.kind.sprite(),
                    obstacle,
                })
                .collect(),
            leaderboard: session
                .leaderboard()
                .entries()
                .iter()
                .map(|e| LeaderboardRow {
                    name: e.name.as_str(),
                    score: e.score,
                })
                .collect(),
            initials: match session.phase() {
                SessionPhase::NameEntry(entry) => Some(entry.as_str()),
                _ => None,
            },
            last_rank: session.last_rank(),
            muted: session.settings().muted,
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot failed: {e}");
                "{}".into()
            }
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

fn cue_name(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::Music => "music",
        SoundCue::Laser => "laser",
        SoundCue::Special => "special",
        SoundCue::Lose => "lose",
    }
}
