//! Round lifecycle around the simulation
//!
//! `Title -> Playing -> (NameEntry ->) Leaderboard -> Playing | Title`
//!
//! The session owns the current round, the game's leaderboard and the
//! player settings, and persists both through a `Store`.

use crate::GameKind;
use crate::leaderboard::{Initials, InitialsEntry, Leaderboard};
use crate::persistence::Store;
use crate::settings::{Settings, SoundCue};
use crate::sim::{self, GameState, MazeState, TickInput};

/// One playable round of any of the games
pub trait Round {
    fn kind(&self) -> GameKind;

    /// Advance by one fixed timestep
    fn step(&mut self, input: &TickInput);

    fn is_over(&self) -> bool;

    /// Score to submit once over; `None` for unscored endings
    fn final_score(&self) -> Option<u32>;

    /// A fresh round of the same game
    fn restart(&self, seed: u64) -> Self
    where
        Self: Sized;

    /// Sound cues raised since the last call
    fn drain_cues(&mut self) -> Vec<SoundCue>;
}

impl Round for GameState {
    fn kind(&self) -> GameKind {
        self.kind
    }

    fn step(&mut self, input: &TickInput) {
        sim::tick(self, input);
    }

    fn is_over(&self) -> bool {
        GameState::is_over(self)
    }

    fn final_score(&self) -> Option<u32> {
        Some(self.tasks_avoided)
    }

    fn restart(&self, seed: u64) -> Self {
        GameState::new(self.kind, seed)
    }

    fn drain_cues(&mut self) -> Vec<SoundCue> {
        self.drain_events()
            .into_iter()
            .filter_map(SoundCue::for_game_event)
            .collect()
    }
}

impl Round for MazeState {
    fn kind(&self) -> GameKind {
        GameKind::Maze
    }

    fn step(&mut self, input: &TickInput) {
        sim::maze::tick(self, input);
    }

    fn is_over(&self) -> bool {
        MazeState::is_over(self)
    }

    fn final_score(&self) -> Option<u32> {
        self.score()
    }

    /// The maze has no randomness; every round uses the same layout
    fn restart(&self, _seed: u64) -> Self {
        MazeState::new(self.grid.clone())
    }

    fn drain_cues(&mut self) -> Vec<SoundCue> {
        self.drain_events()
            .into_iter()
            .filter_map(SoundCue::for_maze_event)
            .collect()
    }
}

/// Keys the session reacts to (held movement keys go through `TickInput`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Enter,
    Escape,
    Backspace,
    Char(char),
    ToggleMute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Title,
    Playing,
    /// Typing initials for a qualifying score
    NameEntry(InitialsEntry),
    Leaderboard,
}

pub struct Session<R: Round> {
    round: R,
    phase: SessionPhase,
    leaderboard: Leaderboard,
    settings: Settings,
    store: Box<dyn Store>,
    seed: u64,
    /// Rank earned by the last submitted score
    last_rank: Option<usize>,
    /// Whether any round has been started; later rounds move to a new seed
    played: bool,
}

impl<R: Round> Session<R> {
    /// Open a session at the title screen, loading leaderboard and settings
    pub fn new(round: R, store: Box<dyn Store>, seed: u64) -> Self {
        let leaderboard = Leaderboard::load(store.as_ref(), round.kind());
        let settings = Settings::load(store.as_ref());
        log::info!("{} session ready (seed {seed})", round.kind().title());
        Self {
            round,
            phase: SessionPhase::Title,
            leaderboard,
            settings,
            store,
            seed,
            last_rank: None,
            played: false,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn round(&self) -> &R {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut R {
        &mut self.round
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Handle a key press
    pub fn key(&mut self, key: SessionKey) {
        if key == SessionKey::ToggleMute {
            self.settings.toggle_mute();
            if let Err(e) = self.settings.save(self.store.as_ref()) {
                log::warn!("Could not save settings: {e}");
            }
            return;
        }

        match (&mut self.phase, key) {
            (SessionPhase::Title, SessionKey::Enter) => self.start_round(),
            (SessionPhase::NameEntry(entry), SessionKey::Char(c)) => {
                entry.push(c);
                if let Some(name) = entry.finish() {
                    self.submit(name);
                }
            }
            (SessionPhase::NameEntry(entry), SessionKey::Backspace) => entry.backspace(),
            (SessionPhase::NameEntry(_), SessionKey::Escape) => {
                log::info!("Name entry skipped");
                self.phase = SessionPhase::Leaderboard;
            }
            (SessionPhase::Leaderboard, SessionKey::Enter) => self.start_round(),
            (SessionPhase::Leaderboard, SessionKey::Escape) => self.phase = SessionPhase::Title,
            _ => {}
        }
    }

    /// Advance the round while playing
    pub fn tick(&mut self, input: &TickInput) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.round.step(input);
        if self.round.is_over() {
            self.finish_round();
        }
    }

    /// Cues since the last call, paired with their playback volume
    pub fn drain_cues(&mut self) -> Vec<(SoundCue, f32)> {
        let settings = &self.settings;
        self.round
            .drain_cues()
            .into_iter()
            .map(|cue| (cue, settings.cue_volume(cue)))
            .collect()
    }

    fn start_round(&mut self) {
        if self.played {
            self.seed = self.seed.wrapping_add(1);
        }
        self.played = true;
        self.round = self.round.restart(self.seed);
        self.last_rank = None;
        self.phase = SessionPhase::Playing;
        log::info!("Round started (seed {})", self.seed);
    }

    fn finish_round(&mut self) {
        match self.round.final_score() {
            Some(score) if self.leaderboard.qualifies(score) => {
                log::info!("Score {score} qualifies for the leaderboard");
                self.phase = SessionPhase::NameEntry(InitialsEntry::new());
            }
            score => {
                log::info!("Round over (score {score:?})");
                self.phase = SessionPhase::Leaderboard;
            }
        }
    }

    fn submit(&mut self, name: Initials) {
        let Some(score) = self.round.final_score() else {
            self.phase = SessionPhase::Leaderboard;
            return;
        };
        self.last_rank = self.leaderboard.add_score(name, score);
        if let Err(e) = self.leaderboard.save(self.store.as_ref(), self.round.kind()) {
            log::warn!("Could not save leaderboard: {e}");
        }
        self.phase = SessionPhase::Leaderboard;
    }
}
