//! Player settings and preferences
//!
//! Persisted separately from leaderboards through the same store.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError, Store};
use crate::sim::{GameEvent, MazeEvent};

/// Sound cues a front-end may play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Music,
    Laser,
    Special,
    Lose,
}

impl SoundCue {
    /// Cue (if any) for a dodger event
    pub fn for_game_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::LaserFired => Some(Self::Laser),
            GameEvent::SpecialEvent => Some(Self::Special),
            GameEvent::Caught => Some(Self::Lose),
            GameEvent::ObstacleAvoided | GameEvent::ObstacleLasered => None,
        }
    }

    /// Cue (if any) for a maze event
    pub fn for_maze_event(event: MazeEvent) -> Option<Self> {
        match event {
            MazeEvent::Found | MazeEvent::Won => Some(Self::Special),
            MazeEvent::TimeUp => Some(Self::Lose),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Silence every cue (toggled with M)
    pub muted: bool,

    // === Audio (0.0 - 1.0) ===
    pub music_volume: f32,
    pub laser_volume: f32,
    pub special_volume: f32,
    pub lose_volume: f32,

    // === Accessibility ===
    /// Hide the laser trail and banner flashing
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            music_volume: 0.2,
            laser_volume: 0.5,
            special_volume: 1.0,
            lose_volume: 0.7,
            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "settings.json";

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
    }

    /// Playback volume for a cue, clamped to 0.0 - 1.0
    pub fn cue_volume(&self, cue: SoundCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let volume = match cue {
            SoundCue::Music => self.music_volume,
            SoundCue::Laser => self.laser_volume,
            SoundCue::Special => self.special_volume,
            SoundCue::Lose => self.lose_volume,
        };
        volume.clamp(0.0, 1.0)
    }

    /// Whether the laser trail should be drawn
    pub fn show_trail(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings; a missing or corrupt document yields defaults
    pub fn load(store: &dyn Store) -> Self {
        match persistence::read_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn Store) -> Result<(), PersistError> {
        persistence::write_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_default_volumes() {
        let settings = Settings::default();
        assert_eq!(settings.cue_volume(SoundCue::Music), 0.2);
        assert_eq!(settings.cue_volume(SoundCue::Laser), 0.5);
        assert_eq!(settings.cue_volume(SoundCue::Special), 1.0);
        assert_eq!(settings.cue_volume(SoundCue::Lose), 0.7);
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        settings.toggle_mute();
        assert_eq!(settings.cue_volume(SoundCue::Special), 0.0);
        settings.toggle_mute();
        assert_eq!(settings.cue_volume(SoundCue::Special), 1.0);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let settings = Settings {
            laser_volume: 3.0,
            ..Settings::default()
        };
        assert_eq!(settings.cue_volume(SoundCue::Laser), 1.0);
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(SoundCue::for_game_event(GameEvent::LaserFired), Some(SoundCue::Laser));
        assert_eq!(SoundCue::for_game_event(GameEvent::ObstacleAvoided), None);
        assert_eq!(SoundCue::for_maze_event(MazeEvent::TimeUp), Some(SoundCue::Lose));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let store = MemoryStore::new();
        store.write_raw("settings.json", r#"{"muted": true}"#).expect("write");
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.lose_volume, 0.7);
    }

    #[test]
    fn test_corrupt_document_yields_defaults() {
        let store = MemoryStore::new();
        store.write_raw("settings.json", "[1, 2").expect("write");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            reduced_motion: true,
            music_volume: 0.4,
            ..Settings::default()
        };
        settings.save(&store).expect("save");
        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert!(!loaded.show_trail());
    }
}
