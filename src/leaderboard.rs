//! Top-five leaderboard with three-letter initials
//!
//! Stored as a JSON array of `[name, score]` pairs, one file per leaderboard
//! key (the two dodgers share one, the maze has its own).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::GameKind;
use crate::consts::LEADERBOARD_SIZE;
use crate::persistence::{self, PersistError, Store};

/// Number of letters in a leaderboard name
pub const INITIALS_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialsError {
    WrongLength(usize),
    NotALetter(char),
}

impl fmt::Display for InitialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength(n) => write!(f, "initials need {INITIALS_LEN} letters, got {n}"),
            Self::NotALetter(c) => write!(f, "{c:?} is not an ASCII letter"),
        }
    }
}

impl std::error::Error for InitialsError {}

/// Exactly three uppercase ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Initials(String);

impl Initials {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Initials {
    type Err = InitialsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != INITIALS_LEN {
            return Err(InitialsError::WrongLength(count));
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(InitialsError::NotALetter(bad));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl fmt::Display for Initials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typing state for the name prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialsEntry {
    letters: String,
}

impl InitialsEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a letter (uppercased). Returns false if the key was ignored.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_alphabetic() || self.is_complete() {
            return false;
        }
        self.letters.push(c.to_ascii_uppercase());
        true
    }

    pub fn backspace(&mut self) {
        self.letters.pop();
    }

    pub fn is_complete(&self) -> bool {
        self.letters.len() == INITIALS_LEN
    }

    pub fn as_str(&self) -> &str {
        &self.letters
    }

    /// The finished initials, once all three letters are in
    pub fn finish(&self) -> Option<Initials> {
        if self.is_complete() {
            self.letters.parse().ok()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: Initials,
    pub score: u32,
}

/// Accepted on-disk shapes for a single entry
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Pair(String, u32),
    Object { name: String, score: u32 },
}

impl RawEntry {
    fn into_entry(self) -> Option<LeaderboardEntry> {
        let (name, score) = match self {
            Self::Pair(name, score) | Self::Object { name, score } => (name, score),
        };
        match name.parse() {
            Ok(name) => Some(LeaderboardEntry { name, score }),
            Err(e) => {
                log::warn!("Dropping leaderboard entry {name:?}: {e}");
                None
            }
        }
    }
}

/// Descending by score; ties keep the earliest submission first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries, restoring order and capacity
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        // Stable sort keeps file order among equal scores
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would earn a place
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < LEADERBOARD_SIZE {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insertion_index(score) + 1)
    }

    /// Insert a score. Returns the rank achieved (1-indexed) or None.
    pub fn add_score(&mut self, name: Initials, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let index = self.insertion_index(score);
        self.entries.insert(index, LeaderboardEntry { name, score });
        self.entries.truncate(LEADERBOARD_SIZE);
        Some(index + 1)
    }

    fn insertion_index(&self, score: u32) -> usize {
        self.entries.iter().position(|e| score > e.score).unwrap_or(self.entries.len())
    }

    /// Parse a stored document. Only a non-array document is an error;
    /// malformed elements and invalid names are dropped one by one.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let elements: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let entries = elements
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawEntry>(value) {
                Ok(raw) => raw.into_entry(),
                Err(e) => {
                    log::warn!("Dropping malformed leaderboard entry: {e}");
                    None
                }
            })
            .collect();
        Ok(Self::from_entries(entries))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.pairs())
    }

    fn pairs(&self) -> Vec<(&str, u32)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.score)).collect()
    }

    /// Load the leaderboard for a game; missing or unreadable data yields an empty board
    pub fn load(store: &dyn Store, kind: GameKind) -> Self {
        let key = kind.leaderboard_key();
        let loaded = store
            .read_raw(key)
            .and_then(|raw| raw.map(|json| Self::from_json(&json).map_err(PersistError::from)).transpose());
        match loaded {
            Ok(Some(board)) => {
                log::info!("Loaded {} leaderboard entries from {key}", board.len());
                board
            }
            Ok(None) => {
                log::info!("No leaderboard at {key}, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring leaderboard at {key}: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &dyn Store, kind: GameKind) -> Result<(), PersistError> {
        persistence::write_json(store, kind.leaderboard_key(), &self.pairs())?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn initials(s: &str) -> Initials {
        s.parse().expect("valid initials")
    }

    fn board(scores: &[(&str, u32)]) -> Leaderboard {
        let mut board = Leaderboard::new();
        for &(name, score) in scores {
            board.add_score(initials(name), score);
        }
        board
    }

    #[test]
    fn test_initials_validation() {
        assert_eq!(initials("abc").as_str(), "ABC");
        assert_eq!("AB".parse::<Initials>(), Err(InitialsError::WrongLength(2)));
        assert_eq!("ABCD".parse::<Initials>(), Err(InitialsError::WrongLength(4)));
        assert_eq!("A1C".parse::<Initials>(), Err(InitialsError::NotALetter('1')));
        assert_eq!("ÄBC".parse::<Initials>(), Err(InitialsError::NotALetter('Ä')));
    }

    #[test]
    fn test_initials_entry_typing() {
        let mut entry = InitialsEntry::new();
        assert!(entry.push('j'));
        assert!(!entry.push('3'));
        assert!(entry.push('o'));
        entry.backspace();
        assert_eq!(entry.as_str(), "J");
        assert!(entry.finish().is_none());
        assert!(entry.push('e'));
        assert!(entry.push('d'));
        assert!(entry.is_complete());
        assert!(!entry.push('x'));
        assert_eq!(entry.finish(), Some(initials("JED")));
    }

    #[test]
    fn test_qualifies_when_not_full() {
        let board = board(&[("AAA", 10), ("BBB", 5)]);
        assert!(board.qualifies(0));
        assert_eq!(board.potential_rank(7), Some(2));
        assert_eq!(board.potential_rank(1), Some(3));
    }

    #[test]
    fn test_full_board_needs_strictly_greater() {
        let board = board(&[("AAA", 50), ("BBB", 40), ("CCC", 30), ("DDD", 20), ("EEE", 10)]);
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
        assert_eq!(board.potential_rank(10), None);
        assert_eq!(board.potential_rank(45), Some(2));
    }

    #[test]
    fn test_add_score_truncates_to_five() {
        let mut board = board(&[("AAA", 50), ("BBB", 40), ("CCC", 30), ("DDD", 20), ("EEE", 10)]);
        assert_eq!(board.add_score(initials("NEW"), 35), Some(3));
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 40, 35, 30, 20]);
        assert_eq!(board.add_score(initials("LOW"), 1), None);
    }

    #[test]
    fn test_ties_keep_earliest_first() {
        let board = board(&[("OLD", 20), ("NEW", 20)]);
        assert_eq!(board.entries()[0].name.as_str(), "OLD");
        assert_eq!(board.entries()[1].name.as_str(), "NEW");
        assert_eq!(board.potential_rank(20), Some(3));
    }

    #[test]
    fn test_json_accepts_pairs_and_objects() {
        let json = r#"[["abc", 3], {"name": "XYZ", "score": 9}, ["TOOLONG", 99], ["DEF", 3]]"#;
        let board = Leaderboard::from_json(json).expect("parse");
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["XYZ", "ABC", "DEF"]);
        assert_eq!(board.to_json().expect("encode"), r#"[["XYZ",9],["ABC",3],["DEF",3]]"#);
    }

    #[test]
    fn test_malformed_element_keeps_the_rest() {
        let json = r#"[["AAA", 3.0], ["BBB", 7], "junk", {"name": "CCC"}, ["DDD", -1], ["EEE", 2]]"#;
        let board = Leaderboard::from_json(json).expect("parse");
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["BBB", "EEE"]);
        assert!(Leaderboard::from_json(r#"{"AAA": 3}"#).is_err());
    }

    #[test]
    fn test_load_truncates_oversized_file() {
        let json = r#"[["AAA",1],["BBB",2],["CCC",3],["DDD",4],["EEE",5],["FFF",6],["GGG",7]]"#;
        let board = Leaderboard::from_json(json).expect("parse");
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board.top_score(), Some(7));
        assert_eq!(board.entries()[4].score, 3);
    }

    #[test]
    fn test_store_round_trip_per_game() {
        let store = MemoryStore::new();
        let dodger = board(&[("AAA", 12)]);
        dodger.save(&store, GameKind::SpecialDay).expect("save");

        // Classic and Special Day share a file; the maze does not
        assert_eq!(Leaderboard::load(&store, GameKind::Classic), dodger);
        assert!(Leaderboard::load(&store, GameKind::Maze).is_empty());
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let store = MemoryStore::new();
        store.write_raw(GameKind::Maze.leaderboard_key(), "not json").expect("write");
        assert!(Leaderboard::load(&store, GameKind::Maze).is_empty());
    }

    proptest! {
        #[test]
        fn prop_board_stays_sorted_and_capped(scores in prop::collection::vec(0u32..100, 0..30)) {
            let mut board = Leaderboard::new();
            for score in scores {
                let expected = board.potential_rank(score);
                prop_assert_eq!(board.add_score(initials("PRP"), score), expected);
            }
            prop_assert!(board.len() <= LEADERBOARD_SIZE);
            prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
