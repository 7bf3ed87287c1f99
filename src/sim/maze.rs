//! Maze game: walk the maze and find the other character before time runs out
//!
//! The maze is a tile grid parsed from text (`#` wall, `.` or space floor).
//! Positions are whole pixels; a sprite box may only occupy floor tiles.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::TICKS_PER_SECOND;

/// Source tile size (pixels) before zoom
pub const TILE_SIZE: u32 = 10;
/// Maze zoom factor
pub const ZOOM: u32 = 3;
/// Sprite box used for placement, walking and the hug check (2.6 source tiles)
pub const SPRITE_SIZE: u32 = 78;
/// Pixels moved per tick on each axis
pub const MAZE_PLAYER_SPEED: i32 = 10;
/// Countdown at round start (seconds)
pub const COUNTDOWN_SECS: u32 = 180;
/// Length of the reunion hug (ticks)
pub const HUG_TICKS: u32 = 3 * TICKS_PER_SECOND;

/// Built-in maze layout
pub const DEFAULT_LAYOUT: &str = "\
#############################
#...#...................#...#
#...#...................#...#
#...#...................#...#
#...#####...#########...#...#
#...#.......#...........#...#
#...#.......#...........#...#
#...#.......#...........#...#
#...#...#####...#########...#
#...#.......#...............#
#...#.......#...............#
#...#.......#...............#
#...#####...#############...#
#...........#...#...........#
#...........#...#...........#
#...........#...#...........#
#############...#...#########
#...........................#
#...........................#
#...........................#
#############################
";

/// Maze layout parse failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownGlyph { row: usize, col: usize, glyph: char },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "maze layout is empty"),
            Self::RaggedRow { row, expected, found } => {
                write!(f, "row {row} has {found} tiles, expected {expected}")
            }
            Self::UnknownGlyph { row, col, glyph } => {
                write!(f, "unknown tile {glyph:?} at row {row}, column {col}")
            }
        }
    }
}

impl std::error::Error for MazeError {}

/// Walkable/blocked tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    /// Row-major, true = wall
    walls: Vec<bool>,
}

impl MazeGrid {
    /// Parse a text layout. Trailing blank lines are ignored.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let mut rows: Vec<&str> = layout.lines().map(|line| line.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }

        let expected = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(MazeError::Empty);
        }

        let mut walls = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(MazeError::RaggedRow { row, expected, found });
            }
            for (col, glyph) in line.chars().enumerate() {
                match glyph {
                    '#' => walls.push(true),
                    '.' | ' ' => walls.push(false),
                    _ => return Err(MazeError::UnknownGlyph { row, col, glyph }),
                }
            }
        }

        Ok(Self {
            width: expected as u32,
            height: rows.len() as u32,
            tile_size: TILE_SIZE * ZOOM,
            walls,
        })
    }

    /// The built-in layout
    pub fn default_maze() -> Result<Self, MazeError> {
        Self::parse(DEFAULT_LAYOUT)
    }

    /// Size in tiles
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size in pixels
    pub fn pixel_size(&self) -> IVec2 {
        IVec2::new(
            (self.width * self.tile_size) as i32,
            (self.height * self.tile_size) as i32,
        )
    }

    pub fn is_wall_tile(&self, tx: u32, ty: u32) -> bool {
        if tx >= self.width || ty >= self.height {
            return true;
        }
        self.walls[(ty * self.width + tx) as usize]
    }

    /// Whether a `w` x `h` box at (`x`, `y`) lies entirely on floor
    pub fn is_walkable(&self, x: i32, y: i32, w: u32, h: u32) -> bool {
        let size = self.pixel_size();
        if x < 0 || y < 0 || w == 0 || h == 0 {
            return false;
        }
        if x + w as i32 > size.x || y + h as i32 > size.y {
            return false;
        }
        let ts = self.tile_size as i32;
        let (tx0, tx1) = (x / ts, (x + w as i32 - 1) / ts);
        let (ty0, ty1) = (y / ts, (y + h as i32 - 1) / ts);
        (ty0..=ty1).all(|ty| (tx0..=tx1).all(|tx| !self.is_wall_tile(tx as u32, ty as u32)))
    }

    /// First position where a `size` square fits.
    ///
    /// Forward scans rows top to bottom and columns left to right; reverse
    /// scans from the bottom-right corner. Falls back to one tile in.
    pub fn find_position(&self, size: u32, reverse: bool) -> IVec2 {
        let px = self.pixel_size();
        let max_x = px.x - size as i32;
        let max_y = px.y - size as i32;

        let fits = |x: i32, y: i32| self.is_walkable(x, y, size, size);
        let found = if reverse {
            (1..=max_y).rev().find_map(|y| {
                (1..=max_x)
                    .rev()
                    .find(|&x| fits(x, y))
                    .map(|x| IVec2::new(x, y))
            })
        } else {
            (0..max_y).find_map(|y| (0..max_x).find(|&x| fits(x, y)).map(|x| IVec2::new(x, y)))
        };

        found.unwrap_or(IVec2::splat(self.tile_size as i32))
    }
}

/// Phase of a maze round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazePhase {
    /// Walking the maze, countdown running
    Searching,
    /// Found the target; countdown frozen
    Hugging { ticks_left: u32 },
    /// Round won with this many seconds left (the score)
    Won { remaining: u32 },
    /// Countdown expired
    Lost,
}

/// Things that happened during a maze tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeEvent {
    Found,
    Won,
    TimeUp,
}

/// Complete state of one maze round
#[derive(Debug, Clone)]
pub struct MazeState {
    pub grid: MazeGrid,
    /// Player top-left (pixels)
    pub player: IVec2,
    /// Target top-left (pixels)
    pub target: IVec2,
    pub sprite_size: u32,
    /// Seconds left on the countdown
    pub countdown: u32,
    pub time_ticks: u64,
    pub phase: MazePhase,
    pub events: Vec<MazeEvent>,
    /// Ticks into the current countdown second
    second_ticks: u32,
}

impl MazeState {
    pub fn new(grid: MazeGrid) -> Self {
        let player = grid.find_position(SPRITE_SIZE, false);
        let target = grid.find_position(SPRITE_SIZE, true);
        log::debug!("Maze round: player at {player}, target at {target}");
        Self {
            grid,
            player,
            target,
            sprite_size: SPRITE_SIZE,
            countdown: COUNTDOWN_SECS,
            time_ticks: 0,
            phase: MazePhase::Searching,
            events: Vec::new(),
            second_ticks: 0,
        }
    }

    pub fn player_box(&self) -> Aabb {
        Aabb::square(self.player.as_vec2(), self.sprite_size as f32)
    }

    pub fn target_box(&self) -> Aabb {
        Aabb::square(self.target.as_vec2(), self.sprite_size as f32)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MazePhase::Won { .. } | MazePhase::Lost)
    }

    /// Seconds left if the round was won
    pub fn score(&self) -> Option<u32> {
        match self.phase {
            MazePhase::Won { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Top-left of a `viewport`-sized view centered on the player, kept
    /// inside the maze
    pub fn camera(&self, viewport: IVec2) -> IVec2 {
        let size = self.grid.pixel_size();
        let half = viewport / 2;
        (self.player - half).min(size - viewport).max(IVec2::ZERO)
    }

    pub fn drain_events(&mut self) -> Vec<MazeEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Advance the maze round by one fixed timestep
pub fn tick(state: &mut MazeState, input: &TickInput) {
    match state.phase {
        MazePhase::Won { .. } | MazePhase::Lost => {}
        MazePhase::Hugging { ticks_left } => {
            state.time_ticks += 1;
            let ticks_left = ticks_left.saturating_sub(1);
            state.phase = if ticks_left == 0 {
                state.events.push(MazeEvent::Won);
                log::info!("Maze won with {}s left", state.countdown);
                MazePhase::Won {
                    remaining: state.countdown,
                }
            } else {
                MazePhase::Hugging { ticks_left }
            };
        }
        MazePhase::Searching => {
            state.time_ticks += 1;
            state.second_ticks += 1;
            if state.second_ticks >= TICKS_PER_SECOND {
                state.second_ticks = 0;
                state.countdown = state.countdown.saturating_sub(1);
            }
            if state.countdown == 0 {
                state.phase = MazePhase::Lost;
                state.events.push(MazeEvent::TimeUp);
                log::info!("Maze lost: time ran out");
                return;
            }

            // Each axis moves independently, only onto floor
            let dir = input.direction().as_ivec2();
            let size = state.sprite_size;
            if dir.x != 0 {
                let x = state.player.x + dir.x * MAZE_PLAYER_SPEED;
                if state.grid.is_walkable(x, state.player.y, size, size) {
                    state.player.x = x;
                }
            }
            if dir.y != 0 {
                let y = state.player.y + dir.y * MAZE_PLAYER_SPEED;
                if state.grid.is_walkable(state.player.x, y, size, size) {
                    state.player.y = y;
                }
            }

            let center = state.player_box().center();
            if state.target_box().contains_point(center) {
                state.phase = MazePhase::Hugging {
                    ticks_left: HUG_TICKS,
                };
                state.events.push(MazeEvent::Found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_maze_parses() {
        let grid = MazeGrid::default_maze().expect("built-in maze");
        assert_eq!(grid.pixel_size(), IVec2::new(29 * 30, 21 * 30));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MazeGrid::parse(""), Err(MazeError::Empty));
        assert_eq!(
            MazeGrid::parse("###\n##\n"),
            Err(MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            MazeGrid::parse("#x#"),
            Err(MazeError::UnknownGlyph { glyph: 'x', .. })
        ));
    }

    #[test]
    fn test_walkable_respects_walls_and_bounds() {
        let grid = MazeGrid::parse("#####\n#...#\n#####").expect("valid layout");
        assert!(grid.is_walkable(30, 30, 30, 30));
        assert!(grid.is_walkable(30, 30, 90, 30));
        assert!(!grid.is_walkable(29, 30, 30, 30));
        assert!(!grid.is_walkable(30, 31, 30, 30));
        assert!(!grid.is_walkable(-1, 30, 10, 10));
    }

    #[test]
    fn test_find_positions_in_opposite_corners() {
        let grid = MazeGrid::default_maze().expect("built-in maze");
        assert_eq!(grid.find_position(SPRITE_SIZE, false), IVec2::new(30, 30));
        assert_eq!(grid.find_position(SPRITE_SIZE, true), IVec2::new(762, 522));
    }

    #[test]
    fn test_find_position_fallback() {
        let grid = MazeGrid::parse("###\n###\n###").expect("valid layout");
        assert_eq!(grid.find_position(SPRITE_SIZE, false), IVec2::splat(30));
    }

    #[test]
    fn test_walls_block_movement() {
        let mut state = MazeState::new(MazeGrid::default_maze().expect("built-in maze"));
        // The first corridor is three tiles wide; a wall sits at x = 120
        for _ in 0..10 {
            tick(&mut state, &right());
        }
        assert_eq!(state.player, IVec2::new(40, 30));

        let down = TickInput {
            down: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &down);
        }
        assert_eq!(state.player, IVec2::new(40, 80));
    }

    #[test]
    fn test_countdown_runs_out() {
        let mut state = MazeState::new(MazeGrid::default_maze().expect("built-in maze"));
        let idle = TickInput::default();
        for _ in 0..(COUNTDOWN_SECS * TICKS_PER_SECOND - 1) {
            tick(&mut state, &idle);
        }
        assert_eq!(state.phase, MazePhase::Searching);
        assert_eq!(state.countdown, 1);
        tick(&mut state, &idle);
        assert_eq!(state.phase, MazePhase::Lost);
        assert_eq!(state.score(), None);
        assert!(state.drain_events().contains(&MazeEvent::TimeUp));
    }

    #[test]
    fn test_finding_target_hugs_then_wins() {
        let mut state = MazeState::new(MazeGrid::default_maze().expect("built-in maze"));
        // Walk in next to the target from the left
        state.player = state.target - IVec2::new(40, 0);
        for _ in 0..(2 * TICKS_PER_SECOND) {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &right());
        assert_eq!(state.player, state.target - IVec2::new(30, 0));
        assert!(matches!(state.phase, MazePhase::Hugging { .. }));
        let frozen = state.countdown;

        for _ in 0..HUG_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, MazePhase::Won { remaining: frozen });
        assert_eq!(state.score(), Some(COUNTDOWN_SECS - 2));
    }

    #[test]
    fn test_camera_clamped_to_maze() {
        let mut state = MazeState::new(MazeGrid::default_maze().expect("built-in maze"));
        let viewport = IVec2::new(800, 600);
        assert_eq!(state.camera(viewport), IVec2::ZERO);
        state.player = state.target;
        assert_eq!(state.camera(viewport), IVec2::new(70, 30));
    }
}
