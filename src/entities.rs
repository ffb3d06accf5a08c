//! All game entity types — pure data, no game rules.

use std::time::Duration;

use crate::grid::Grid;

// ── Dimensions & timing ───────────────────────────────────────────────────────

/// Playfield width in cells, border included.
pub const WIDTH: i32 = 60;
/// Playfield height in cells, border included.
pub const HEIGHT: i32 = 20;
/// Capacity of the object pool.
pub const MAX_OBJECTS: usize = 15;
pub const TARGET_FPS: u64 = 20;
/// Sleep between game ticks. Work time is not subtracted.
pub const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);
/// Sleep between polls on the menu and round-over prompts.
pub const PROMPT_POLL: Duration = Duration::from_millis(16);

// ── Glyphs & scoring ──────────────────────────────────────────────────────────

pub const BORDER_GLYPH: char = '#';
pub const BLADE_GLYPH: char = '|';
pub const BOMB_GLYPH: char = 'X';
pub const FRUIT_GLYPHS: [char; 5] = ['*', 'o', '+', '#', '@'];
pub const FRUIT_POINTS: u32 = 10;

// ── Kinds, levels, status ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Fruit,
    Bomb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Classic,
    SpeedRush,
    ChaosSlice,
}

impl Level {
    /// 1-based level number shown on the status line.
    pub fn number(self) -> u8 {
        match self {
            Level::Classic => 1,
            Level::SpeedRush => 2,
            Level::ChaosSlice => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Level::Classic => "Classic",
            Level::SpeedRush => "Speed Rush",
            Level::ChaosSlice => "Chaos Slice",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = crate::GameError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Level::Classic),
            2 => Ok(Level::SpeedRush),
            3 => Ok(Level::ChaosSlice),
            other => Err(crate::GameError::UnknownLevel(other)),
        }
    }
}

/// Per-level tuning. Chances are denominators: `spawn_chance = 12` means a
/// 1-in-12 roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub spawn_chance: u32,
    pub bomb_ratio: u32,
    /// Ticks between vertical steps.
    pub fall_delay: u32,
    /// Horizontal drift with wall bounce.
    pub drift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// A bomb was hit; the round is frozen until the player quits.
    GameOver,
}

// ── Objects & blade ───────────────────────────────────────────────────────────

/// A fruit or bomb occupying one pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovableObject {
    pub x: i32,
    pub y: i32,
    /// Horizontal drift direction, -1 or +1.
    pub dx: i32,
    pub glyph: char,
    pub active: bool,
    pub kind: ObjectKind,
}

impl Default for MovableObject {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            dx: 1,
            glyph: ' ',
            active: false,
            kind: ObjectKind::Fruit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blade {
    pub x: i32,
    pub y: i32,
}

impl Blade {
    /// Starting position: horizontally centred on the bottom interior row.
    pub fn start() -> Self {
        Self {
            x: WIDTH / 2,
            y: HEIGHT - 2,
        }
    }
}

/// Fixed-capacity arena of object slots. A slot is free when its object is
/// inactive; allocation is a linear scan for the first free slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectPool {
    slots: [MovableObject; MAX_OBJECTS],
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self {
            slots: [MovableObject::default(); MAX_OBJECTS],
        }
    }
}

impl ObjectPool {
    /// Activates `object` in the first free slot and returns its index, or
    /// `None` when every slot is taken.
    pub fn insert(&mut self, object: MovableObject) -> Option<usize> {
        let index = self.slots.iter().position(|slot| !slot.active)?;
        self.slots[index] = MovableObject {
            active: true,
            ..object
        };
        Some(index)
    }

    pub fn slots(&self) -> &[MovableObject] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [MovableObject] {
        &mut self.slots
    }

    pub fn active(&self) -> impl Iterator<Item = &MovableObject> {
        self.slots.iter().filter(|o| o.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn clear(&mut self) {
        self.slots = [MovableObject::default(); MAX_OBJECTS];
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything one round needs. Owned by the game loop and passed by
/// reference into update and render.
#[derive(Clone, Debug)]
pub struct GameState {
    pub objects: ObjectPool,
    pub blade: Blade,
    /// Frame built by the last update: border, objects, blade.
    pub screen: Grid,
    pub score: u32,
    pub level: Level,
    pub config: LevelConfig,
    pub status: GameStatus,
    pub quit: bool,
    /// Ticks since the last vertical step.
    pub fall_counter: u32,
    pub frame: u64,
}

impl GameState {
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
