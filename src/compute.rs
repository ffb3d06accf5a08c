//! Game rules.
//!
//! Every function works on a `GameState` owned by the caller. Randomness only
//! enters through an injected `Rng`, so tests drive the rules with a seeded
//! or mock generator.

use log::{debug, info, trace};
use rand::Rng;

use crate::entities::{
    Blade, GameState, GameStatus, Level, LevelConfig, MovableObject, ObjectKind, ObjectPool,
    BLADE_GLYPH, BOMB_GLYPH, FRUIT_GLYPHS, FRUIT_POINTS, HEIGHT, WIDTH,
};
use crate::grid::Grid;
use crate::input::TickInput;

// ── Difficulty table ─────────────────────────────────────────────────────────

pub fn level_config(level: Level) -> LevelConfig {
    match level {
        Level::Classic => LevelConfig {
            spawn_chance: 12,
            bomb_ratio: 5,
            fall_delay: 5,
            drift: false,
        },
        Level::SpeedRush => LevelConfig {
            spawn_chance: 9,
            bomb_ratio: 4,
            fall_delay: 3,
            drift: false,
        },
        Level::ChaosSlice => LevelConfig {
            spawn_chance: 8,
            bomb_ratio: 3,
            fall_delay: 2,
            drift: true,
        },
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state for a fresh round of `level`.
pub fn init_state(level: Level) -> GameState {
    GameState {
        objects: ObjectPool::default(),
        blade: Blade::start(),
        screen: Grid::framed(),
        score: 0,
        level,
        config: level_config(level),
        status: GameStatus::Playing,
        quit: false,
        fall_counter: 0,
        frame: 0,
    }
}

/// Reuse `state` for a new round of `level`: pool emptied, counters and
/// flags zeroed, blade recentred, border redrawn.
pub fn reset_state(state: &mut GameState, level: Level) {
    state.objects.clear();
    state.blade = Blade::start();
    state.screen = Grid::framed();
    state.score = 0;
    state.level = level;
    state.config = level_config(level);
    state.status = GameStatus::Playing;
    state.quit = false;
    state.fall_counter = 0;
    state.frame = 0;
}

// ── Blade ────────────────────────────────────────────────────────────────────

/// One step per held direction, each axis checked on its own and clamped to
/// the interior.
pub fn move_blade(blade: Blade, input: &TickInput) -> Blade {
    let mut next = blade;
    if input.left && next.x > 1 {
        next.x -= 1;
    }
    if input.right && next.x < WIDTH - 2 {
        next.x += 1;
    }
    if input.up && next.y > 1 {
        next.y -= 1;
    }
    if input.down && next.y < HEIGHT - 2 {
        next.y += 1;
    }
    next
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Roll for a new object. Returns `None` when the 1-in-`spawn_chance` roll
/// fails; otherwise an object on row 1 at a random interior column.
pub fn roll_spawn(config: &LevelConfig, rng: &mut impl Rng) -> Option<MovableObject> {
    if !rng.gen_ratio(1, config.spawn_chance.max(1)) {
        return None;
    }
    let x = rng.gen_range(1..=WIDTH - 2);
    let dx = if rng.gen::<bool>() { 1 } else { -1 };
    let (kind, glyph) = if rng.gen_ratio(1, config.bomb_ratio.max(1)) {
        (ObjectKind::Bomb, BOMB_GLYPH)
    } else {
        (
            ObjectKind::Fruit,
            FRUIT_GLYPHS[rng.gen_range(0..FRUIT_GLYPHS.len())],
        )
    };
    Some(MovableObject {
        x,
        y: 1,
        dx,
        glyph,
        active: true,
        kind,
    })
}

/// Attempt one spawn into the first free pool slot. A full pool drops the
/// spawn silently. Returns the slot used.
pub fn spawn_object(state: &mut GameState, rng: &mut impl Rng) -> Option<usize> {
    let object = roll_spawn(&state.config, rng)?;
    let slot = state.objects.insert(object);
    if let Some(i) = slot {
        trace!("spawned {:?} '{}' at x={} in slot {}", object.kind, object.glyph, object.x, i);
    }
    slot
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Bounce off the interior walls: x stays in [1, WIDTH-2] and dx flips
/// whenever x lands on a wall column.
fn drift(object: &mut MovableObject) {
    object.x = (object.x + object.dx).clamp(1, WIDTH - 2);
    if object.x <= 1 || object.x >= WIDTH - 2 {
        object.dx = -object.dx;
    }
}

/// One vertical step for every active object. Objects reaching the bottom
/// border row are dropped without penalty.
pub fn advance_objects(state: &mut GameState) {
    let drifting = state.config.drift;
    for object in state.objects.slots_mut().iter_mut().filter(|o| o.active) {
        if drifting {
            drift(object);
        }
        object.y += 1;
        if object.y >= HEIGHT - 1 {
            object.active = false;
        }
    }
}

// ── Frame & collisions ───────────────────────────────────────────────────────

/// Redraw the interior: objects first, then the blade on top.
pub fn rebuild_grid(state: &mut GameState) {
    state.screen.clear_interior();
    for object in state.objects.active() {
        state.screen.set(object.x, object.y, object.glyph);
    }
    state.screen.set(state.blade.x, state.blade.y, BLADE_GLYPH);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collisions {
    pub fruits: u32,
    pub bomb: bool,
}

/// Resolve every active object on the blade cell. All hits in one tick
/// apply: a bomb ends the round and stays put, a fruit is consumed for
/// points.
pub fn resolve_collisions(state: &mut GameState) -> Collisions {
    let mut hits = Collisions::default();
    let blade = state.blade;
    for object in state
        .objects
        .slots_mut()
        .iter_mut()
        .filter(|o| o.active && o.x == blade.x && o.y == blade.y)
    {
        match object.kind {
            ObjectKind::Bomb => hits.bomb = true,
            ObjectKind::Fruit => {
                object.active = false;
                hits.fruits += 1;
            }
        }
    }

    if hits.fruits > 0 {
        state.score += hits.fruits * FRUIT_POINTS;
        debug!("sliced {} fruit at ({}, {}), score {}", hits.fruits, blade.x, blade.y, state.score);
    }
    if hits.bomb {
        state.status = GameStatus::GameOver;
        info!("bomb hit at ({}, {}), final score {}", blade.x, blade.y, state.score);
    }
    hits
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the round by one tick.
pub fn update(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) {
    if input.quit {
        state.quit = true;
        return;
    }
    if state.is_game_over() {
        return;
    }
    state.frame += 1;

    state.blade = move_blade(state.blade, input);

    state.fall_counter += 1;
    if state.fall_counter >= state.config.fall_delay {
        state.fall_counter = 0;
        advance_objects(state);
        spawn_object(state, rng);
    }

    rebuild_grid(state);
    resolve_collisions(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(x: i32, dx: i32) -> MovableObject {
        MovableObject {
            x,
            y: 4,
            dx,
            glyph: 'o',
            active: true,
            kind: ObjectKind::Fruit,
        }
    }

    #[test]
    fn drift_reflects_off_left_wall() {
        let mut o = object_at(2, -1);
        drift(&mut o);
        assert_eq!((o.x, o.dx), (1, 1));
        drift(&mut o);
        assert_eq!((o.x, o.dx), (2, 1));
    }

    #[test]
    fn drift_never_leaves_interior_when_spawned_on_wall() {
        let mut o = object_at(1, -1);
        drift(&mut o);
        assert_eq!(o.x, 1);
        assert_eq!(o.dx, 1);

        let mut o = object_at(WIDTH - 2, 1);
        drift(&mut o);
        assert_eq!(o.x, WIDTH - 2);
        assert_eq!(o.dx, -1);
    }
}
