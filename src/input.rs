//! Key model.
//!
//! Terminals deliver key *events*, while the game samples key *state* once
//! per tick. `KeyboardState` bridges the two by recording when each key was
//! last seen (press or repeat).
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol and friends): real
//!   `Release` events arrive, so a key is held exactly from press to release.
//! * **Classic terminals**: only `Press` events arrive, with OS key-repeat
//!   showing up as repeated presses. A key stays held for `HOLD_WINDOW` after
//!   its last event, which outlasts the OS delay before the first repeat.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// How long a key counts as held after its last press/repeat event when the
/// terminal does not report releases. Must exceed the first-repeat delay
/// (250–600 ms on common keyboards).
pub const HOLD_WINDOW: Duration = Duration::from_millis(650);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Quit,
    Escape,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Digit(u8),
}

impl Key {
    /// Map a terminal key code; arrows have WASD aliases.
    pub fn from_code(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Quit),
            KeyCode::Esc => Some(Key::Escape),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
            KeyCode::Char(c @ '1'..='9') => Some(Key::Digit(c as u8 - b'0')),
            _ => None,
        }
    }
}

/// Polled key-down state.
pub trait KeyPoll {
    fn is_pressed(&self, key: Key) -> bool;
}

/// Held-key tracker fed from terminal key events.
#[derive(Debug)]
pub struct KeyboardState {
    last_seen: HashMap<Key, Instant>,
    now: Option<Instant>,
    release_events: bool,
    interrupted: bool,
}

impl KeyboardState {
    /// `release_events` says whether the terminal reports key releases. When
    /// it does, keys never expire on their own.
    pub fn new(release_events: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            now: None,
            release_events,
            interrupted: false,
        }
    }

    pub fn reports_releases(&self) -> bool {
        self.release_events
    }

    /// Record one key event observed at `at`.
    pub fn record(&mut self, event: &KeyEvent, at: Instant) {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.interrupted = true;
            return;
        }
        let Some(key) = Key::from_code(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key, at);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key);
            }
        }
    }

    /// Fix the instant that `is_pressed` is evaluated at.
    pub fn sync(&mut self, now: Instant) {
        self.now = Some(now);
        if !self.release_events {
            self.last_seen
                .retain(|_, seen| now.saturating_duration_since(*seen) <= HOLD_WINDOW);
        }
    }

    /// Ctrl-C was pressed. Raw mode swallows SIGINT, so this is the only
    /// way to learn about it.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }
}

impl KeyPoll for KeyboardState {
    fn is_pressed(&self, key: Key) -> bool {
        match (self.last_seen.get(&key), self.now) {
            (None, _) => false,
            _ if self.release_events => true,
            (Some(seen), Some(now)) => now.saturating_duration_since(*seen) <= HOLD_WINDOW,
            (Some(_), None) => true,
        }
    }
}

/// Fires once per released→pressed transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    was_pressed: bool,
}

impl EdgeTrigger {
    /// Start from the current key state, so a key still held from the
    /// previous screen must be released before it can fire.
    pub fn primed(pressed_now: bool) -> Self {
        Self {
            was_pressed: pressed_now,
        }
    }

    pub fn poll(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}

/// One tick's sampled gameplay keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub quit: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl TickInput {
    pub fn sample(keys: &impl KeyPoll) -> Self {
        Self {
            quit: keys.is_pressed(Key::Quit) || keys.is_pressed(Key::Escape),
            left: keys.is_pressed(Key::Left),
            right: keys.is_pressed(Key::Right),
            up: keys.is_pressed(Key::Up),
            down: keys.is_pressed(Key::Down),
        }
    }
}
