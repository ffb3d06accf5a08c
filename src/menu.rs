//! Screen flow: MENU → PLAYING → ROUND_OVER → MENU, with EXIT reachable from
//! the menu's Quit entry, a quit during play, or Esc on the round-over prompt.

use log::debug;

use crate::entities::{GameState, Level};
use crate::input::{EdgeTrigger, Key, KeyPoll};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing(Level),
    RoundOver,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOption {
    Start(Level),
    Quit,
}

impl MenuOption {
    pub fn label(self) -> String {
        match self {
            MenuOption::Start(level) => format!("Level {} : {}", level.number(), level.title()),
            MenuOption::Quit => "Quit".to_string(),
        }
    }
}

pub const MENU_OPTIONS: [MenuOption; 4] = [
    MenuOption::Start(Level::Classic),
    MenuOption::Start(Level::SpeedRush),
    MenuOption::Start(Level::ChaosSlice),
    MenuOption::Quit,
];

/// Level-select menu. Every key is edge-detected, so holding a key moves or
/// confirms exactly once.
#[derive(Debug)]
pub struct Menu {
    selected: usize,
    up: EdgeTrigger,
    down: EdgeTrigger,
    confirm: EdgeTrigger,
    /// Shortcut keys `1`..=`9`, indexed by digit - 1.
    digits: [EdgeTrigger; 9],
}

impl Menu {
    /// Open the menu with the first option selected. Triggers are primed from
    /// `keys` so keys held while entering do not fire.
    pub fn open(keys: &impl KeyPoll) -> Self {
        Self {
            selected: 0,
            up: EdgeTrigger::primed(keys.is_pressed(Key::Up)),
            down: EdgeTrigger::primed(keys.is_pressed(Key::Down)),
            confirm: EdgeTrigger::primed(keys.is_pressed(Key::Enter)),
            digits: std::array::from_fn(|i| {
                EdgeTrigger::primed(keys.is_pressed(Key::Digit(i as u8 + 1)))
            }),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Process one poll. Returns the confirmed option, if any.
    pub fn poll(&mut self, keys: &impl KeyPoll) -> Option<MenuOption> {
        let count = MENU_OPTIONS.len();
        if self.up.poll(keys.is_pressed(Key::Up)) {
            self.selected = (self.selected + count - 1) % count;
        }
        if self.down.poll(keys.is_pressed(Key::Down)) {
            self.selected = (self.selected + 1) % count;
        }

        let mut shortcut = None;
        for (i, trigger) in self.digits.iter_mut().enumerate() {
            let digit = i as u8 + 1;
            if !trigger.poll(keys.is_pressed(Key::Digit(digit))) || shortcut.is_some() {
                continue;
            }
            match Level::try_from(digit) {
                Ok(level) => shortcut = Some(MenuOption::Start(level)),
                Err(err) => debug!("ignoring shortcut: {}", err),
            }
        }

        if self.confirm.poll(keys.is_pressed(Key::Enter)) {
            return Some(MENU_OPTIONS[self.selected]);
        }
        shortcut
    }
}

impl From<MenuOption> for Phase {
    fn from(option: MenuOption) -> Self {
        match option {
            MenuOption::Start(level) => Phase::Playing(level),
            MenuOption::Quit => Phase::Exit,
        }
    }
}

/// "Round Over" prompt: Enter returns to the menu, Esc exits.
#[derive(Debug)]
pub struct RoundOverPrompt {
    confirm: EdgeTrigger,
    cancel: EdgeTrigger,
}

impl RoundOverPrompt {
    pub fn open(keys: &impl KeyPoll) -> Self {
        Self {
            confirm: EdgeTrigger::primed(keys.is_pressed(Key::Enter)),
            cancel: EdgeTrigger::primed(keys.is_pressed(Key::Escape)),
        }
    }

    pub fn poll(&mut self, keys: &impl KeyPoll) -> Option<Phase> {
        let confirmed = self.confirm.poll(keys.is_pressed(Key::Enter));
        let cancelled = self.cancel.poll(keys.is_pressed(Key::Escape));
        if confirmed {
            Some(Phase::Menu)
        } else if cancelled {
            Some(Phase::Exit)
        } else {
            None
        }
    }
}

/// Where play goes after a tick. A quit during live play leaves the program;
/// a quit after a bomb hit shows the round-over prompt.
pub fn phase_after_tick(state: &GameState) -> Option<Phase> {
    match (state.quit, state.is_game_over()) {
        (false, _) => None,
        (true, true) => Some(Phase::RoundOver),
        (true, false) => Some(Phase::Exit),
    }
}
