//! Terminal fruit-slicing arcade game.
//!
//! Fruits and bombs fall through a fixed 60×20 playfield; the player steers a
//! blade to slice fruit for points and must avoid bombs. `compute` holds the
//! per-tick rules, `display` the differential terminal renderer, `input` and
//! `menu` the key model and screen state machine.

pub mod compute;
pub mod display;
pub mod entities;
pub mod grid;
pub mod input;
pub mod menu;

/// Errors surfaced by the library's fallible conversions.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("no level numbered {0}; levels are 1 to 3")]
    UnknownLevel(u8),
}
