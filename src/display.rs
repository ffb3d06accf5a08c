//! Rendering layer — all terminal I/O lives here.
//!
//! Gameplay frames go through the `Screen` trait: the renderer diffs the
//! current grid against the last presented one and only writes changed cells,
//! then rewrites the status line. The menu and round-over prompt are small
//! enough to draw directly.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{
    GameState, BLADE_GLYPH, BOMB_GLYPH, BORDER_GLYPH, HEIGHT, WIDTH,
};
use crate::grid::Grid;
use crate::menu::{Menu, MENU_OPTIONS};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BLADE: Color = Color::White;
const C_BOMB: Color = Color::Red;
const C_FRUIT: Color = Color::Green;
const C_STATUS: Color = Color::Yellow;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const TITLE: [&str; 5] = [
    "FFFF RRR  U  U III TTTTT   N   N III N   N   JJ  AAA ",
    "F    R  R U  U  I    T     NN  N  I  NN  N    J A   A",
    "FFF  RRR  U  U  I    T     N N N  I  N N N    J AAAAA",
    "F    R R  U  U  I    T     N  NN  I  N  NN J  J A   A",
    "F    R  R  UU  III   T     N   N III N   N  JJ  A   A",
];

// ── Platform surface ──────────────────────────────────────────────────────────

/// Output surface for gameplay frames.
pub trait Screen {
    fn write_cell(&mut self, x: i32, y: i32, glyph: char) -> std::io::Result<()>;
    fn write_status_line(&mut self, text: &str) -> std::io::Result<()>;
    fn flush(&mut self) -> std::io::Result<()>;
}

/// `Screen` backed by a crossterm writer. Commands are queued and sent on
/// `flush`.
pub struct TerminalScreen<W: Write> {
    out: W,
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

fn glyph_color(x: i32, y: i32, glyph: char) -> Color {
    let on_border = x == 0 || y == 0 || x == WIDTH - 1 || y == HEIGHT - 1;
    match glyph {
        BORDER_GLYPH if on_border => C_BORDER,
        BLADE_GLYPH => C_BLADE,
        BOMB_GLYPH => C_BOMB,
        _ => C_FRUIT,
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn write_cell(&mut self, x: i32, y: i32, glyph: char) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(x as u16, y as u16))?;
        self.out.queue(style::SetForegroundColor(glyph_color(x, y, glyph)))?;
        self.out.queue(Print(glyph))?;
        Ok(())
    }

    fn write_status_line(&mut self, text: &str) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(0, HEIGHT as u16))?;
        self.out.queue(style::SetForegroundColor(C_STATUS))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

// ── Differential renderer ─────────────────────────────────────────────────────

/// Keeps the last presented frame so each new frame only writes what
/// changed.
#[derive(Debug)]
pub struct Renderer {
    last: Grid,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { last: Grid::blank() }
    }

    /// Force the next frame to redraw every cell.
    pub fn invalidate(&mut self) {
        self.last = Grid::blank();
    }

    /// Present one frame. Returns the number of grid cells written.
    pub fn render<S: Screen>(&mut self, screen: &mut S, state: &GameState) -> std::io::Result<usize> {
        let mut written = 0;
        for (x, y, glyph) in state.screen.changed_cells(&self.last) {
            screen.write_cell(x, y, glyph)?;
            written += 1;
        }
        self.last.clone_from(&state.screen);

        screen.write_status_line(&status_line(state))?;
        screen.flush()?;
        Ok(written)
    }
}

/// Score, level and quit hint, padded to the playfield width so leftovers
/// from a longer previous line are blanked.
pub fn status_line(state: &GameState) -> String {
    let text = format!(
        "Score:{:<6} Level:{:<2}  Q/ESC Quit",
        state.score,
        state.level.number()
    );
    format!("{:<width$}", text, width = WIDTH as usize)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn draw_menu<W: Write>(out: &mut W, menu: &Menu) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    for (row, line) in TITLE.iter().enumerate() {
        out.queue(cursor::MoveTo(0, row as u16))?;
        out.queue(Print(*line))?;
    }

    let top = TITLE.len() as u16 + 1;
    out.queue(cursor::MoveTo(0, top))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("           SELECT LEVEL"))?;

    for (i, option) in MENU_OPTIONS.iter().enumerate() {
        let marker = if i == menu.selected() { ">" } else { " " };
        out.queue(cursor::MoveTo(0, top + 2 + i as u16))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        out.queue(Print(format!("        {} {}", marker, option.label())))?;
    }

    out.queue(cursor::MoveTo(0, top + 7))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ : Select   ENTER : Confirm   1-3 : Quick start"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Round over ────────────────────────────────────────────────────────────────

pub fn draw_round_over<W: Write>(out: &mut W, score: u32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, HEIGHT as u16 + 2))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(format!("Round Over! Score: {}", score)))?;
    out.queue(cursor::MoveTo(0, HEIGHT as u16 + 3))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Press ENTER to return to menu or ESC to quit."))?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Wipe the terminal, e.g. when switching between screens.
pub fn clear<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.flush()
}
