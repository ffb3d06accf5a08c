//! Fixed-size character buffer for the playfield.

use crate::entities::{BORDER_GLYPH, HEIGHT, WIDTH};

const CELLS: usize = (WIDTH * HEIGHT) as usize;

/// WIDTH×HEIGHT glyphs in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<char>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::filled(' ')
    }
}

impl Grid {
    pub fn filled(glyph: char) -> Self {
        Self {
            cells: vec![glyph; CELLS],
        }
    }

    /// A grid that matches no drawable frame, so diffing against it
    /// redraws every cell.
    pub fn blank() -> Self {
        Self::filled('\0')
    }

    /// Blank interior framed by the border glyph.
    pub fn framed() -> Self {
        let mut grid = Self::default();
        grid.draw_border();
        grid
    }

    #[inline]
    fn idx(x: i32, y: i32) -> Option<usize> {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return None;
        }
        Some((y * WIDTH + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        Self::idx(x, y).map(|i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, glyph: char) {
        if let Some(i) = Self::idx(x, y) {
            self.cells[i] = glyph;
        }
    }

    pub fn draw_border(&mut self) {
        for x in 0..WIDTH {
            self.set(x, 0, BORDER_GLYPH);
            self.set(x, HEIGHT - 1, BORDER_GLYPH);
        }
        for y in 0..HEIGHT {
            self.set(0, y, BORDER_GLYPH);
            self.set(WIDTH - 1, y, BORDER_GLYPH);
        }
    }

    pub fn clear_interior(&mut self) {
        for y in 1..HEIGHT - 1 {
            for x in 1..WIDTH - 1 {
                self.set(x, y, ' ');
            }
        }
    }

    /// Cells where `self` differs from `prev`, as `(x, y, glyph)` with the
    /// glyph taken from `self`.
    pub fn changed_cells<'a>(
        &'a self,
        prev: &'a Grid,
    ) -> impl Iterator<Item = (i32, i32, char)> + 'a {
        self.cells
            .iter()
            .zip(prev.cells.iter())
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(|(i, (&glyph, _))| {
                let i = i as i32;
                (i % WIDTH, i / WIDTH, glyph)
            })
    }

    /// Interior bounds check: excludes the one-cell border frame.
    pub fn in_interior(x: i32, y: i32) -> bool {
        (1..=WIDTH - 2).contains(&x) && (1..=HEIGHT - 2).contains(&y)
    }
}
