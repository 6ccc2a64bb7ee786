//! Separable 7-tap low-pass smoothing of the gradient triple.
//!
//! Two sequential 1-D passes, vertical then horizontal. The ordering
//! matters for the shape of the boundary-zero region; in the interior
//! the composition equals a 2-D convolution.

use crate::GRAD_FILTER;
use flowscope_core::Gradient;

const TAPS: usize = GRAD_FILTER.len();
const MARGIN: usize = TAPS / 2;

/// Vertical 7-tap smoothing pass over the gradient stream.
///
/// Keeps a seven-row line buffer ring-indexed by row. Output rows within
/// three of the top or bottom edge emit exact zero.
pub struct SmoothY<I> {
    input: I,
    width: usize,
    height: usize,
    /// Last seven gradient rows, `TAPS * width`, ring-indexed by row.
    lines: Vec<Gradient>,
    row: usize,
    col: usize,
}

impl<I> SmoothY<I>
where
    I: Iterator<Item = Gradient>,
{
    pub fn new(input: I, width: u32, height: u32) -> Self {
        Self {
            input,
            width: width as usize,
            height: height as usize,
            lines: vec![Gradient::ZERO; TAPS * width as usize],
            row: 0,
            col: 0,
        }
    }

    fn tick(&mut self) -> Option<Gradient> {
        let (r, c) = (self.row, self.col);
        self.col += 1;
        if self.col == self.width {
            self.col = 0;
            self.row += 1;
        }

        // Rows past the bottom flush the buffer with zeros.
        let grad = if r < self.height {
            self.input.next().unwrap_or(Gradient::ZERO)
        } else {
            Gradient::ZERO
        };
        self.lines[(r % TAPS) * self.width + c] = grad;

        // Output row r-3, three rows behind the scan.
        if r < MARGIN {
            return None;
        }
        if r < 2 * MARGIN || r >= self.height {
            return Some(Gradient::ZERO);
        }
        let mut acc = Gradient::ZERO;
        for (i, k) in GRAD_FILTER.iter().enumerate() {
            // rows r-6..r live at ring slots (r+1+i) % 7
            let g = self.lines[((r + 1 + i) % TAPS) * self.width + c];
            acc.x += g.x * k;
            acc.y += g.y * k;
            acc.z += g.z * k;
        }
        Some(acc)
    }
}

impl<I> Iterator for SmoothY<I>
where
    I: Iterator<Item = Gradient>,
{
    type Item = Gradient;

    fn next(&mut self) -> Option<Gradient> {
        while self.row < self.height + MARGIN {
            if let Some(out) = self.tick() {
                return Some(out);
            }
        }
        None
    }
}

/// Horizontal 7-tap smoothing pass over the gradient stream.
///
/// Keeps a seven-element window register. Output columns within three of
/// the left or right edge emit exact zero.
pub struct SmoothX<I> {
    input: I,
    width: usize,
    height: usize,
    window: [Gradient; TAPS],
    row: usize,
    col: usize,
}

impl<I> SmoothX<I>
where
    I: Iterator<Item = Gradient>,
{
    pub fn new(input: I, width: u32, height: u32) -> Self {
        Self {
            input,
            width: width as usize,
            height: height as usize,
            window: [Gradient::ZERO; TAPS],
            row: 0,
            col: 0,
        }
    }

    fn tick(&mut self) -> Option<Gradient> {
        let c = self.col;
        self.col += 1;
        if self.col == self.width + MARGIN {
            self.col = 0;
            self.row += 1;
        }

        // Columns past the right edge flush the window with zeros.
        let grad = if c < self.width {
            self.input.next().unwrap_or(Gradient::ZERO)
        } else {
            Gradient::ZERO
        };
        self.window.rotate_left(1);
        self.window[TAPS - 1] = grad;

        if c < MARGIN {
            return None;
        }
        if c < 2 * MARGIN || c >= self.width {
            return Some(Gradient::ZERO);
        }
        let mut acc = Gradient::ZERO;
        for (g, k) in self.window.iter().zip(GRAD_FILTER.iter()) {
            acc.x += g.x * k;
            acc.y += g.y * k;
            acc.z += g.z * k;
        }
        Some(acc)
    }
}

impl<I> Iterator for SmoothX<I>
where
    I: Iterator<Item = Gradient>,
{
    type Item = Gradient;

    fn next(&mut self) -> Option<Gradient> {
        while self.row < self.height {
            if let Some(out) = self.tick() {
                return Some(out);
            }
        }
        None
    }
}
