//! Spatial and temporal intensity-gradient stages.

use crate::{GRAD_NORM, GRAD_WEIGHTS};
use flowscope_core::GROUP_SIZE;

const TAPS: usize = GRAD_WEIGHTS.len();
/// Stencil reach on each side of the 5x5 window center.
const MARGIN: usize = TAPS / 2;

/// Streaming 5x5 stencil over the reference frame, producing per-pixel
/// horizontal and vertical gradients.
///
/// Maintains a five-row line buffer (ring-indexed by row) and a 5x5
/// shift window. The scan overruns the frame by two rows and columns so
/// that every output pixel is emitted exactly once in row-major order;
/// pixels whose window is not fully populated (margin of 2 per side)
/// emit exact zero for both channels.
pub struct SpatialGradient<I> {
    input: I,
    width: usize,
    height: usize,
    /// Last five rows of input, `TAPS * width`, ring-indexed by row.
    lines: Vec<f32>,
    /// [row][col] window; columns shift left as the scan advances.
    window: [[f32; TAPS]; TAPS],
    row: usize,
    col: usize,
}

impl<I> SpatialGradient<I>
where
    I: Iterator<Item = f32>,
{
    pub fn new(input: I, width: u32, height: u32) -> Self {
        Self {
            input,
            width: width as usize,
            height: height as usize,
            lines: vec![0.0; TAPS * width as usize],
            window: [[0.0; TAPS]; TAPS],
            row: 0,
            col: 0,
        }
    }

    /// Run one scan position: feed the window, return the output pixel
    /// if this position emits one.
    fn tick(&mut self) -> Option<(f32, f32)> {
        let (r, c) = (self.row, self.col);
        self.col += 1;
        if self.col == self.width + MARGIN {
            self.col = 0;
            self.row += 1;
        }

        // Feed: inside the frame, pull a pixel and cycle it through the
        // line buffer; outside, shift in a zero column.
        let mut column = [0.0f32; TAPS];
        if r < self.height && c < self.width {
            let px = self.input.next().unwrap_or(0.0);
            for (i, val) in column.iter_mut().take(TAPS - 1).enumerate() {
                // rows r-4..r-1 live at ring slots (r+1+i) % 5
                *val = self.lines[((r + 1 + i) % TAPS) * self.width + c];
            }
            column[TAPS - 1] = px;
            self.lines[(r % TAPS) * self.width + c] = px;
        }
        for (row, &val) in self.window.iter_mut().zip(column.iter()) {
            row.rotate_left(1);
            row[TAPS - 1] = val;
        }

        // Emit: output (r-2, c-2) once the scan is two past it.
        if r < MARGIN || c < MARGIN {
            return None;
        }
        let computed =
            r >= 2 * MARGIN && r < self.height && c >= 2 * MARGIN && c < self.width;
        if !computed {
            return Some((0.0, 0.0));
        }
        let mut x_grad = 0.0f32;
        let mut y_grad = 0.0f32;
        for i in 0..TAPS {
            x_grad += self.window[MARGIN][i] * GRAD_WEIGHTS[i];
            y_grad += self.window[i][MARGIN] * GRAD_WEIGHTS[i];
        }
        Some((x_grad / GRAD_NORM, y_grad / GRAD_NORM))
    }
}

impl<I> Iterator for SpatialGradient<I>
where
    I: Iterator<Item = f32>,
{
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.height + MARGIN {
            if let Some(out) = self.tick() {
                return Some(out);
            }
        }
        None
    }
}

/// Temporal derivative across the five-frame axis.
///
/// Applies the same five-tap kernel and /12 normalization as the spatial
/// case, pointwise. Every pixel has all five frames available, so no
/// boundary margin applies.
pub struct TemporalGradient<I> {
    input: I,
}

impl<I> TemporalGradient<I>
where
    I: Iterator<Item = [f32; GROUP_SIZE]>,
{
    pub fn new(input: I) -> Self {
        Self { input }
    }
}

impl<I> Iterator for TemporalGradient<I>
where
    I: Iterator<Item = [f32; GROUP_SIZE]>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.input.next().map(temporal_gradient)
    }
}

/// Weighted combination of one pixel's five temporal samples.
#[inline]
pub fn temporal_gradient(samples: [f32; GROUP_SIZE]) -> f32 {
    samples
        .iter()
        .zip(GRAD_WEIGHTS.iter())
        .map(|(s, w)| s * w)
        .sum::<f32>()
        / GRAD_NORM
}
