//! Gradient outer product and structure-tensor smoothing.

use crate::TENSOR_FILTER;
use flowscope_core::{Gradient, Tensor};

const TAPS: usize = TENSOR_FILTER.len();
const MARGIN: usize = TAPS / 2;

/// The six independent entries of the symmetric outer product of a
/// smoothed gradient triple. Stateless 1:1 map, no boundary effects.
#[inline]
pub fn outer_product(g: Gradient) -> Tensor {
    Tensor {
        val: [
            g.x * g.x,
            g.y * g.y,
            g.z * g.z,
            g.x * g.y,
            g.x * g.z,
            g.y * g.z,
        ],
    }
}

/// Vertical 3-tap smoothing pass over the six tensor channels.
///
/// One-pixel margin at the top and bottom edges emits exact zero.
pub struct TensorSmoothY<I> {
    input: I,
    width: usize,
    height: usize,
    /// Last three tensor rows, `TAPS * width`, ring-indexed by row.
    lines: Vec<Tensor>,
    row: usize,
    col: usize,
}

impl<I> TensorSmoothY<I>
where
    I: Iterator<Item = Tensor>,
{
    pub fn new(input: I, width: u32, height: u32) -> Self {
        Self {
            input,
            width: width as usize,
            height: height as usize,
            lines: vec![Tensor::ZERO; TAPS * width as usize],
            row: 0,
            col: 0,
        }
    }

    fn tick(&mut self) -> Option<Tensor> {
        let (r, c) = (self.row, self.col);
        self.col += 1;
        if self.col == self.width {
            self.col = 0;
            self.row += 1;
        }

        let tensor = if r < self.height {
            self.input.next().unwrap_or(Tensor::ZERO)
        } else {
            Tensor::ZERO
        };
        self.lines[(r % TAPS) * self.width + c] = tensor;

        // Output row r-1, one row behind the scan.
        if r < MARGIN {
            return None;
        }
        if r < 2 * MARGIN || r >= self.height {
            return Some(Tensor::ZERO);
        }
        let mut acc = Tensor::ZERO;
        for (i, k) in TENSOR_FILTER.iter().enumerate() {
            // rows r-2..r live at ring slots (r+1+i) % 3
            let t = self.lines[((r + 1 + i) % TAPS) * self.width + c];
            for (a, v) in acc.val.iter_mut().zip(t.val.iter()) {
                *a += v * k;
            }
        }
        Some(acc)
    }
}

impl<I> Iterator for TensorSmoothY<I>
where
    I: Iterator<Item = Tensor>,
{
    type Item = Tensor;

    fn next(&mut self) -> Option<Tensor> {
        while self.row < self.height + MARGIN {
            if let Some(out) = self.tick() {
                return Some(out);
            }
        }
        None
    }
}

/// Horizontal 3-tap smoothing pass over the six tensor channels.
///
/// One-pixel margin at the left and right edges emits exact zero.
pub struct TensorSmoothX<I> {
    input: I,
    width: usize,
    height: usize,
    window: [Tensor; TAPS],
    row: usize,
    col: usize,
}

impl<I> TensorSmoothX<I>
where
    I: Iterator<Item = Tensor>,
{
    pub fn new(input: I, width: u32, height: u32) -> Self {
        Self {
            input,
            width: width as usize,
            height: height as usize,
            window: [Tensor::ZERO; TAPS],
            row: 0,
            col: 0,
        }
    }

    fn tick(&mut self) -> Option<Tensor> {
        let c = self.col;
        self.col += 1;
        if self.col == self.width + MARGIN {
            self.col = 0;
            self.row += 1;
        }

        let tensor = if c < self.width {
            self.input.next().unwrap_or(Tensor::ZERO)
        } else {
            Tensor::ZERO
        };
        self.window.rotate_left(1);
        self.window[TAPS - 1] = tensor;

        if c < MARGIN {
            return None;
        }
        if c < 2 * MARGIN || c >= self.width {
            return Some(Tensor::ZERO);
        }
        let mut acc = Tensor::ZERO;
        for (t, k) in self.window.iter().zip(TENSOR_FILTER.iter()) {
            for (a, v) in acc.val.iter_mut().zip(t.val.iter()) {
                *a += v * k;
            }
        }
        Some(acc)
    }
}

impl<I> Iterator for TensorSmoothX<I>
where
    I: Iterator<Item = Tensor>,
{
    type Item = Tensor;

    fn next(&mut self) -> Option<Tensor> {
        while self.row < self.height {
            if let Some(out) = self.tick() {
                return Some(out);
            }
        }
        None
    }
}
