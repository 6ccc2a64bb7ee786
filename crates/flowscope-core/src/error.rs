//! Error types for FlowScope.

use thiserror::Error;

/// Configuration and input-validation errors.
///
/// All variants are fatal and reported before any pipeline stage runs.
/// Numeric degeneracy and boundary pixels are not errors — they have
/// defined (0,0) fallback outputs and stay silent.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("expected {expected} frames, got {got}")]
    FrameCount { expected: usize, got: usize },

    #[error("frame dimension mismatch: expected {expected_width}x{expected_height}, got {got_width}x{got_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error("pixel count mismatch: expected {expected}, got {got}")]
    PixelCount { expected: usize, got: usize },

    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}

/// Result type alias for FlowScope operations.
pub type Result<T> = std::result::Result<T, FlowError>;
