//! FlowScope Core - Foundation types for dense optical flow.
//!
//! This crate provides the fundamental types used throughout FlowScope:
//! - Grayscale frames and the five-frame input group
//! - Gradient triples and structure tensors
//! - The per-pixel velocity field output
//! - Input-validation errors

pub mod error;
pub mod field;
pub mod frame;

pub use error::{FlowError, Result};
pub use field::{Gradient, Tensor, VelocityField};
pub use frame::{Frame, FrameGroup, GROUP_SIZE};
