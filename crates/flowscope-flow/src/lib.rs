//! FlowScope Flow - Streaming dense optical flow pipeline.
//!
//! Computes a per-pixel 2-D velocity field from five temporally adjacent
//! grayscale frames using a Lucas-Kanade structure-tensor method. The
//! pipeline is a chain of row-major stream transducers:
//!
//! demux -> spatial + temporal gradients -> 7-tap separable smoothing ->
//! outer product -> 3-tap tensor smoothing -> per-pixel 2x2 solve
//!
//! Each stage owns its own sliding-window state (ring-buffered row
//! history or a shift register) and emits output pixels in the same
//! row-major order it consumes input, with a bounded, stage-specific
//! latency. Stages can run fused on one thread ([`compute_flow`]) or as
//! concurrent pipeline stages connected by bounded channels
//! ([`streaming::compute_flow_threaded`]); both produce identical output.

pub mod demux;
pub mod gradient;
pub mod pipeline;
pub mod smooth;
pub mod solve;
pub mod streaming;
pub mod tensor;

pub use demux::{pack_group, FrameDemux, PackedSample};
pub use gradient::{SpatialGradient, TemporalGradient};
pub use pipeline::{compute_flow, PipelineOptions};
pub use smooth::{SmoothX, SmoothY};
pub use solve::FlowSolve;
pub use tensor::{outer_product, TensorSmoothX, TensorSmoothY};

/// Five-tap derivative kernel shared by the spatial and temporal
/// gradient stages.
pub const GRAD_WEIGHTS: [f32; 5] = [1.0, -8.0, 0.0, 8.0, -1.0];

/// First-moment normalization of [`GRAD_WEIGHTS`]. Fixed, not tunable.
pub const GRAD_NORM: f32 = 12.0;

/// Seven-tap near-Gaussian low-pass kernel for gradient smoothing.
pub const GRAD_FILTER: [f32; 7] = [0.0755, 0.133, 0.1869, 0.2903, 0.1869, 0.133, 0.0755];

/// Three-tap low-pass kernel for structure-tensor smoothing.
pub const TENSOR_FILTER: [f32; 3] = [0.3243, 0.3513, 0.3243];
