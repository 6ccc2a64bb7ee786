//! Single-pass pipeline orchestration over one frame group.

use crate::gradient::{SpatialGradient, TemporalGradient};
use crate::smooth::{SmoothX, SmoothY};
use crate::solve::FlowSolve;
use crate::streaming;
use crate::tensor::{outer_product, TensorSmoothX, TensorSmoothY};
use flowscope_core::{FrameGroup, Gradient, Result, VelocityField};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Execution options for one flow computation.
///
/// The kernels, margins, and normalization of the pipeline are fixed;
/// only the execution strategy is configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Run each stage on its own thread, connected by bounded channels.
    pub threaded: bool,
    /// Inter-stage channel capacity in threaded mode. Zero selects the
    /// default of four input rows (at least 64), which covers the
    /// worst-case skew between stages (the spatial gradient reads two
    /// rows ahead of the temporal gradient).
    pub queue_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            threaded: false,
            queue_capacity: 0,
        }
    }
}

impl PipelineOptions {
    pub(crate) fn capacity_for(&self, width: u32) -> usize {
        if self.queue_capacity > 0 {
            self.queue_capacity
        } else {
            (4 * width as usize).max(64)
        }
    }
}

/// Compute the dense velocity field for one five-frame group.
///
/// The group has already been validated (frame count and dimensions), so
/// the pipeline itself cannot fail; the `Result` covers future
/// collaborator-supplied stages.
pub fn compute_flow(group: &FrameGroup, options: &PipelineOptions) -> Result<VelocityField> {
    let (width, height) = (group.width(), group.height());
    debug!(width, height, threaded = options.threaded, "computing optical flow");

    if options.threaded {
        return streaming::compute_flow_threaded(group, options);
    }

    let data: Vec<[f32; 2]> = solve_stream(group).collect();
    Ok(VelocityField {
        width,
        height,
        data,
    })
}

/// The fused single-thread stage chain, exposed for the orchestrators.
fn solve_stream(group: &FrameGroup) -> impl Iterator<Item = [f32; 2]> + '_ {
    let (width, height) = (group.width(), group.height());
    let spatial = SpatialGradient::new(group.reference_frame().pixels(), width, height);
    let temporal = TemporalGradient::new(group.samples());
    let gradients = spatial
        .zip(temporal)
        .map(|((x, y), z)| Gradient { x, y, z });
    let smoothed = SmoothX::new(SmoothY::new(gradients, width, height), width, height);
    let outer = smoothed.map(outer_product);
    let tensors = TensorSmoothX::new(TensorSmoothY::new(outer, width, height), width, height);
    FlowSolve::new(tensors, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscope_core::Frame;

    fn constant_group(width: u32, height: u32, value: f32) -> FrameGroup {
        let frames = (0..5)
            .map(|_| {
                Frame::from_vec(vec![value; (width * height) as usize], width, height).unwrap()
            })
            .collect();
        FrameGroup::new(frames).unwrap()
    }

    #[test]
    fn constant_frames_give_exactly_zero_flow() {
        let group = constant_group(24, 16, 0.5);
        let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
        assert_eq!(field.width, 24);
        assert_eq!(field.height, 16);
        assert!(field.data.iter().all(|v| *v == [0.0, 0.0]));
    }

    #[test]
    fn output_dimensions_match_input() {
        let group = constant_group(17, 11, 0.25);
        let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
        assert_eq!(field.data.len(), 17 * 11);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let mut frames = Vec::new();
        for t in 0..5 {
            let mut frame = Frame::new(20, 20);
            for y in 0..20 {
                for x in 0..20 {
                    let phase = (x as f32 - 0.3 * t as f32) * 0.5 + y as f32 * 0.4;
                    frame.set(x, y, 0.5 + 0.3 * phase.sin());
                }
            }
            frames.push(frame);
        }
        let group = FrameGroup::new(frames).unwrap();
        let a = compute_flow(&group, &PipelineOptions::default()).unwrap();
        let b = compute_flow(&group, &PipelineOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn outer_two_pixel_band_is_zero() {
        let mut frames = Vec::new();
        for t in 0..5 {
            let mut frame = Frame::new(16, 16);
            for y in 0..16 {
                for x in 0..16 {
                    let v = ((x * 7 + y * 13 + t * 3) % 11) as f32 / 11.0;
                    frame.set(x, y, v);
                }
            }
            frames.push(frame);
        }
        let group = FrameGroup::new(frames).unwrap();
        let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
        for y in 0..16u32 {
            for x in 0..16u32 {
                if x < 2 || x >= 14 || y < 2 || y >= 14 {
                    assert_eq!(field.get(x, y), [0.0, 0.0], "band at ({x},{y})");
                }
            }
        }
    }
}
