//! Concurrent execution of the pipeline, one thread per stage.
//!
//! Each stage is the same stream transducer the fused orchestrator uses,
//! fed from a bounded single-producer/single-consumer channel instead of
//! an in-process iterator. No stage reads ahead of what its predecessor
//! has emitted and no stage touches another stage's window state, so the
//! output is bit-identical to the single-threaded run. A frame group is
//! processed to completion as one unit of work; there is no mid-group
//! cancellation.

use crate::gradient::{SpatialGradient, TemporalGradient};
use crate::pipeline::PipelineOptions;
use crate::smooth::{SmoothX, SmoothY};
use crate::solve::FlowSolve;
use crate::tensor::{outer_product, TensorSmoothX, TensorSmoothY};
use crossbeam_channel::{bounded, Sender};
use flowscope_core::{FrameGroup, Gradient, Result, Tensor, VelocityField, GROUP_SIZE};
use std::thread;
use tracing::debug;

fn forward<T>(tx: &Sender<T>, value: T) -> bool {
    tx.send(value).is_ok()
}

/// Run the pipeline with every stage on its own thread.
pub fn compute_flow_threaded(
    group: &FrameGroup,
    options: &PipelineOptions,
) -> Result<VelocityField> {
    let (width, height) = (group.width(), group.height());
    let cap = options.capacity_for(width);
    debug!(width, height, cap, "spawning threaded pipeline");

    let (ref_tx, ref_rx) = bounded::<f32>(cap);
    let (samp_tx, samp_rx) = bounded::<[f32; GROUP_SIZE]>(cap);
    let (spat_tx, spat_rx) = bounded::<(f32, f32)>(cap);
    let (temp_tx, temp_rx) = bounded::<f32>(cap);
    let (sy_tx, sy_rx) = bounded::<Gradient>(cap);
    let (sx_tx, sx_rx) = bounded::<Gradient>(cap);
    let (outer_tx, outer_rx) = bounded::<Tensor>(cap);
    let (ty_tx, ty_rx) = bounded::<Tensor>(cap);
    let (tx_tx, tx_rx) = bounded::<Tensor>(cap);
    let (out_tx, out_rx) = bounded::<[f32; 2]>(cap);

    let data = thread::scope(|s| {
        // Feed: duplicate the reference frame for the spatial stencil
        // and fan the packed samples to the temporal stage.
        s.spawn(move || {
            for px in group.samples() {
                if !forward(&ref_tx, px[2]) || !forward(&samp_tx, px) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in SpatialGradient::new(ref_rx.into_iter(), width, height) {
                if !forward(&spat_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in TemporalGradient::new(samp_rx.into_iter()) {
                if !forward(&temp_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            let gradients = spat_rx
                .into_iter()
                .zip(temp_rx)
                .map(|((x, y), z)| Gradient { x, y, z });
            for out in SmoothY::new(gradients, width, height) {
                if !forward(&sy_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in SmoothX::new(sy_rx.into_iter(), width, height) {
                if !forward(&sx_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for tensor in sx_rx.into_iter().map(outer_product) {
                if !forward(&outer_tx, tensor) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in TensorSmoothY::new(outer_rx.into_iter(), width, height) {
                if !forward(&ty_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in TensorSmoothX::new(ty_rx.into_iter(), width, height) {
                if !forward(&tx_tx, out) {
                    return;
                }
            }
        });
        s.spawn(move || {
            for out in FlowSolve::new(tx_rx.into_iter(), width, height) {
                if !forward(&out_tx, out) {
                    return;
                }
            }
        });
        out_rx.into_iter().collect::<Vec<_>>()
    });

    Ok(VelocityField {
        width,
        height,
        data,
    })
}
