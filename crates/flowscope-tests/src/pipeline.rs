//! End-to-end tests for the flow pipeline.
//!
//! Exercises cross-crate interactions between flowscope-core and
//! flowscope-flow over synthetic frame groups with known motion.

use flowscope_core::{Frame, FrameGroup};
use flowscope_flow::streaming::compute_flow_threaded;
use flowscope_flow::{compute_flow, pack_group, FrameDemux, PipelineOptions};

// ── Helpers ────────────────────────────────────────────────────

/// Frames of a 2-D sinusoid pattern translating right by `vx` px/frame.
///
/// The pattern has gradients along both axes so the structure tensor is
/// well conditioned everywhere; a single edge would be degenerate under
/// the aperture problem and solve to (0, 0).
fn translating_group(size: u32, vx: f32) -> FrameGroup {
    let period = 16.0;
    let frames = (0..5)
        .map(|t| {
            let mut frame = Frame::new(size, size);
            for y in 0..size {
                for x in 0..size {
                    let fx = x as f32 - vx * t as f32;
                    let v = 0.5
                        + 0.2 * (fx * std::f32::consts::TAU / period).sin()
                        + 0.2 * (y as f32 * std::f32::consts::TAU / period).sin();
                    frame.set(x, y, v);
                }
            }
            frame
        })
        .collect();
    FrameGroup::new(frames).unwrap()
}

/// Pixels at least `margin` from every edge of a square field.
fn interior(size: u32, margin: u32) -> impl Iterator<Item = (u32, u32)> {
    (margin..size - margin).flat_map(move |y| (margin..size - margin).map(move |x| (x, y)))
}

// ── Motion recovery ────────────────────────────────────────────

#[test]
fn recovers_subpixel_rightward_translation() {
    let size = 32;
    let group = translating_group(size, 0.4);
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();

    // Only pixels whose full stencil cascade saw real data: spatial
    // margin 2 + smoothing margin 3 + tensor margin 1, plus smoothing
    // windows that reach into those margins.
    for (x, y) in interior(size, 9) {
        let [vx, vy] = field.get(x, y);
        assert!(
            (vx - 0.4).abs() < 0.02,
            "vx at ({x},{y}) = {vx}, expected ~0.4"
        );
        assert!(vy.abs() < 0.02, "vy at ({x},{y}) = {vy}, expected ~0");
    }
}

#[test]
fn leftward_translation_flips_sign() {
    let size = 32;
    let group = translating_group(size, -0.3);
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
    for (x, y) in interior(size, 9) {
        let [vx, _] = field.get(x, y);
        assert!((vx + 0.3).abs() < 0.02, "vx at ({x},{y}) = {vx}");
    }
}

#[test]
fn static_scene_has_zero_flow() {
    let group = translating_group(32, 0.0);
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
    for (x, y) in interior(32, 9) {
        let [vx, vy] = field.get(x, y);
        assert!(vx.abs() < 1e-4 && vy.abs() < 1e-4, "flow at ({x},{y})");
    }
}

// ── Invariants ─────────────────────────────────────────────────

#[test]
fn constant_frames_are_exactly_zero_everywhere() {
    let frames = (0..5).map(|_| {
        Frame::from_vec(vec![0.73; 16 * 16], 16, 16).unwrap()
    });
    let group = FrameGroup::new(frames.collect()).unwrap();
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
    assert!(field.data.iter().all(|v| *v == [0.0, 0.0]));
}

#[test]
fn outer_band_is_structurally_zero() {
    let group = translating_group(32, 0.5);
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();
    for y in 0..32u32 {
        for x in 0..32u32 {
            if x < 2 || x >= 30 || y < 2 || y >= 30 {
                assert_eq!(field.get(x, y), [0.0, 0.0], "band at ({x},{y})");
            }
        }
    }
}

#[test]
fn threaded_and_fused_agree_bit_for_bit() {
    let group = translating_group(32, 0.4);
    let fused = compute_flow(&group, &PipelineOptions::default()).unwrap();
    let threaded = compute_flow_threaded(&group, &PipelineOptions::default()).unwrap();
    assert_eq!(fused, threaded);

    let via_options = compute_flow(
        &group,
        &PipelineOptions {
            threaded: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(fused, via_options);
}

// ── Demux path ─────────────────────────────────────────────────

#[test]
fn packed_samples_flow_end_to_end() {
    let size = 32;
    let group = translating_group(size, 0.4);
    let packed = pack_group(&group);

    let demux = FrameDemux::new(size, size);
    let unpacked = demux.split(&packed).unwrap();
    let field = compute_flow(&unpacked, &PipelineOptions::default()).unwrap();

    // 8-bit quantization costs accuracy but the motion survives
    for (x, y) in interior(size, 9) {
        let [vx, vy] = field.get(x, y);
        assert!((vx - 0.4).abs() < 0.1, "vx at ({x},{y}) = {vx}");
        assert!(vy.abs() < 0.1, "vy at ({x},{y}) = {vy}");
    }
}

#[test]
fn demux_rejects_truncated_input() {
    let demux = FrameDemux::new(8, 8);
    assert!(demux.split(&vec![[0u8; 5]; 63]).is_err());
}
