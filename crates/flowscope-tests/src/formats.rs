//! Integration tests for the file-format collaborators.

use flowscope_core::{Frame, FrameGroup, VelocityField};
use flowscope_flow::{compute_flow, PipelineOptions};
use flowscope_io::{
    average_angular_error, average_endpoint_error, read_flo, read_pgm, write_flo, write_pgm,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flowscope-test-{}-{name}", std::process::id()))
}

#[test]
fn pgm_round_trips_through_disk() {
    let mut frame = Frame::new(9, 7);
    for y in 0..7 {
        for x in 0..9 {
            frame.set(x, y, ((x + y * 9) % 256) as f32 / 255.0);
        }
    }
    let path = temp_path("roundtrip.pgm");
    write_pgm(&path, &frame).unwrap();
    let loaded = read_pgm(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.width, 9);
    assert_eq!(loaded.height, 7);
    for (a, b) in frame.data.iter().zip(loaded.data.iter()) {
        assert!((a - b).abs() < 1.0 / 255.0 + 1e-6);
    }
}

#[test]
fn flo_round_trips_through_disk() {
    let mut field = VelocityField::zeros(6, 4);
    for (i, v) in field.data.iter_mut().enumerate() {
        *v = [i as f32 * 0.5, -(i as f32) * 0.25];
    }
    let path = temp_path("roundtrip.flo");
    write_flo(&path, &field).unwrap();
    let loaded = read_flo(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, field);
}

#[test]
fn computed_flow_survives_flo_serialization() {
    let frames = (0..5)
        .map(|t| {
            let mut frame = Frame::new(24, 24);
            for y in 0..24 {
                for x in 0..24 {
                    let fx = x as f32 - 0.5 * t as f32;
                    frame.set(
                        x,
                        y,
                        0.5 + 0.2 * (fx * 0.4).sin() + 0.2 * (y as f32 * 0.4).sin(),
                    );
                }
            }
            frame
        })
        .collect();
    let group = FrameGroup::new(frames).unwrap();
    let field = compute_flow(&group, &PipelineOptions::default()).unwrap();

    let path = temp_path("computed.flo");
    write_flo(&path, &field).unwrap();
    let loaded = read_flo(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // serialization is exact, so the metrics against the original are zero
    assert_eq!(loaded, field);
    assert!(average_endpoint_error(&loaded, &field).unwrap() < 1e-12);
    assert!(average_angular_error(&loaded, &field).unwrap() < 1e-9);
}

#[test]
fn metrics_detect_a_shifted_field() {
    let a = VelocityField::zeros(8, 8);
    let mut b = VelocityField::zeros(8, 8);
    for v in b.data.iter_mut() {
        *v = [1.0, 0.0];
    }
    let epe = average_endpoint_error(&a, &b).unwrap();
    assert!((epe - 1.0).abs() < 1e-9);
    let aae = average_angular_error(&a, &b).unwrap();
    assert!((aae - 45.0).abs() < 1e-6);
}
