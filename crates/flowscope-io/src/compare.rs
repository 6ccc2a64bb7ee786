//! Error metrics between a computed flow field and a reference.
//!
//! Validation only; not part of the core pipeline.

use crate::error::Result;
use flowscope_core::{FlowError, VelocityField};
use rayon::prelude::*;

fn check_dims(est: &VelocityField, reference: &VelocityField) -> Result<()> {
    if est.width != reference.width || est.height != reference.height {
        return Err(FlowError::DimensionMismatch {
            expected_width: reference.width,
            expected_height: reference.height,
            got_width: est.width,
            got_height: est.height,
        }
        .into());
    }
    Ok(())
}

/// Average angular error in degrees (Barron convention): each flow
/// vector is extended with a unit temporal component before measuring
/// the angle between estimate and reference.
pub fn average_angular_error(est: &VelocityField, reference: &VelocityField) -> Result<f64> {
    check_dims(est, reference)?;
    let n = est.data.len() as f64;
    let sum: f64 = est
        .data
        .par_iter()
        .zip(reference.data.par_iter())
        .map(|(a, b)| {
            let (u1, v1) = (a[0] as f64, a[1] as f64);
            let (u2, v2) = (b[0] as f64, b[1] as f64);
            let cos = (u1 * u2 + v1 * v2 + 1.0)
                / ((u1 * u1 + v1 * v1 + 1.0) * (u2 * u2 + v2 * v2 + 1.0)).sqrt();
            cos.clamp(-1.0, 1.0).acos().to_degrees()
        })
        .sum();
    Ok(sum / n)
}

/// Average endpoint error: mean Euclidean distance between estimated
/// and reference vectors, in pixels/frame.
pub fn average_endpoint_error(est: &VelocityField, reference: &VelocityField) -> Result<f64> {
    check_dims(est, reference)?;
    let n = est.data.len() as f64;
    let sum: f64 = est
        .data
        .par_iter()
        .zip(reference.data.par_iter())
        .map(|(a, b)| {
            let du = (a[0] - b[0]) as f64;
            let dv = (a[1] - b[1]) as f64;
            (du * du + dv * dv).sqrt()
        })
        .sum();
    Ok(sum / n)
}
