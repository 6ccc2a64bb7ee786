//! Middlebury `.flo` flow-field reading and writing.
//!
//! Layout: a float tag (202021.25, the bytes "PIEH"), i32 width, i32
//! height, then width*height little-endian (vx, vy) f32 pairs in
//! row-major order.

use crate::error::{IoError, Result};
use flowscope_core::VelocityField;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Sanity tag at the head of every flow file ("PIEH" as a float).
pub const FLO_TAG: f32 = 202021.25;

/// Read a flow field from a `.flo` file.
pub fn read_flo(path: &Path) -> Result<VelocityField> {
    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
    let field = parse_flo(&bytes)?;
    debug!(path = %path.display(), width = field.width, height = field.height, "read flow field");
    Ok(field)
}

/// Write a flow field as a `.flo` file.
pub fn write_flo(path: &Path, field: &VelocityField) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&FLO_TAG.to_le_bytes())?;
    out.write_all(&(field.width as i32).to_le_bytes())?;
    out.write_all(&(field.height as i32).to_le_bytes())?;
    for [vx, vy] in &field.data {
        out.write_all(&vx.to_le_bytes())?;
        out.write_all(&vy.to_le_bytes())?;
    }
    Ok(())
}

/// Parse a flow field from raw `.flo` bytes.
pub fn parse_flo(bytes: &[u8]) -> Result<VelocityField> {
    if bytes.len() < 12 {
        return Err(IoError::InvalidFlo("truncated header".into()));
    }
    let tag = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
    if tag != FLO_TAG {
        return Err(IoError::InvalidFlo(format!("bad tag {tag}")));
    }
    let width = i32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let height = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
    if width <= 0 || height <= 0 {
        return Err(IoError::InvalidFlo(format!(
            "degenerate dimensions {width}x{height}"
        )));
    }
    let count = width as usize * height as usize;
    let expected = 12 + count * 8;
    if bytes.len() != expected {
        return Err(IoError::InvalidFlo(format!(
            "expected {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let mut data = Vec::with_capacity(count);
    for chunk in bytes[12..].chunks_exact(8) {
        let vx = f32::from_le_bytes(chunk[0..4].try_into().unwrap());
        let vy = f32::from_le_bytes(chunk[4..8].try_into().unwrap());
        data.push([vx, vy]);
    }
    Ok(VelocityField {
        width: width as u32,
        height: height as u32,
        data,
    })
}
