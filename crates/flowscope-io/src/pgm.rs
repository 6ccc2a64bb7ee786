//! PGM (portable graymap) frame reading and writing.
//!
//! Supports 8-bit binary (P5) and ASCII (P2) images, the formats used
//! for grayscale input frames. Intensities are normalized to [0, 1] on
//! read and quantized back on write.

use crate::error::{IoError, Result};
use flowscope_core::Frame;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Read a PGM frame from a file.
pub fn read_pgm(path: &Path) -> Result<Frame> {
    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
    let frame = parse_pgm(&bytes)?;
    debug!(path = %path.display(), width = frame.width, height = frame.height, "read PGM frame");
    Ok(frame)
}

/// Write a frame as binary (P5) PGM.
pub fn write_pgm(path: &Path, frame: &Frame) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P5\n{} {}\n255\n", frame.width, frame.height)?;
    let bytes: Vec<u8> = frame
        .data
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    out.write_all(&bytes)?;
    Ok(())
}

/// Parse a PGM image from raw bytes.
pub fn parse_pgm(bytes: &[u8]) -> Result<Frame> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let magic = cursor.token()?;
    let binary = match magic.as_str() {
        "P5" => true,
        "P2" => false,
        other => return Err(IoError::InvalidPgm(format!("unsupported magic {other:?}"))),
    };
    let width: u32 = cursor.number()?;
    let height: u32 = cursor.number()?;
    let maxval: u32 = cursor.number()?;
    if width == 0 || height == 0 {
        return Err(IoError::InvalidPgm(format!(
            "degenerate dimensions {width}x{height}"
        )));
    }
    if maxval == 0 || maxval > 255 {
        return Err(IoError::InvalidPgm(format!(
            "unsupported maxval {maxval} (only 8-bit supported)"
        )));
    }

    let count = (width * height) as usize;
    let mut data = Vec::with_capacity(count);
    if binary {
        // single whitespace byte separates the header from the payload
        cursor.pos += 1;
        let payload = cursor
            .bytes
            .get(cursor.pos..cursor.pos + count)
            .ok_or_else(|| IoError::InvalidPgm("truncated pixel data".into()))?;
        data.extend(payload.iter().map(|&b| b as f32 / maxval as f32));
    } else {
        for _ in 0..count {
            let v: u32 = cursor.number()?;
            if v > maxval {
                return Err(IoError::InvalidPgm(format!(
                    "sample {v} exceeds maxval {maxval}"
                )));
            }
            data.push(v as f32 / maxval as f32);
        }
    }
    Ok(Frame::from_vec(data, width, height)?)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    /// Next whitespace-delimited token, skipping `#` comment lines.
    fn token(&mut self) -> Result<String> {
        loop {
            while self
                .bytes
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_whitespace())
            {
                self.pos += 1;
            }
            if self.bytes.get(self.pos) == Some(&b'#') {
                while self.bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidPgm("unexpected end of header".into()));
        }
        String::from_utf8(self.bytes[start..self.pos].to_vec())
            .map_err(|_| IoError::InvalidPgm("non-ASCII header".into()))
    }

    fn number(&mut self) -> Result<u32> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| IoError::InvalidPgm(format!("expected number, got {token:?}")))
    }
}
