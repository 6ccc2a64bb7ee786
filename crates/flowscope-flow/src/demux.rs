//! Unpacking of multi-frame pixel samples into per-frame streams.

use flowscope_core::{FlowError, Frame, FrameGroup, Result, GROUP_SIZE};

/// One packed sample per pixel position: five 8-bit intensities, one per
/// input frame, ordered temporally.
pub type PackedSample = [u8; GROUP_SIZE];

/// Splits packed multi-frame samples into five independent frames.
///
/// Pure unpacking, no filtering. Intensities are normalized to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct FrameDemux {
    width: u32,
    height: u32,
}

impl FrameDemux {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Unpack one row-major sample stream into a validated frame group.
    ///
    /// Fails if the sample count does not equal the configured H*W.
    pub fn split(&self, samples: &[PackedSample]) -> Result<FrameGroup> {
        let expected = (self.width * self.height) as usize;
        if samples.len() != expected {
            return Err(FlowError::PixelCount {
                expected,
                got: samples.len(),
            });
        }
        let mut channels: Vec<Vec<f32>> = (0..GROUP_SIZE)
            .map(|_| Vec::with_capacity(expected))
            .collect();
        for sample in samples {
            for (channel, &byte) in channels.iter_mut().zip(sample.iter()) {
                channel.push(byte as f32 / 255.0);
            }
        }
        let frames = channels
            .into_iter()
            .map(|data| Frame::from_vec(data, self.width, self.height))
            .collect::<Result<Vec<_>>>()?;
        FrameGroup::new(frames)
    }
}

/// Pack a frame group back into per-pixel samples, quantizing to 8 bits.
///
/// Inverse of [`FrameDemux::split`] up to quantization; used for
/// synthetic inputs and tests.
pub fn pack_group(group: &FrameGroup) -> Vec<PackedSample> {
    group
        .samples()
        .map(|px| {
            let mut packed = [0u8; GROUP_SIZE];
            for (byte, value) in packed.iter_mut().zip(px.iter()) {
                *byte = (value * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            packed
        })
        .collect()
}
