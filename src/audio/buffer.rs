//! Interleaved floating-point audio buffer.

use crate::error::{Result, VoxError};

/// Rendered audio as produced by a synthesis call.
///
/// Samples are interleaved, normalized to `[-1.0, 1.0]`, and carry their own
/// sample rate and channel count. Only mono and stereo are supported.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Creates a buffer, rejecting layouts the compositor cannot place.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(VoxError::Synthesis {
                message: "sample rate must be positive".to_string(),
            });
        }
        if channels != 1 && channels != 2 {
            return Err(VoxError::Synthesis {
                message: format!("unsupported channel count: {}", channels),
            });
        }
        if samples.len() % channels as usize != 0 {
            return Err(VoxError::Synthesis {
                message: format!(
                    "{} samples do not divide into {} channels",
                    samples.len(),
                    channels
                ),
            });
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Creates a mono buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, sample_rate, 1)
    }

    /// Creates a stereo buffer from interleaved L/R samples.
    pub fn stereo(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, sample_rate, 2)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }
}
