//! The composed output track and its PCM export.

use crate::audio::SampleFormat;
use crate::audio::convert::i16_to_f32;
use crate::error::Result;
use crate::timeline::Ticks;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Output format of a composed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

impl TrackSpec {
    fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.format.bits_per_sample(),
            sample_format: match self.format {
                SampleFormat::Int16 => hound::SampleFormat::Int,
                SampleFormat::Float32 => hound::SampleFormat::Float,
            },
        }
    }
}

/// Interleaved samples in the track's bit format.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSamples {
    Int16(Vec<i16>),
    Float32(Vec<f32>),
}

impl TrackSamples {
    /// Silence of `len` samples, or `None` if the allocation is refused.
    pub(crate) fn silence(format: SampleFormat, len: usize) -> Option<Self> {
        match format {
            SampleFormat::Int16 => zeroed(len).map(TrackSamples::Int16),
            SampleFormat::Float32 => zeroed(len).map(TrackSamples::Float32),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TrackSamples::Int16(s) => s.len(),
            TrackSamples::Float32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn zeroed<T: Default + Clone>(len: usize) -> Option<Vec<T>> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(len).ok()?;
    samples.resize(len, T::default());
    Some(samples)
}

/// A finished track: silence everywhere except where segments were placed.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedTrack {
    spec: TrackSpec,
    samples: TrackSamples,
}

impl ComposedTrack {
    pub(crate) fn new(spec: TrackSpec, samples: TrackSamples) -> Self {
        Self { spec, samples }
    }

    pub fn spec(&self) -> TrackSpec {
        self.spec
    }

    pub fn samples(&self) -> &TrackSamples {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    pub fn duration(&self) -> Ticks {
        Ticks::from_frames(self.frames() as u64, self.spec.sample_rate)
    }

    /// Samples widened to normalized floats, whatever the stored format.
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.samples {
            TrackSamples::Int16(s) => s.iter().map(|&v| i16_to_f32(v)).collect(),
            TrackSamples::Float32(s) => s.clone(),
        }
    }

    /// Encode as a PCM WAV stream.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut wav_writer = hound::WavWriter::new(writer, self.spec.wav_spec())?;
        match &self.samples {
            TrackSamples::Int16(samples) => {
                for &s in samples {
                    wav_writer.write_sample(s)?;
                }
            }
            TrackSamples::Float32(samples) => {
                for &s in samples {
                    wav_writer.write_sample(s)?;
                }
            }
        }
        wav_writer.finalize()?;
        Ok(())
    }

    /// Encode as an in-memory WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a WAV file at `path`.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_to(file)
    }
}
