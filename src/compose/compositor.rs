//! Audio compositor.
//!
//! Renders a [`Timeline`] into one silence-initialized buffer. Each placement
//! covers the output frames from `ceil(start × rate)` up to
//! `ceil(end × rate)`; the scheduler guarantees these ranges are disjoint, so
//! segments are written directly and never summed.

use crate::audio::convert::{convert_channels, f32_to_i16, find_out_of_range};
use crate::audio::resample::resample_frames;
use crate::audio::{AudioBuffer, SampleFormat};
use crate::compose::track::{ComposedTrack, TrackSamples, TrackSpec};
use crate::defaults::{MAX_SAMPLE_RATE, MAX_TRACK_SAMPLES, MIN_SAMPLE_RATE};
use crate::error::{Result, VoxError};
use crate::timeline::{Segment, Ticks, Timeline};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Compositor {
    spec: TrackSpec,
    min_duration: Ticks,
}

impl Compositor {
    /// Create a compositor for the given output format.
    pub fn new(spec: TrackSpec) -> Result<Self> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&spec.sample_rate) {
            return Err(VoxError::ConfigInvalidValue {
                key: "output.sample_rate".to_string(),
                message: format!(
                    "{} Hz is outside the supported range {}..={} Hz",
                    spec.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
                ),
            });
        }
        if spec.channels != 1 && spec.channels != 2 {
            return Err(VoxError::ConfigInvalidValue {
                key: "output.channels".to_string(),
                message: format!("must be 1 or 2, got {}", spec.channels),
            });
        }
        Ok(Self {
            spec,
            min_duration: Ticks::ZERO,
        })
    }

    /// Pad the track with trailing silence up to `duration` (e.g. a video's
    /// length). Longer timelines are never truncated.
    pub fn with_min_duration(mut self, duration: Ticks) -> Self {
        self.min_duration = duration;
        self
    }

    pub fn spec(&self) -> TrackSpec {
        self.spec
    }

    /// Render the timeline.
    ///
    /// Every segment is validated before anything is written, so a rejected
    /// timeline never yields a partial track.
    pub fn compose(&self, timeline: &Timeline) -> Result<ComposedTrack> {
        for placement in timeline.placements() {
            self.validate(placement.segment())?;
        }

        let rate = self.spec.sample_rate;
        let channels = self.spec.channels as usize;
        let total = timeline.total_duration().max(self.min_duration);
        let total_frames = total.to_frame_ceil(rate);
        let total_samples = total_frames.saturating_mul(channels as u64);
        let too_large = || VoxError::TrackTooLarge {
            samples: total_samples,
            limit: MAX_TRACK_SAMPLES,
        };
        if total_samples > MAX_TRACK_SAMPLES {
            return Err(too_large());
        }
        let len = usize::try_from(total_samples).map_err(|_| too_large())?;
        let mut samples = TrackSamples::silence(self.spec.format, len).ok_or_else(too_large)?;

        debug!(
            segments = timeline.len(),
            frames = total_frames,
            sample_rate = rate,
            "Composing track"
        );

        for placement in timeline.placements() {
            let start = placement.actual_start().to_frame_ceil(rate) as usize;
            let end = placement.end().to_frame_ceil(rate) as usize;
            let footprint = end - start;
            if footprint == 0 {
                continue;
            }

            let rendered = self.render(placement.segment().audio(), footprint);
            write_at(&mut samples, start * channels, &rendered);
        }

        Ok(ComposedTrack::new(self.spec, samples))
    }

    fn validate(&self, segment: &Segment) -> Result<()> {
        let audio = segment.audio();
        let source_rate = audio.sample_rate();
        if source_rate != self.spec.sample_rate
            && !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&source_rate)
        {
            return Err(VoxError::FormatConversion {
                index: segment.index(),
                message: format!(
                    "unsupported sample rate conversion {} Hz -> {} Hz",
                    source_rate, self.spec.sample_rate
                ),
            });
        }
        if let Some((position, value)) = find_out_of_range(audio.samples()) {
            return Err(VoxError::FormatConversion {
                index: segment.index(),
                message: format!("sample {} out of range: {}", position, value),
            });
        }
        Ok(())
    }

    /// Convert a segment's audio to the track layout and rate, producing
    /// exactly `frames` frames.
    fn render(&self, audio: &AudioBuffer, frames: usize) -> Vec<f32> {
        let converted = convert_channels(
            audio.samples().to_vec(),
            audio.channels(),
            self.spec.channels,
        );
        resample_frames(
            &converted,
            self.spec.channels as usize,
            audio.sample_rate(),
            self.spec.sample_rate,
            frames,
        )
    }
}

fn write_at(track: &mut TrackSamples, offset: usize, rendered: &[f32]) {
    match track {
        TrackSamples::Int16(out) => {
            for (dst, &src) in out[offset..offset + rendered.len()].iter_mut().zip(rendered) {
                *dst = f32_to_i16(src);
            }
        }
        TrackSamples::Float32(out) => {
            out[offset..offset + rendered.len()].copy_from_slice(rendered);
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            spec: TrackSpec {
                sample_rate: crate::defaults::SAMPLE_RATE,
                channels: crate::defaults::CHANNELS,
                format: SampleFormat::Int16,
            },
            min_duration: Ticks::ZERO,
        }
    }
}
