//! Channel layout and sample format conversion.

use crate::defaults::I16_FULL_SCALE;
use serde::{Deserialize, Serialize};

/// PCM representation of the composed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 16-bit signed integer PCM.
    Int16,
    /// 32-bit IEEE float PCM, normalized to `[-1.0, 1.0]`.
    Float32,
}

impl SampleFormat {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Int16 => 16,
            SampleFormat::Float32 => 32,
        }
    }
}

/// First sample outside `[-1.0, 1.0]` (or non-finite), as `(position, value)`.
pub fn find_out_of_range(samples: &[f32]) -> Option<(usize, f32)> {
    samples
        .iter()
        .position(|s| !s.is_finite() || s.abs() > 1.0)
        .map(|pos| (pos, samples[pos]))
}

/// Convert interleaved frames between mono and stereo.
///
/// Mono to stereo duplicates each frame; stereo to mono averages L and R.
/// Identical layouts are returned unchanged.
pub fn convert_channels(samples: Vec<f32>, from: u16, to: u16) -> Vec<f32> {
    match (from, to) {
        (1, 2) => samples.iter().flat_map(|&s| [s, s]).collect(),
        (2, 1) => samples
            .chunks_exact(2)
            .map(|chunk| (chunk[0] + chunk[1]) * 0.5)
            .collect(),
        _ => samples,
    }
}

/// Narrow a normalized float to 16-bit PCM by rounding to nearest.
///
/// `1.0` maps to `i16::MAX` and `-1.0` to `-i16::MAX`, so in-range input never
/// saturates.
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * I16_FULL_SCALE).round() as i16
}

/// Widen 16-bit PCM back to a normalized float (inverse of [`f32_to_i16`]).
pub fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / I16_FULL_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_per_sample_matches_format() {
        assert_eq!(SampleFormat::Int16.bits_per_sample(), 16);
        assert_eq!(SampleFormat::Float32.bits_per_sample(), 32);
    }

    #[test]
    fn sample_format_deserializes_lowercase() {
        let format: SampleFormat = serde_json::from_str("\"float32\"").unwrap();
        assert_eq!(format, SampleFormat::Float32);
    }

    #[test]
    fn full_scale_maps_without_clipping() {
        assert_eq!(f32_to_i16(1.0), i16::MAX);
        assert_eq!(f32_to_i16(-1.0), -i16::MAX);
        assert_eq!(f32_to_i16(0.0), 0);
    }

    #[test]
    fn narrowing_rounds_to_nearest() {
        // 0.5 * 32767 = 16383.5 rounds away from zero
        assert_eq!(f32_to_i16(0.5), 16384);
        assert_eq!(f32_to_i16(-0.5), -16384);
    }

    #[test]
    fn int_round_trip_is_exact() {
        for value in [-32767i16, -12345, -1, 0, 1, 12345, 32767] {
            assert_eq!(f32_to_i16(i16_to_f32(value)), value);
        }
    }

    #[test]
    fn out_of_range_detected_with_position() {
        assert_eq!(find_out_of_range(&[0.0, 0.5, -1.0, 1.0]), None);
        assert_eq!(find_out_of_range(&[0.0, 1.5, 2.0]), Some((1, 1.5)));
        assert_eq!(find_out_of_range(&[-1.01]), Some((0, -1.01)));
    }

    #[test]
    fn non_finite_sample_is_out_of_range() {
        let found = find_out_of_range(&[0.0, f32::NAN]);
        assert_eq!(found.map(|(pos, _)| pos), Some(1));
        assert!(find_out_of_range(&[f32::INFINITY]).is_some());
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        let stereo = convert_channels(vec![0.1, -0.2], 1, 2);
        assert_eq!(stereo, vec![0.1, 0.1, -0.2, -0.2]);
    }

    #[test]
    fn stereo_to_mono_averages() {
        let mono = convert_channels(vec![0.2, 0.4, -0.5, 0.5], 2, 1);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert_eq!(mono[1], 0.0);
    }

    #[test]
    fn same_layout_is_untouched() {
        let samples = vec![0.25, -0.75];
        assert_eq!(convert_channels(samples.clone(), 1, 1), samples);
        assert_eq!(convert_channels(samples.clone(), 2, 2), samples);
    }
}
