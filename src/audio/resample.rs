//! Linear interpolation resampling.
//!
//! The output length is chosen by the caller. The compositor asks for exactly
//! the number of output frames a segment covers on the track grid, so the
//! resampler never decides where a segment ends.

/// Resample interleaved frames from `from_rate` to `to_rate`, producing
/// exactly `out_frames` frames.
///
/// Output frame `j` reads source position `j * from_rate / to_rate`, which is
/// computed from an integer numerator so long segments do not drift. Positions
/// past the last source frame hold the last frame.
pub fn resample_frames(
    samples: &[f32],
    channels: usize,
    from_rate: u32,
    to_rate: u32,
    out_frames: usize,
) -> Vec<f32> {
    let in_frames = if channels == 0 {
        0
    } else {
        samples.len() / channels
    };
    if in_frames == 0 || out_frames == 0 {
        return vec![0.0; out_frames * channels];
    }

    if from_rate == to_rate {
        let mut out = Vec::with_capacity(out_frames * channels);
        let copied = out_frames.min(in_frames) * channels;
        out.extend_from_slice(&samples[..copied]);
        hold_last_frame(&mut out, samples, channels, out_frames);
        return out;
    }

    let from = from_rate as u64;
    let to = to_rate as u64;
    let mut out = Vec::with_capacity(out_frames * channels);

    for j in 0..out_frames as u64 {
        let numerator = j * from;
        let source_idx = (numerator / to) as usize;
        let fraction = (numerator % to) as f32 / to as f32;

        if source_idx + 1 >= in_frames {
            let last = (in_frames - 1).min(source_idx) * channels;
            out.extend_from_slice(&samples[last..last + channels]);
            continue;
        }

        let left = source_idx * channels;
        let right = left + channels;
        for ch in 0..channels {
            let a = samples[left + ch];
            let b = samples[right + ch];
            out.push(a + (b - a) * fraction);
        }
    }

    out
}

fn hold_last_frame(out: &mut Vec<f32>, samples: &[f32], channels: usize, out_frames: usize) {
    let last = samples.len() - channels;
    while out.len() < out_frames * channels {
        out.extend_from_slice(&samples[last..last + channels]);
    }
}
