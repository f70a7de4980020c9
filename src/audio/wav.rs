//! WAV encoding and decoding of [`AudioBuffer`]s.

use crate::audio::buffer::AudioBuffer;
use crate::error::{Result, VoxError};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Write a buffer as 32-bit float WAV at its native rate and layout.
///
/// Float output keeps the samples bit-identical to what synthesis produced.
pub fn write_f32_wav<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut wav_writer = hound::WavWriter::new(writer, spec)?;
    for &sample in buffer.samples() {
        wav_writer.write_sample(sample)?;
    }
    wav_writer.finalize()?;
    Ok(())
}

/// Write a buffer to a float WAV file.
///
/// The data goes to a `.part` sibling first and is renamed into place, so a
/// failed write never leaves a truncated file at `path`.
pub fn save_f32_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let written = std::fs::File::create(&partial)
        .map_err(VoxError::from)
        .and_then(|file| write_f32_wav(std::io::BufWriter::new(file), buffer))
        .and_then(|()| std::fs::rename(&partial, path).map_err(VoxError::from));
    if written.is_err()
        && partial.exists()
        && let Err(e) = std::fs::remove_file(&partial)
    {
        warn!(path = %partial.display(), error = %e, "Failed to remove partial WAV");
    }
    written
}

/// Decode WAV data into a normalized float buffer.
///
/// Accepts integer PCM up to 32 bits and 32-bit float. Integer samples are
/// scaled by their format's positive full-scale value and clamped to
/// `[-1.0, 1.0]`, so the most negative code decodes to exactly -1.0.
pub fn read_wav<R: Read>(reader: R) -> Result<AudioBuffer> {
    let mut wav_reader = hound::WavReader::new(reader)?;
    let spec = wav_reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => wav_reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(VoxError::Wav(hound::Error::Unsupported));
            }
            let full_scale = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            wav_reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32 / full_scale).clamp(-1.0, 1.0)))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    AudioBuffer::new(samples, spec.sample_rate, spec.channels)
}

/// Decode a WAV file.
pub fn load_wav(path: &Path) -> Result<AudioBuffer> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_wav(file)
}
