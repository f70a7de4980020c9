//! Default configuration constants for vox-timeline.
//!
//! Shared by the configuration layer, the script loader, and the composer so
//! that every entry point agrees on the same fallbacks.

/// Default output sample rate in Hz.
///
/// 24kHz is the native rate of the speech models this engine is usually fed
/// by, so the common case composes without resampling.
pub const SAMPLE_RATE: u32 = 24000;

/// Default number of output channels (mono).
pub const CHANNELS: u16 = 1;

/// Lowest sample rate the compositor will convert to or from.
pub const MIN_SAMPLE_RATE: u32 = 1000;

/// Highest sample rate the compositor will convert to or from.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Speaker used for script lines that do not name one.
pub const DEFAULT_SPEAKER: &str = "Uncle_Fu";

/// Language passed to the synthesis capability for every line of a run.
pub const DEFAULT_LANGUAGE: &str = "Chinese";

/// Latest requested start accepted in a script (24 hours).
pub const MAX_START_SECS: f64 = 86_400.0;

/// Largest composed track, in interleaved samples, the compositor will allocate.
///
/// Eight hours of 48kHz stereo fits; anything larger is almost certainly a
/// script typo.
pub const MAX_TRACK_SAMPLES: u64 = 8 * 3600 * 48_000 * 2;

/// Default minimum silence between a shifted segment and the one before it.
///
/// Zero means "shift by exactly the overlap".
pub const MIN_GAP_MS: u64 = 0;

/// Default number of synthesis calls in flight at once (sequential).
pub const MAX_CONCURRENCY: usize = 1;

/// Largest value accepted for `max_concurrency`.
pub const MAX_CONCURRENCY_LIMIT: usize = 64;

/// Full-scale value used when narrowing normalized floats to 16-bit PCM.
pub const I16_FULL_SCALE: f32 = i16::MAX as f32;
