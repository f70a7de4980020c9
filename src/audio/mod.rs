//! Audio buffers and the sample-level conversions the compositor relies on.

pub mod buffer;
pub mod convert;
pub mod resample;
pub mod wav;

pub use buffer::AudioBuffer;
pub use convert::SampleFormat;
