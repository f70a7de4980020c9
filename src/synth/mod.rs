//! Speech synthesis capability consumed by the composer.

pub mod synthesizer;

pub use synthesizer::{MockSynthesizer, SynthesisRequest, Synthesizer};
