use crate::audio::AudioBuffer;
use crate::error::{Result, VoxError};
use crate::script::ScriptLine;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Everything a synthesis call needs for one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub speaker: String,
    pub tone: Option<String>,
    pub language: String,
}

impl SynthesisRequest {
    pub fn from_line(line: &ScriptLine, language: &str) -> Self {
        Self {
            text: line.text().to_string(),
            speaker: line.speaker().to_string(),
            tone: line.tone().map(str::to_string),
            language: language.to_string(),
        }
    }
}

/// Trait for text-to-speech synthesis.
///
/// The composer only sees this handle; model loading and teardown belong to
/// whoever constructs the implementation. Calls may be issued concurrently.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render one line of speech.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBuffer>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;
}

/// Implement Synthesizer for Arc<T> to allow sharing across runs.
#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBuffer> {
        (**self).synthesize(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock synthesizer for testing.
///
/// Renders a constant-amplitude mono tone whose length is chosen per text
/// (or derived from the text length), so tests can predict exact placements.
#[derive(Debug)]
pub struct MockSynthesizer {
    model_name: String,
    sample_rate: u32,
    channels: u16,
    amplitude: f32,
    secs_per_char: f64,
    durations: HashMap<String, f64>,
    delays: HashMap<String, Duration>,
    failures: Vec<String>,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer producing audio at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            model_name: "mock-tts".to_string(),
            sample_rate,
            channels: 1,
            amplitude: 0.5,
            secs_per_char: 0.1,
            durations: HashMap::new(),
            delays: HashMap::new(),
            failures: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Render `text` with exactly `secs` of audio.
    pub fn with_duration(mut self, text: &str, secs: f64) -> Self {
        self.durations.insert(text.to_string(), secs);
        self
    }

    /// Delay the response for `text`, to shuffle completion order.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Fail whenever asked to render `text`.
    pub fn with_failure_on(mut self, text: &str) -> Self {
        self.failures.push(text.to_string());
        self
    }

    /// Sample value written into every rendered frame.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Render interleaved stereo instead of mono.
    pub fn with_stereo(mut self) -> Self {
        self.channels = 2;
        self
    }

    /// Number of synthesis calls started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&request.text) {
            tokio::time::sleep(*delay).await;
        }

        if self.failures.contains(&request.text) {
            return Err(VoxError::Synthesis {
                message: "mock synthesis failure".to_string(),
            });
        }

        let secs = self
            .durations
            .get(&request.text)
            .copied()
            .unwrap_or_else(|| request.text.chars().count() as f64 * self.secs_per_char);
        let frames = (secs * self.sample_rate as f64).round() as usize;
        let samples = vec![self.amplitude; frames * self.channels as usize];

        AudioBuffer::new(samples, self.sample_rate, self.channels)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            speaker: "Uncle_Fu".to_string(),
            tone: None,
            language: "Chinese".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_uses_configured_duration() {
        let synth = MockSynthesizer::new(24000).with_duration("hello", 1.5);
        let audio = synth.synthesize(&request("hello")).await.unwrap();

        assert_eq!(audio.frames(), 36000);
        assert_eq!(audio.sample_rate(), 24000);
        assert!(audio.samples().iter().all(|&s| s == 0.5));
    }

    #[tokio::test]
    async fn test_mock_derives_duration_from_text_length() {
        let synth = MockSynthesizer::new(1000);
        let audio = synth.synthesize(&request("abcd")).await.unwrap();

        assert_eq!(audio.frames(), 400);
    }

    #[tokio::test]
    async fn test_mock_returns_error_when_configured() {
        let synth = MockSynthesizer::new(24000).with_failure_on("boom");
        let result = synth.synthesize(&request("boom")).await;

        match result {
            Err(VoxError::Synthesis { message }) => {
                assert_eq!(message, "mock synthesis failure");
            }
            _ => panic!("Expected Synthesis error"),
        }
        assert_eq!(synth.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_stereo_output() {
        let synth = MockSynthesizer::new(8000)
            .with_stereo()
            .with_duration("x", 0.5);
        let audio = synth.synthesize(&request("x")).await.unwrap();

        assert_eq!(audio.channels(), 2);
        assert_eq!(audio.frames(), 4000);
    }

    #[tokio::test]
    async fn test_synthesizer_trait_is_object_safe() {
        let synth: Arc<dyn Synthesizer> =
            Arc::new(MockSynthesizer::new(16000).with_duration("boxed", 0.25));

        assert_eq!(synth.model_name(), "mock-tts");
        let audio = synth.synthesize(&request("boxed")).await.unwrap();
        assert_eq!(audio.frames(), 4000);
    }

    #[test]
    fn test_request_from_line_copies_fields() {
        let line = ScriptLine::new(1.0, "text", "Vivian")
            .unwrap()
            .with_tone("whisper");
        let req = SynthesisRequest::from_line(&line, "English");

        assert_eq!(req.text, "text");
        assert_eq!(req.speaker, "Vivian");
        assert_eq!(req.tone.as_deref(), Some("whisper"));
        assert_eq!(req.language, "English");
    }
}
