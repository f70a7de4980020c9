use crate::audio::AudioBuffer;
use crate::script::ScriptLine;
use crate::timeline::time::Ticks;

/// A script line after synthesis: its rendered audio plus the metadata the
/// scheduler and debug tooling need.
///
/// Immutable once created. Scheduling attaches a start time alongside the
/// segment rather than writing into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    index: usize,
    requested_start: Ticks,
    text: String,
    speaker: String,
    tone: Option<String>,
    audio: AudioBuffer,
    duration: Ticks,
}

impl Segment {
    /// Wrap synthesized audio for the script line at position `index`.
    pub fn new(index: usize, line: &ScriptLine, audio: AudioBuffer) -> Self {
        let duration = Ticks::from_frames(audio.frames() as u64, audio.sample_rate());
        Self {
            index,
            requested_start: line.requested_start(),
            text: line.text().to_string(),
            speaker: line.speaker().to_string(),
            tone: line.tone().map(str::to_string),
            audio,
            duration,
        }
    }

    /// Position of the originating line in the script.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn requested_start(&self) -> Ticks {
        self.requested_start
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn tone(&self) -> Option<&str> {
        self.tone.as_deref()
    }

    pub fn audio(&self) -> &AudioBuffer {
        &self.audio
    }

    /// Exact duration derived from the frame count.
    pub fn duration(&self) -> Ticks {
        self.duration
    }
}
