//! Script ingestion.
//!
//! A script is a JSON array of records:
//!
//! ```json
//! [
//!   { "start": 0.0, "text": "Welcome.", "speaker": "Uncle_Fu", "instruct": "cheerful" },
//!   { "start": 3.0, "text": "This is a demo." }
//! ]
//! ```
//!
//! Records are validated into [`ScriptLine`]s before any synthesis happens.

use crate::defaults::MAX_START_SECS;
use crate::error::{Result, VoxError};
use crate::timeline::Ticks;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// One authored line of dialogue.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    requested_start: Ticks,
    text: String,
    speaker: String,
    tone: Option<String>,
}

impl ScriptLine {
    /// Create a line, rejecting negative starts, blank text and blank speakers.
    pub fn new(
        start_secs: f64,
        text: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Result<Self> {
        let text = text.into();
        let speaker = speaker.into();

        let requested_start = start_ticks(start_secs).map_err(|message| VoxError::InvalidScript {
            index: None,
            message,
        })?;
        if text.trim().is_empty() {
            return Err(VoxError::InvalidScript {
                index: None,
                message: "text must not be empty".to_string(),
            });
        }
        if speaker.trim().is_empty() {
            return Err(VoxError::InvalidScript {
                index: None,
                message: "speaker must not be empty".to_string(),
            });
        }

        Ok(Self {
            requested_start,
            text,
            speaker,
            tone: None,
        })
    }

    /// Attach a tone/style hint. Blank hints are dropped.
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        let tone = tone.into();
        self.tone = if tone.trim().is_empty() { None } else { Some(tone) };
        self
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
}

/// Wire shape of a script record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptRecord {
    #[serde(default)]
    start: f64,
    text: Option<String>,
    speaker: Option<String>,
    #[serde(alias = "instruct")]
    tone: Option<String>,
}

fn start_ticks(start_secs: f64) -> std::result::Result<Ticks, String> {
    if start_secs > MAX_START_SECS {
        return Err(format!(
            "start {} is later than the {} s limit",
            start_secs, MAX_START_SECS
        ));
    }
    Ticks::from_secs_f64(start_secs)
        .ok_or_else(|| format!("start must be a non-negative number, got {}", start_secs))
}

impl ScriptRecord {
    fn into_line(self, index: usize, default_speaker: &str) -> Result<ScriptLine> {
        let text = match self.text {
            Some(text) if !text.trim().is_empty() => text,
            Some(_) => return Err(VoxError::invalid_record(index, "text is empty")),
            None => return Err(VoxError::invalid_record(index, "text is missing")),
        };
        if let Err(message) = start_ticks(self.start) {
            return Err(VoxError::invalid_record(index, message));
        }
        let speaker = self
            .speaker
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_speaker.to_string());

        let line = ScriptLine::new(self.start, text, speaker)
            .map_err(|e| VoxError::invalid_record(index, e.to_string()))?;
        Ok(match self.tone {
            Some(tone) => line.with_tone(tone),
            None => line,
        })
    }
}

/// Parse and validate a JSON script.
///
/// Lines without a speaker get `default_speaker`. The whole script is
/// rejected if any record is malformed or the array is empty.
pub fn parse_script(json: &str, default_speaker: &str) -> Result<Vec<ScriptLine>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| VoxError::InvalidScript {
            index: None,
            message: format!("script must be a JSON array of objects: {}", e),
        })?;

    let lines = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: ScriptRecord = serde_json::from_value(value)
                .map_err(|e| VoxError::invalid_record(index, e.to_string()))?;
            record.into_line(index, default_speaker)
        })
        .collect::<Result<Vec<_>>>()?;

    validate_lines(&lines)?;
    Ok(lines)
}

/// Read and validate a JSON script file.
pub fn load_script(path: &Path, default_speaker: &str) -> Result<Vec<ScriptLine>> {
    let contents = std::fs::read_to_string(path)?;
    parse_script(&contents, default_speaker)
}

/// Whole-script checks that apply however the lines were built.
///
/// Out-of-order starts are accepted; they are logged because they usually
/// produce large cascading shifts.
pub fn validate_lines(lines: &[ScriptLine]) -> Result<()> {
    if lines.is_empty() {
        return Err(VoxError::InvalidScript {
            index: None,
            message: "script contains no lines".to_string(),
        });
    }

    for (index, pair) in lines.windows(2).enumerate() {
        if pair[1].requested_start() < pair[0].requested_start() {
            warn!(
                index = index + 1,
                start = %pair[1].requested_start(),
                previous = %pair[0].requested_start(),
                "Line starts before the previous line; it will be placed after it"
            );
        }
    }
    Ok(())
}
