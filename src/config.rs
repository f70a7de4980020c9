use crate::audio::SampleFormat;
use crate::compose::{ComposerConfig, TrackSpec};
use crate::defaults;
use crate::error::{Result, VoxError};
use crate::timeline::{SchedulePolicy, Ticks};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub schedule: ScheduleConfig,
    pub synthesis: SynthesisConfig,
    pub debug: DebugConfig,
}

/// Composed track format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
    /// Pad the track with silence up to this many seconds (e.g. the video length).
    pub min_duration_secs: Option<f64>,
}

/// Placement scheduling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Silence kept after the previous segment when a line has to be shifted.
    pub min_gap_ms: u64,
}

/// Synthesis requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub default_speaker: String,
    pub language: String,
    pub max_concurrency: usize,
}

/// Per-segment debug dumps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            channels: defaults::CHANNELS,
            format: SampleFormat::Int16,
            min_duration_secs: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_gap_ms: defaults::MIN_GAP_MS,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_speaker: defaults::DEFAULT_SPEAKER.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            max_concurrency: defaults::MAX_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(VoxError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOX_TIMELINE_SAMPLE_RATE → output.sample_rate
    /// - VOX_TIMELINE_SPEAKER → synthesis.default_speaker
    /// - VOX_TIMELINE_LANGUAGE → synthesis.language
    /// - VOX_TIMELINE_DEBUG_DIR → debug.dir
    ///
    /// Empty values are ignored; an unparsable sample rate is an error.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(rate) = std::env::var("VOX_TIMELINE_SAMPLE_RATE")
            && !rate.is_empty()
        {
            self.output.sample_rate =
                rate.parse().map_err(|_| VoxError::ConfigInvalidValue {
                    key: "VOX_TIMELINE_SAMPLE_RATE".to_string(),
                    message: format!("not a sample rate: {}", rate),
                })?;
        }

        if let Ok(speaker) = std::env::var("VOX_TIMELINE_SPEAKER")
            && !speaker.is_empty()
        {
            self.synthesis.default_speaker = speaker;
        }

        if let Ok(language) = std::env::var("VOX_TIMELINE_LANGUAGE")
            && !language.is_empty()
        {
            self.synthesis.language = language;
        }

        if let Ok(dir) = std::env::var("VOX_TIMELINE_DEBUG_DIR")
            && !dir.is_empty()
        {
            self.debug.dir = Some(PathBuf::from(dir));
        }

        Ok(self)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: String| VoxError::ConfigInvalidValue {
            key: key.to_string(),
            message,
        };

        let rates = defaults::MIN_SAMPLE_RATE..=defaults::MAX_SAMPLE_RATE;
        if !rates.contains(&self.output.sample_rate) {
            return Err(invalid(
                "output.sample_rate",
                format!(
                    "must be between {} and {} Hz, got {}",
                    defaults::MIN_SAMPLE_RATE,
                    defaults::MAX_SAMPLE_RATE,
                    self.output.sample_rate
                ),
            ));
        }
        if self.output.channels != 1 && self.output.channels != 2 {
            return Err(invalid(
                "output.channels",
                format!("must be 1 or 2, got {}", self.output.channels),
            ));
        }
        if let Some(secs) = self.output.min_duration_secs
            && Ticks::from_secs_f64(secs).is_none()
        {
            return Err(invalid(
                "output.min_duration_secs",
                format!("must be a non-negative number, got {}", secs),
            ));
        }
        if self.synthesis.default_speaker.trim().is_empty() {
            return Err(invalid(
                "synthesis.default_speaker",
                "must not be empty".to_string(),
            ));
        }
        if self.synthesis.max_concurrency == 0
            || self.synthesis.max_concurrency > defaults::MAX_CONCURRENCY_LIMIT
        {
            return Err(invalid(
                "synthesis.max_concurrency",
                format!(
                    "must be between 1 and {}, got {}",
                    defaults::MAX_CONCURRENCY_LIMIT,
                    self.synthesis.max_concurrency
                ),
            ));
        }
        Ok(())
    }

    /// Validate and turn into composer settings.
    pub fn composer_config(&self) -> Result<ComposerConfig> {
        self.validate()?;
        Ok(ComposerConfig {
            track: TrackSpec {
                sample_rate: self.output.sample_rate,
                channels: self.output.channels,
                format: self.output.format,
            },
            policy: SchedulePolicy::with_min_gap(Ticks::from_millis(self.schedule.min_gap_ms)),
            language: self.synthesis.language.clone(),
            default_speaker: self.synthesis.default_speaker.clone(),
            max_concurrency: self.synthesis.max_concurrency,
            min_duration: self.output.min_duration_secs.and_then(Ticks::from_secs_f64),
            debug_dir: self.debug.dir.clone(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vox-timeline/config.toml on Linux, or `None` when the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vox-timeline").join("config.toml"))
    }
}
