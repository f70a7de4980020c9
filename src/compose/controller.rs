//! Composition controller.
//!
//! Drives one run: synthesize every script line, schedule the resulting
//! segments, render the track, then optionally dump per-segment debug files.
//! Any synthesis or conversion failure aborts the run with no track.

use crate::audio::SampleFormat;
use crate::compose::compositor::Compositor;
use crate::compose::debug_export::{DebugExportReport, DebugExporter};
use crate::compose::report::{ErrorReporter, LogReporter};
use crate::compose::track::{ComposedTrack, TrackSpec};
use crate::defaults;
use crate::error::{Result, VoxError};
use crate::script::{ScriptLine, load_script, validate_lines};
use crate::synth::{SynthesisRequest, Synthesizer};
use crate::timeline::{SchedulePolicy, Segment, Ticks, Timeline, schedule};
use futures_util::{StreamExt, TryStreamExt, stream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Settings for one [`Composer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerConfig {
    pub track: TrackSpec,
    pub policy: SchedulePolicy,
    /// Language sent with every synthesis request.
    pub language: String,
    /// Speaker for script lines that do not name one.
    pub default_speaker: String,
    /// Upper bound on synthesis calls in flight. 1 means sequential.
    pub max_concurrency: usize,
    /// Pad the composed track with silence up to this length.
    pub min_duration: Option<Ticks>,
    /// Directory for per-segment debug WAVs. `None` disables the dump.
    pub debug_dir: Option<PathBuf>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            track: TrackSpec {
                sample_rate: defaults::SAMPLE_RATE,
                channels: defaults::CHANNELS,
                format: SampleFormat::Int16,
            },
            policy: SchedulePolicy::default(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            default_speaker: defaults::DEFAULT_SPEAKER.to_string(),
            max_concurrency: defaults::MAX_CONCURRENCY,
            min_duration: None,
            debug_dir: None,
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Composition {
    pub track: ComposedTrack,
    pub timeline: Timeline,
    /// Present only when a debug directory was configured.
    pub debug: Option<DebugExportReport>,
}

pub struct Composer {
    synthesizer: Arc<dyn Synthesizer>,
    config: ComposerConfig,
    compositor: Compositor,
    reporter: Arc<dyn ErrorReporter>,
}

impl Composer {
    /// Create a composer around an already initialized synthesis handle.
    pub fn new(synthesizer: Arc<dyn Synthesizer>, config: ComposerConfig) -> Result<Self> {
        if config.max_concurrency == 0 || config.max_concurrency > defaults::MAX_CONCURRENCY_LIMIT {
            return Err(VoxError::ConfigInvalidValue {
                key: "synthesis.max_concurrency".to_string(),
                message: format!(
                    "must be between 1 and {}, got {}",
                    defaults::MAX_CONCURRENCY_LIMIT,
                    config.max_concurrency
                ),
            });
        }

        let mut compositor = Compositor::new(config.track)?;
        if let Some(min_duration) = config.min_duration {
            compositor = compositor.with_min_duration(min_duration);
        }

        Ok(Self {
            synthesizer,
            config,
            compositor,
            reporter: Arc::new(LogReporter),
        })
    }

    /// Route non-fatal errors (debug export) somewhere other than the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose `lines` into one track.
    ///
    /// Cancelling `cancel` before synthesis finishes drops the in-flight calls
    /// and returns [`VoxError::Cancelled`].
    pub async fn compose(
        &self,
        lines: &[ScriptLine],
        cancel: &CancellationToken,
    ) -> Result<Composition> {
        validate_lines(lines)?;
        info!(
            lines = lines.len(),
            model = self.synthesizer.model_name(),
            language = %self.config.language,
            max_concurrency = self.config.max_concurrency,
            "Starting composition"
        );

        let segments = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(VoxError::Cancelled),
            segments = self.synthesize_all(lines) => segments?,
        };

        let timeline = schedule(segments, &self.config.policy);
        let track = self.compositor.compose(&timeline)?;
        info!(
            duration = %track.duration(),
            shifted = timeline.shifted_count(),
            "Composed track"
        );

        let debug = self
            .config
            .debug_dir
            .as_ref()
            .map(|dir| DebugExporter::new(dir).export(&timeline, self.reporter.as_ref()));

        Ok(Composition {
            track,
            timeline,
            debug,
        })
    }

    /// Load a JSON script from `path` and compose it.
    pub async fn compose_script_file(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Composition> {
        let lines = load_script(path, &self.config.default_speaker)?;
        self.compose(&lines, cancel).await
    }

    /// Synthesize every line, at most `max_concurrency` at a time, returning
    /// segments in script order regardless of completion order.
    async fn synthesize_all(&self, lines: &[ScriptLine]) -> Result<Vec<Segment>> {
        let total = lines.len();
        stream::iter(lines.iter().enumerate())
            .map(|(index, line)| self.synthesize_line(index, total, line))
            .buffered(self.config.max_concurrency)
            .try_collect()
            .await
    }

    async fn synthesize_line(
        &self,
        index: usize,
        total: usize,
        line: &ScriptLine,
    ) -> Result<Segment> {
        info!(
            line = index + 1,
            total,
            start = %line.requested_start(),
            speaker = line.speaker(),
            "Generating segment"
        );
        let request = SynthesisRequest::from_line(line, &self.config.language);
        let failure = |message: String| VoxError::SynthesisFailure {
            index,
            text: line.text().to_string(),
            message,
        };

        let audio = self
            .synthesizer
            .synthesize(&request)
            .await
            .map_err(|e| failure(e.to_string()))?;
        if audio.samples().iter().any(|s| !s.is_finite()) {
            return Err(failure("synthesis returned non-finite samples".to_string()));
        }

        let segment = Segment::new(index, line, audio);
        debug!(line = index + 1, duration = %segment.duration(), "Segment rendered");
        Ok(segment)
    }
}
