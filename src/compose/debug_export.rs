//! Per-segment debug dumps.
//!
//! Runs after composition and only reads the timeline. Every write failure is
//! reported and collected; none of them stop the remaining exports.

use crate::audio::wav::save_f32_wav;
use crate::compose::report::ErrorReporter;
use crate::error::{Result, VoxError};
use crate::timeline::{Placement, Timeline};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of one export pass.
#[derive(Debug, Default)]
pub struct DebugExportReport {
    /// Files written, in timeline order.
    pub written: Vec<PathBuf>,
    /// Errors for segments that could not be written.
    pub failures: Vec<VoxError>,
}

impl DebugExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes each placed segment's untouched audio to its own WAV file.
#[derive(Debug, Clone)]
pub struct DebugExporter {
    dir: PathBuf,
}

impl DebugExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name for a placement: `seg_{index:03}_{actual_start:.3}s.wav`.
    pub fn file_name(placement: &Placement) -> String {
        format!(
            "seg_{:03}_{:.3}s.wav",
            placement.segment().index(),
            placement.actual_start().as_secs_f64()
        )
    }

    /// Export every segment of `timeline`.
    ///
    /// Failures go to `reporter` and into the returned report.
    pub fn export(&self, timeline: &Timeline, reporter: &dyn ErrorReporter) -> DebugExportReport {
        let mut report = DebugExportReport::default();

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            let error = VoxError::DebugExport {
                path: self.dir.clone(),
                message: e.to_string(),
            };
            reporter.report("debug-export", &error);
            report.failures.push(error);
            return report;
        }
        info!(dir = %self.dir.display(), segments = timeline.len(), "Saving debug segments");

        for placement in timeline.placements() {
            let path = self.dir.join(Self::file_name(placement));
            match self.export_one(&path, placement) {
                Ok(()) => {
                    debug!(path = %path.display(), "Saved debug segment");
                    report.written.push(path);
                }
                Err(error) => {
                    reporter.report("debug-export", &error);
                    report.failures.push(error);
                }
            }
        }

        report
    }

    fn export_one(&self, path: &Path, placement: &Placement) -> Result<()> {
        save_f32_wav(path, placement.segment().audio()).map_err(|e| VoxError::DebugExport {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
