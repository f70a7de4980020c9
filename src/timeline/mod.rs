//! Resolved schedule of segments.
//!
//! The [`Timeline`] is what the compositor renders and what subtitle or muxing
//! tooling reads per-line timing from.

pub mod scheduler;
pub mod segment;
pub mod time;

pub use scheduler::{SchedulePolicy, schedule};
pub use segment::Segment;
pub use time::{TICKS_PER_SECOND, Ticks};

use serde::{Deserialize, Serialize};

/// A segment and the start time the scheduler assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    segment: Segment,
    actual_start: Ticks,
}

impl Placement {
    pub(crate) fn new(segment: Segment, actual_start: Ticks) -> Self {
        Self {
            segment,
            actual_start,
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Always at or after the segment's requested start.
    pub fn actual_start(&self) -> Ticks {
        self.actual_start
    }

    pub fn end(&self) -> Ticks {
        self.actual_start + self.segment.duration()
    }

    /// How far the segment was pushed past its requested start.
    pub fn shift(&self) -> Ticks {
        self.actual_start - self.segment.requested_start()
    }
}

/// Per-line timing row, in seconds, for external tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub index: usize,
    pub requested_start: f64,
    pub actual_start: f64,
    pub duration: f64,
    pub speaker: String,
    pub text: String,
}

/// Ordered, non-overlapping placements in script order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    placements: Vec<Placement>,
    total_duration: Ticks,
}

impl Timeline {
    pub(crate) fn from_placements(placements: Vec<Placement>) -> Self {
        let total_duration = placements
            .iter()
            .map(Placement::end)
            .max()
            .unwrap_or(Ticks::ZERO);
        Self {
            placements,
            total_duration,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Latest end over all placements.
    pub fn total_duration(&self) -> Ticks {
        self.total_duration
    }

    /// Number of segments that had to be moved.
    pub fn shifted_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| p.shift() > Ticks::ZERO)
            .count()
    }

    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.placements
            .iter()
            .map(|p| {
                let segment = p.segment();
                TimelineEntry {
                    index: segment.index(),
                    requested_start: segment.requested_start().as_secs_f64(),
                    actual_start: p.actual_start().as_secs_f64(),
                    duration: segment.duration().as_secs_f64(),
                    speaker: segment.speaker().to_string(),
                    text: segment.text().to_string(),
                }
            })
            .collect()
    }

    /// Timing rows as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use crate::script::ScriptLine;

    fn timeline() -> Timeline {
        let lines = [
            ScriptLine::new(0.0, "first", "alice").unwrap(),
            ScriptLine::new(1.0, "second", "bob").unwrap(),
        ];
        let segments = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                Segment::new(i, line, AudioBuffer::mono(vec![0.0; 2000], 1000).unwrap())
            })
            .collect();
        schedule(segments, &SchedulePolicy::default())
    }

    #[test]
    fn total_duration_is_latest_end() {
        let timeline = timeline();
        assert_eq!(timeline.total_duration(), Ticks::from_secs_f64(4.0).unwrap());
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn shift_reported_per_placement() {
        let timeline = timeline();
        assert_eq!(timeline.placements()[0].shift(), Ticks::ZERO);
        assert_eq!(
            timeline.placements()[1].shift(),
            Ticks::from_secs_f64(1.0).unwrap()
        );
        assert_eq!(timeline.shifted_count(), 1);
    }

    #[test]
    fn entries_report_seconds() {
        let entries = timeline().entries();
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].requested_start, 1.0);
        assert_eq!(entries[1].actual_start, 2.0);
        assert_eq!(entries[1].duration, 2.0);
        assert_eq!(entries[1].speaker, "bob");
    }

    #[test]
    fn json_export_lists_every_line() {
        let json = timeline().to_json().unwrap();
        let parsed: Vec<TimelineEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timeline().entries());
    }
}
