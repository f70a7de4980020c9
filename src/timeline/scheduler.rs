//! Placement scheduler.
//!
//! Segments are placed in script order, never before their requested start
//! and never overlapping the segment before them. Script order is kept even
//! when requested starts go backwards; such a line is pushed behind its
//! predecessor.

use crate::timeline::segment::Segment;
use crate::timeline::time::Ticks;
use crate::timeline::{Placement, Timeline};
use tracing::{debug, info};

/// Tunables for [`schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulePolicy {
    /// Silence enforced between a segment and the one before it.
    ///
    /// Only consulted against the previous segment's end, never against the
    /// requested start, so a zero gap shifts by exactly the overlap.
    pub min_gap: Ticks,
}

impl SchedulePolicy {
    pub fn with_min_gap(min_gap: Ticks) -> Self {
        Self { min_gap }
    }
}

/// Assign an actual start to every segment.
///
/// A single fold over the segments in the order given, carrying the earliest
/// free time. Pure and deterministic: the same segments always produce the
/// same timeline.
pub fn schedule(segments: Vec<Segment>, policy: &SchedulePolicy) -> Timeline {
    let placements = segments
        .into_iter()
        .scan(None::<Ticks>, |previous_end, segment| {
            let earliest_free = match *previous_end {
                Some(end) => end + policy.min_gap,
                None => Ticks::ZERO,
            };
            let actual_start = segment.requested_start().max(earliest_free);
            *previous_end = Some(actual_start + segment.duration());

            if actual_start > segment.requested_start() {
                info!(
                    index = segment.index(),
                    requested = %segment.requested_start(),
                    actual = %actual_start,
                    shift = %(actual_start - segment.requested_start()),
                    "Segment overlaps previous one, shifting"
                );
            } else {
                debug!(index = segment.index(), start = %actual_start, "Segment placed");
            }

            Some(Placement::new(segment, actual_start))
        })
        .collect();

    Timeline::from_placements(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use crate::script::ScriptLine;

    const RATE: u32 = 1000;

    fn segment(index: usize, start: f64, duration_secs: f64) -> Segment {
        let line = ScriptLine::new(start, "line", "speaker").unwrap();
        let frames = (duration_secs * RATE as f64).round() as usize;
        let audio = AudioBuffer::mono(vec![0.1; frames], RATE).unwrap();
        Segment::new(index, &line, audio)
    }

    fn segments(specs: &[(f64, f64)]) -> Vec<Segment> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(start, dur))| segment(i, start, dur))
            .collect()
    }

    fn starts(timeline: &Timeline) -> Vec<f64> {
        timeline
            .placements()
            .iter()
            .map(|p| p.actual_start().as_secs_f64())
            .collect()
    }

    #[test]
    fn spaced_segments_keep_requested_starts() {
        let timeline = schedule(segments(&[(0.0, 2.0), (3.0, 1.0)]), &SchedulePolicy::default());
        assert_eq!(starts(&timeline), vec![0.0, 3.0]);
    }

    #[test]
    fn long_first_segment_pushes_second() {
        let timeline = schedule(segments(&[(0.0, 4.0), (3.0, 1.0)]), &SchedulePolicy::default());
        assert_eq!(starts(&timeline), vec![0.0, 4.0]);
    }

    #[test]
    fn shift_cascades_through_all_segments() {
        let timeline = schedule(
            segments(&[(0.0, 5.0), (1.0, 1.0), (2.0, 1.0)]),
            &SchedulePolicy::default(),
        );
        assert_eq!(starts(&timeline), vec![0.0, 5.0, 6.0]);
        assert_eq!(timeline.total_duration(), Ticks::from_secs_f64(7.0).unwrap());
    }

    #[test]
    fn first_segment_starts_at_requested_time() {
        let timeline = schedule(segments(&[(2.5, 1.0)]), &SchedulePolicy::default());
        assert_eq!(starts(&timeline), vec![2.5]);
    }

    #[test]
    fn non_monotonic_input_keeps_script_order() {
        // Second line asks for an earlier time than the first; it still plays second
        let timeline = schedule(segments(&[(5.0, 1.0), (1.0, 1.0)]), &SchedulePolicy::default());
        assert_eq!(starts(&timeline), vec![5.0, 6.0]);
        let indices: Vec<usize> = timeline
            .placements()
            .iter()
            .map(|p| p.segment().index())
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn zero_duration_segment_occupies_no_time() {
        let timeline = schedule(
            segments(&[(1.0, 0.0), (1.0, 2.0), (2.0, 1.0)]),
            &SchedulePolicy::default(),
        );
        assert_eq!(starts(&timeline), vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn min_gap_applies_only_after_previous_segment() {
        let policy = SchedulePolicy::with_min_gap(Ticks::from_millis(50));
        let timeline = schedule(segments(&[(0.0, 2.0), (1.0, 1.0), (10.0, 1.0)]), &policy);

        assert_eq!(starts(&timeline), vec![0.0, 2.05, 10.0]);
    }

    #[test]
    fn min_gap_does_not_delay_first_segment() {
        let policy = SchedulePolicy::with_min_gap(Ticks::from_millis(500));
        let timeline = schedule(segments(&[(0.0, 1.0)]), &policy);
        assert_eq!(starts(&timeline), vec![0.0]);
    }

    #[test]
    fn never_earlier_than_requested_never_overlapping() {
        // Deterministic pseudo-random starts and durations
        let specs: Vec<(f64, f64)> = (0..200)
            .map(|i| {
                let start = ((i * 37) % 101) as f64 * 0.25;
                let dur = ((i * 13) % 17) as f64 * 0.125;
                (start, dur)
            })
            .collect();
        let timeline = schedule(segments(&specs), &SchedulePolicy::default());

        for placement in timeline.placements() {
            assert!(placement.actual_start() >= placement.segment().requested_start());
        }
        for pair in timeline.placements().windows(2) {
            assert!(pair[1].actual_start() >= pair[0].end());
        }
    }

    #[test]
    fn well_spaced_sequence_is_left_untouched() {
        // Each gap between requested starts is longer than the preceding duration
        let mut start = 0.0;
        let specs: Vec<(f64, f64)> = (0..200)
            .map(|i| {
                let dur = ((i * 13) % 17) as f64 * 0.125;
                let spec = (start, dur);
                start += dur + 0.25 + ((i * 7) % 5) as f64 * 0.5;
                spec
            })
            .collect();
        let timeline = schedule(segments(&specs), &SchedulePolicy::default());

        assert_eq!(timeline.shifted_count(), 0);
        for placement in timeline.placements() {
            assert_eq!(placement.shift(), Ticks::ZERO);
            assert_eq!(placement.actual_start(), placement.segment().requested_start());
        }
    }

    #[test]
    fn scheduling_is_deterministic() {
        let specs = [(0.0, 1.3), (0.5, 0.7), (3.0, 2.2), (2.0, 0.1)];
        let first = schedule(segments(&specs), &SchedulePolicy::default());
        let second = schedule(segments(&specs), &SchedulePolicy::default());
        assert_eq!(first, second);
    }

    #[test]
    fn long_timeline_does_not_drift() {
        // 10,000 back-to-back segments of 1/3 s at 48kHz land exactly on the grid
        let line = ScriptLine::new(0.0, "x", "s").unwrap();
        let segs: Vec<Segment> = (0..10_000)
            .map(|i| Segment::new(i, &line, AudioBuffer::mono(vec![0.0; 16000], 48000).unwrap()))
            .collect();
        let timeline = schedule(segs, &SchedulePolicy::default());

        let last = timeline.placements().last().unwrap();
        assert_eq!(last.actual_start().to_frame_ceil(48000), 9_999 * 16000);
        assert_eq!(timeline.total_duration().to_frame_ceil(48000), 10_000 * 16000);
    }

    #[test]
    fn empty_input_gives_empty_timeline() {
        let timeline = schedule(Vec::new(), &SchedulePolicy::default());
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_duration(), Ticks::ZERO);
    }
}
