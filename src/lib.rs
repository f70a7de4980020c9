//! vox-timeline - timeline composition for speech dubbing
//!
//! Turns an ordered script of timed lines into one continuous audio track:
//! each line is synthesized, shifted later if it would overlap the line before
//! it, and written into a silence-filled buffer at its resolved start.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod compose;
pub mod config;
pub mod defaults;
pub mod error;
pub mod script;
pub mod synth;
pub mod timeline;

// Core traits (script → synthesize → schedule → compose)
pub use synth::{SynthesisRequest, Synthesizer};

// Data
pub use audio::{AudioBuffer, SampleFormat};
pub use script::{ScriptLine, load_script, parse_script};
pub use timeline::{Placement, SchedulePolicy, Segment, Ticks, Timeline, TimelineEntry, schedule};

// Composition
pub use compose::{
    ComposedTrack, Composer, ComposerConfig, Composition, Compositor, DebugExportReport,
    DebugExporter, ErrorReporter, LogReporter, TrackSamples, TrackSpec,
};

// Error handling
pub use error::{Result, VoxError};

// Config
pub use config::Config;

// Cancellation handle accepted by `Composer::compose`
pub use tokio_util::sync::CancellationToken;
