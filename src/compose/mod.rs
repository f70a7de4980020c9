//! Track composition: rendering, debug dumps, and the run controller.

pub mod compositor;
pub mod controller;
pub mod debug_export;
pub mod report;
pub mod track;

pub use compositor::Compositor;
pub use controller::{Composer, ComposerConfig, Composition};
pub use debug_export::{DebugExportReport, DebugExporter};
pub use report::{CollectingReporter, ErrorReporter, LogReporter};
pub use track::{ComposedTrack, TrackSamples, TrackSpec};
