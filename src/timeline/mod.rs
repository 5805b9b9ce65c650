//! Progress timeline: annotated frames of one retrain run, assembled into an
//! animated GIF.

mod builder;
mod recorder;

#[cfg(test)]
mod tests;

pub use builder::{ProgressTimelineBuilder, DEFAULT_FRAME_DURATION_MS, MAX_FRAME_DURATION_MS};
pub use recorder::{ProgressFrame, ProgressFrameRecorder};
