//! Animated progress timeline.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info, warn};

use super::recorder::ProgressFrame;
use crate::error::{Error, Result};
use crate::report::render_err;

/// Default display time per frame
pub const DEFAULT_FRAME_DURATION_MS: u32 = 2000;

/// Longest frame delay a GIF can hold (a u16 count of centiseconds)
pub const MAX_FRAME_DURATION_MS: u32 = u16::MAX as u32 * 10;

/// Accumulates the frames of one run and assembles them into a looping GIF.
///
/// Each frame is also written as `frame_NNN.png` in the frame directory;
/// those files are removed once the GIF has been assembled.
#[derive(Debug)]
pub struct ProgressTimelineBuilder {
    frame_dir: PathBuf,
    output: PathBuf,
    frame_duration_ms: u32,
    frames: Vec<ProgressFrame>,
    frame_files: Vec<PathBuf>,
}

impl ProgressTimelineBuilder {
    pub fn new(frame_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            frame_dir: frame_dir.into(),
            output: output.into(),
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            frames: Vec::new(),
            frame_files: Vec::new(),
        }
    }

    /// Per-frame delay, clamped to `1..=MAX_FRAME_DURATION_MS`.
    pub fn with_frame_duration(mut self, ms: u32) -> Self {
        self.frame_duration_ms = ms.clamp(1, MAX_FRAME_DURATION_MS);
        self
    }

    pub fn frame_duration_ms(&self) -> u32 {
        self.frame_duration_ms
    }

    pub fn frames(&self) -> &[ProgressFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Drop all frames and their files.
    pub fn reset(&mut self) {
        self.remove_frame_files();
        self.frames.clear();
    }

    /// Append a frame, writing its PNG. Returns the frame file path.
    ///
    /// The frame is kept even if the PNG cannot be written.
    pub fn add_frame(&mut self, frame: ProgressFrame) -> Result<PathBuf> {
        let path = self.frame_dir.join(format!("frame_{:03}.png", self.frames.len()));
        debug!(iteration = frame.iteration, path = %path.display(), "capturing frame");
        let written = frame.image.save_png(&path);
        self.frames.push(frame);
        written?;
        self.frame_files.push(path.clone());
        Ok(path)
    }

    /// Assemble the GIF and clear the frames.
    ///
    /// Returns `Ok(None)` when no frames were captured. The canvas size is
    /// taken from the first frame.
    pub fn finalize(&mut self) -> Result<Option<PathBuf>> {
        let Some(first) = self.frames.first() else {
            debug!("no frames captured; skipping timeline");
            return Ok(None);
        };
        let size = (first.image.width, first.image.height);

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }

        let assembled = self.assemble(size);
        let count = self.frames.len();
        self.reset();
        assembled?;

        info!(frames = count, path = %self.output.display(), "progress timeline written");
        Ok(Some(self.output.clone()))
    }

    fn assemble(&self, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::gif(&self.output, size, self.frame_duration_ms)
            .map_err(render_err)?
            .into_drawing_area();
        for frame in &self.frames {
            root.fill(&WHITE).map_err(render_err)?;
            root.draw(&frame.image.to_element()?).map_err(render_err)?;
            root.present().map_err(render_err)?;
        }
        Ok(())
    }

    fn remove_frame_files(&mut self) {
        for path in self.frame_files.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "could not remove frame file");
            }
        }
    }
}
