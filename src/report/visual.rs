//! In-memory RGB images.

use std::path::Path;

use plotters::prelude::*;

use crate::error::{Error, Result};

/// Map a plotters error into [`Error::Render`].
pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

/// A rendered image as packed 8-bit RGB rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualArtifact {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl VisualArtifact {
    /// White canvas.
    pub fn blank(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0xff; width as usize * height as usize * 3] }
    }

    /// Wrap a buffer; `None` when its length does not match the size.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 3).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Bitmap element positioned at the origin, for blitting onto a backend.
    pub(crate) fn to_element(&self) -> Result<BitMapElement<'static, (i32, i32)>> {
        BitMapElement::with_owned_buffer((0, 0), (self.width, self.height), self.pixels.clone())
            .ok_or_else(|| Error::Render("pixel buffer does not match image size".to_string()))
    }

    /// Write as PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }
        let element = self.to_element()?;
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.draw(&element).map_err(render_err)?;
        root.present().map_err(render_err)
    }
}
