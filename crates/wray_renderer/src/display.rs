//! Output of rendered pixels.

use parking_lot::Mutex;

use crate::color::{color_to_rgba, Color};

/// Receives finished pixels from the render workers.
///
/// Called concurrently from several threads, so implementations take `&self`
/// and synchronize internally. Rows count up from the bottom of the image.
pub trait DisplaySink: Sync {
    fn display_pixel(&self, row: u32, column: u32, color: Color);
}

/// Simple image buffer for storing render output.
///
/// Row 0 of the buffer is the top of the image.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Display sink that collects pixels into an [`ImageBuffer`].
pub struct FrameSink {
    image: Mutex<ImageBuffer>,
}

impl FrameSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: Mutex::new(ImageBuffer::new(width, height)),
        }
    }

    /// Take the finished image.
    pub fn into_image(self) -> ImageBuffer {
        self.image.into_inner()
    }
}

impl DisplaySink for FrameSink {
    fn display_pixel(&self, row: u32, column: u32, color: Color) {
        let mut image = self.image.lock();
        if row >= image.height || column >= image.width {
            log::warn!("Pixel ({}, {}) outside the {}x{} frame", row, column, image.width, image.height);
            return;
        }
        let y = image.height - row - 1;
        image.set(column, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RED, WHITE};

    #[test]
    fn test_frame_sink_flips_rows() {
        let sink = FrameSink::new(4, 3);
        sink.display_pixel(0, 1, RED);
        sink.display_pixel(2, 3, WHITE);

        let image = sink.into_image();
        assert_eq!(image.get(1, 2), RED);
        assert_eq!(image.get(3, 0), WHITE);
        assert_eq!(image.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_frame_sink_ignores_out_of_range() {
        let sink = FrameSink::new(2, 2);
        sink.display_pixel(5, 0, RED);
        sink.display_pixel(0, 5, RED);

        assert!(sink.into_image().pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_to_rgba() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, WHITE);

        assert_eq!(image.to_rgba(), vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }
}
