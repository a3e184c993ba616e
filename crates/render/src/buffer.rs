use olimu_common::FrameSize;
use std::sync::{Arc, Mutex, PoisonError};

use crate::renderer::RenderError;

/// A 0xRRGGBB pixel grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: FrameSize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(size: FrameSize) -> Result<Self, RenderError> {
        if size.area() == 0 {
            return Err(RenderError::EmptyFrame {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            pixels: vec![0; size.area()],
        })
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn fill(&mut self, rgb: u32) {
        self.pixels.fill(rgb);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u32, y: u32, rgb: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = rgb;
        }
    }

    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.size.height {
            return None;
        }
        let w = self.size.width as usize;
        let start = y as usize * w;
        Some(&mut self.pixels[start..start + w])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for upload to a window surface.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }
}

/// The presentable frame shared with the windowing layer.
///
/// Cloning shares the same buffer.
#[derive(Debug, Clone)]
pub struct FrontBuffer {
    inner: Arc<Mutex<FrameBuffer>>,
    size: FrameSize,
}

impl FrontBuffer {
    pub fn new(size: FrameSize) -> Result<Self, RenderError> {
        Ok(Self {
            inner: Arc::new(Mutex::new(FrameBuffer::new(size)?)),
            size,
        })
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Copy a finished back buffer into the front buffer.
    pub fn present(&self, back: &FrameBuffer) -> Result<(), RenderError> {
        if back.size() != self.size {
            return Err(RenderError::SizeMismatch {
                back: (back.size().width, back.size().height),
                front: (self.size.width, self.size.height),
            });
        }
        let mut front = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        front.pixels.copy_from_slice(&back.pixels);
        Ok(())
    }

    /// Copy of the last presented frame.
    pub fn snapshot(&self) -> FrameBuffer {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
