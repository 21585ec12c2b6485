//! Borrowed views over caller-owned row-major 8-bit rasters.

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Read-only view of an interleaved 8-bit raster with at least 3 channels.
///
/// Only the first three channels are read; a 4th (alpha) channel is ignored.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> Raster<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        if channels < 3 {
            return Err(Error::InsufficientChannels { channels });
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// View of a tightly packed RGB buffer.
    pub fn rgb(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, 3)
    }

    /// View of a tightly packed RGBA buffer.
    pub fn rgba(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, 4)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// RGB sample at linear pixel address `y * width + x`.
    #[inline]
    pub fn sample(&self, pixel: usize) -> [u8; 3] {
        let offset = pixel * self.channels;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    #[inline]
    pub fn rgb_at(&self, pixel: usize) -> Rgb {
        Rgb::from(self.sample(pixel))
    }
}
