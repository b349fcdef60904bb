// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use nalgebra::Vector4;
use super::PixelType;
use crate::CompositorError;

/// What happens to normalized coordinates outside of 0..1
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// Clamp to the nearest edge row or column.
    #[default]
    ClampToEdge,
    /// Keep only the fractional part (`u - floor(u)`), like a GL_REPEAT texture.
    Repeat,
}

/*
    A logical image inside a wider, padded row buffer:

      <--------------- stride --------------------->
      +------+------------------------------+------+
      |      |                              |      |
      |      |                              |      |  height
      |      |                              |      |
      +------+------------------------------+------+
      <-----> <-------- width ------------->
      x_offset

    x_offset + width <= stride
*/
#[derive(Clone, Copy)]
pub struct SourceImage<'a, T: PixelType> {
    pixels: &'a [T],
    width: usize,
    height: usize,
    stride: usize, // in pixels
    x_offset: usize,
}

impl<'a, T: PixelType> SourceImage<'a, T> {
    pub fn new(buffer: &'a [u8], width: usize, height: usize, stride: usize, x_offset: usize) -> Result<Self, CompositorError> {
        let pixels: &[T] = bytemuck::try_cast_slice(buffer).map_err(CompositorError::PixelCast)?;
        Self::from_pixels(pixels, width, height, stride, x_offset)
    }

    pub fn from_pixels(pixels: &'a [T], width: usize, height: usize, stride: usize, x_offset: usize) -> Result<Self, CompositorError> {
        if width == 0 || height == 0 {
            log::warn!("Rejected source image of {width}x{height}");
            return Err(CompositorError::InvalidDimensions { width, height });
        }
        let row_end = x_offset.checked_add(width).filter(|&end| end <= stride);
        let Some(row_end) = row_end else {
            log::warn!("Rejected source layout: x_offset {x_offset} + width {width} > stride {stride}");
            return Err(CompositorError::InvalidLayout { width, x_offset, stride });
        };
        let required = (height - 1).checked_mul(stride).and_then(|x| x.checked_add(row_end));
        match required {
            Some(required) if pixels.len() >= required => Ok(Self { pixels, width, height, stride, x_offset }),
            _ => {
                let expected = required.unwrap_or(usize::MAX);
                log::warn!("Rejected source buffer: {} pixels, {}x{} with stride {stride} needs {expected}", pixels.len(), width, height);
                Err(CompositorError::BufferSize { expected, actual: pixels.len() })
            }
        }
    }

    #[inline] pub fn width(&self)    -> usize { self.width }
    #[inline] pub fn height(&self)   -> usize { self.height }
    #[inline] pub fn stride(&self)   -> usize { self.stride }
    #[inline] pub fn x_offset(&self) -> usize { self.x_offset }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> T {
        self.pixels[y * self.stride + self.x_offset + x]
    }

    /// Bilinear fetch at normalized `(u, v)`.
    ///
    /// Channels come back in 0..1 for byte formats and unscaled for float formats.
    /// Formats with fewer than four channels return alpha = 0.
    #[inline]
    pub fn sample(&self, u: f32, v: f32, mode: AddressMode) -> Vector4<f32> {
        let (u, v) = match mode {
            AddressMode::Repeat => (
                (u - u.floor()).clamp(0.0, 1.0),
                (v - v.floor()).clamp(0.0, 1.0)
            ),
            AddressMode::ClampToEdge => (
                u.clamp(0.0, 1.0),
                v.clamp(0.0, 1.0)
            ),
        };

        let px = (self.width  - 1) as f32 * u;
        let py = (self.height - 1) as f32 * v;

        // NaN casts to 0
        let x0 = (px as usize).min(self.width  - 1);
        let y0 = (py as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width  - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let dx = px - x0 as f32;
        let dy = py - y0 as f32;

        let w00 = (1.0 - dx) * (1.0 - dy);
        let w01 = (1.0 - dx) * dy;
        let w10 = dx * (1.0 - dy);
        let w11 = dx * dy;

        let x0 = (x0 + self.x_offset).min(self.stride - 1);
        let x1 = (x1 + self.x_offset).min(self.stride - 1);

        let texel = |x: usize, y: usize| T::to_float(self.pixels[y * self.stride + x]);

        let mut rgba = texel(x0, y0) * w00 +
                       texel(x0, y1) * w01 +
                       texel(x1, y0) * w10 +
                       texel(x1, y1) * w11;
        rgba *= T::NORMALIZE;

        if T::COUNT < 4 {
            rgba[3] = 0.0;
        }
        rgba
    }
}
