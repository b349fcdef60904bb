// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use super::{ PixelType, RGBA8, SourceImage, AddressMode, DistortionModel };
use crate::{ CompositorError, DistortionParams, EyeViewport };
use nalgebra::Vector4;
use rayon::{ prelude::ParallelSliceMut, iter::{ ParallelIterator, IndexedParallelIterator } };

// Rounds like the fixed-function path: clamp(trunc(c * 255.5), 0, 255)
const QUANTIZE: f32 = 255.5;

/// Color seen through the lens at output coordinate `uv`, or `None` outside of the field.
#[inline]
pub fn sample_distorted<T: PixelType>(source: &SourceImage<T>, uv: (f32, f32), viewport: &EyeViewport, params: &DistortionParams, model: &DistortionModel, address_mode: AddressMode) -> Option<Vector4<f32>> {
    model.distort_uv(uv, viewport, params)
         .map(|(su, sv)| source.sample(su, sv, address_mode))
}

/// Warps one eye into `output`, an RGBA8 buffer of `viewport.output_size` pixels.
///
/// Every output pixel is written. Pixels outside of the lens field become transparent black.
pub fn postfilter<T: PixelType>(output: &mut [u8], source: &SourceImage<T>, viewport: &EyeViewport, params: &DistortionParams, model: &DistortionModel, address_mode: AddressMode) -> Result<(), CompositorError> {
    let (width, height) = viewport.output_size;
    if width == 0 || height == 0 {
        log::warn!("Rejected {:?} eye output of {width}x{height}", viewport.eye);
        return Err(CompositorError::InvalidDimensions { width, height });
    }
    let row_bytes = width * std::mem::size_of::<RGBA8>();
    if output.len() != row_bytes * height {
        log::warn!("Rejected {:?} eye output buffer: {} bytes, expected {}", viewport.eye, output.len(), row_bytes * height);
        return Err(CompositorError::BufferSize { expected: row_bytes * height, actual: output.len() });
    }
    params.validate().inspect_err(|e| log::warn!("Rejected distortion params: {e}"))?;

    let _time = std::time::Instant::now();

    output.par_chunks_mut(row_bytes).enumerate().for_each(|(y, row)| { // Parallel iterator over buffer rows
        let v = (y as f32 + 0.5) / height as f32;
        row.chunks_mut(std::mem::size_of::<RGBA8>()).enumerate().for_each(|(x, pix_chunk)| { // iterator over row pixels
            let u = (x as f32 + 0.5) / width as f32;
            let pix_out: &mut RGBA8 = bytemuck::from_bytes_mut(pix_chunk);

            *pix_out = match sample_distorted(source, (u, v), viewport, params, model, address_mode) {
                Some(color) => RGBA8::from_float(color * QUANTIZE),
                None => RGBA8::default()
            };
        });
    });

    log::debug!("{:?} eye {}x{} ({}, {}) done in {:.3}ms", viewport.eye, width, height, model.id(), T::name(), _time.elapsed().as_micros() as f64 / 1000.0);

    Ok(())
}
