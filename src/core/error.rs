// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Invalid layout: x_offset {x_offset} + width {width} exceeds stride {stride}")]
    InvalidLayout { width: usize, x_offset: usize, stride: usize },
    #[error("Buffer size mismatch! expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Pixel buffer cast failed: {0:?}")]
    PixelCast(bytemuck::PodCastError),
    #[error("Invalid distortion scale {0}")]
    InvalidDistortionScale(f32),
    #[error("Non-finite value in {0}")]
    NonFiniteParameter(&'static str),
    #[error("IO error: {0:?}")]
    IOError(#[from] std::io::Error),
    #[error("JSON error: {0:?}")]
    JsonError(#[from] serde_json::Error),
}
