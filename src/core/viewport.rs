// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use serde::{ Serialize, Deserialize };
use crate::{ CompositorError, DistortionParams };

// Each eye covers half of the combined viewport, in normalized units
const VIEW_W: f32 = 0.5;
const VIEW_H: f32 = 1.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Sign applied to the lens x-center offset. The right lens sits mirrored.
    #[inline]
    pub fn mirror(self) -> f32 {
        match self {
            Eye::Left  =>  1.0,
            Eye::Right => -1.0,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Eye::Left  => 0,
            Eye::Right => 1,
        }
    }
}

/// Per-eye geometry derived from the optical profile and the eye's output size.
///
/// This is the only place the lens/screen centers and scale factors are computed.
/// The CPU postfilter and the shader uniforms both read them from here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeViewport {
    pub eye: Eye,
    pub output_size: (usize, usize), // width, height
    pub aspect_ratio: f32,
    pub lens_center:   [f32; 2],
    pub screen_center: [f32; 2],
    pub scale:         [f32; 2],
    pub scale_in:      [f32; 2],
    pub mirror: f32,
    pub pixel_offset: usize, // x position of this eye in the side-by-side display
}

impl EyeViewport {
    pub fn compute(params: &DistortionParams, width: usize, height: usize, eye: Eye) -> Result<Self, CompositorError> {
        if width == 0 || height == 0 {
            log::warn!("Rejected {eye:?} eye viewport of {width}x{height}");
            return Err(CompositorError::InvalidDimensions { width, height });
        }
        params.validate().inspect_err(|e| log::warn!("Rejected distortion params: {e}"))?;

        let x = 0.0f32;
        let y = 0.0f32;
        let mirror = eye.mirror();
        let aspect_ratio = width as f32 / height as f32;

        let scale_in = [
            2.0 / VIEW_W,
            (2.0 / VIEW_H) / aspect_ratio
        ];
        let screen_center = [
            x + VIEW_W * 0.5,
            y + VIEW_H * 0.5
        ];
        let scale_factor = 1.0 / params.distortion_scale;
        let scale = [
            (VIEW_W / 2.0) * scale_factor,
            (VIEW_H / 2.0) * scale_factor * aspect_ratio
        ];
        let lens_center = [
            x + (VIEW_W + mirror * params.x_center_offset * 0.5) * 0.5,
            y + VIEW_H * 0.5
        ];

        let pixel_offset = match eye {
            Eye::Left  => 0,
            Eye::Right => width,
        };

        log::debug!("{eye:?} eye {width}x{height}: lens_center = {lens_center:?}, scale = {scale:?}, scale_in = {scale_in:?}");

        Ok(Self {
            eye,
            output_size: (width, height),
            aspect_ratio,
            lens_center,
            screen_center,
            scale,
            scale_in,
            mirror,
            pixel_offset,
        })
    }

    /// Horizontal start of this eye within the full side-by-side window, normalized.
    pub fn eye_offset_x(&self) -> f32 {
        self.pixel_offset as f32 / (2 * self.output_size.0) as f32
    }

    /// Output-space coordinate whose ray passes through the optical axis.
    pub fn lens_center_uv(&self) -> (f32, f32) {
        (2.0 * self.lens_center[0], self.lens_center[1])
    }
}
