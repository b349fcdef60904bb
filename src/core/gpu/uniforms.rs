// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use bytemuck::{ Pod, Zeroable };
use serde::Serialize;
use crate::{ CompositorError, DistortionParams, Eye, EyeViewport, StereoLayout };
use crate::postfilter::DistortionModel;

/// Uniform block of the post-process shader, ready for a uniform buffer upload.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderUniforms {
    pub lens_center:      [f32; 2],
    pub screen_center:    [f32; 2],
    pub scale:            [f32; 2],
    pub scale_in:         [f32; 2],
    pub hmd_warp_param:   [f32; 4],
    pub chrom_ab_param:   [f32; 4],
    pub x_width:          f32,
    pub x_margin:         f32,
    pub x_center_offset:  f32,
    pub apply_distortion: u32,
    pub eye_offset_x:     f32,
    pub eye:              u32,
    pub right_offset:     f32,
    _padding:             f32,
}
unsafe impl Zeroable for ShaderUniforms {}
unsafe impl Pod for ShaderUniforms {}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

impl ShaderUniforms {
    pub fn new(viewport: &EyeViewport, params: &DistortionParams, layout: &StereoLayout, model: &DistortionModel) -> Self {
        Self {
            lens_center:      viewport.lens_center,
            screen_center:    viewport.screen_center,
            scale:            viewport.scale,
            scale_in:         viewport.scale_in,
            hmd_warp_param:   params.warp_param,
            chrom_ab_param:   params.chroma_ab_param,
            x_width:          layout.x_width(),
            x_margin:         layout.x_margin(),
            x_center_offset:  params.x_center_offset * viewport.mirror,
            apply_distortion: model.applies_distortion() as u32,
            eye_offset_x:     viewport.eye_offset_x(),
            eye:              viewport.eye.index() as u32,
            right_offset:     0.0,
            _padding:         0.0,
        }
    }

    /// Horizontal shift of the right eye texture, in texture widths. Clamped to 0 and above.
    pub fn with_right_offset(mut self, offset: f32) -> Self {
        self.right_offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        self
    }

    pub fn eye(&self) -> Eye {
        if self.eye == 0 { Eye::Left } else { Eye::Right }
    }

    /// Uniforms by their GLSL names, for backends that set them one by one.
    pub fn named(&self) -> Vec<(&'static str, UniformValue)> {
        use UniformValue::*;
        vec![
            ("LensCenter",      Vec2(self.lens_center)),
            ("ScreenCenter",    Vec2(self.screen_center)),
            ("Scale",           Vec2(self.scale)),
            ("ScaleIn",         Vec2(self.scale_in)),
            ("HmdWarpParam",    Vec4(self.hmd_warp_param)),
            ("ChromAbParam",    Vec4(self.chrom_ab_param)),
            ("XWidth",          Float(self.x_width)),
            ("XMargin",         Float(self.x_margin)),
            ("XCenterOffset",   Float(self.x_center_offset)),
            ("ApplyDistortion", Int(self.apply_distortion as i32)),
            ("EyeOffsetX",      Float(self.eye_offset_x)),
            ("RightOffset",     Float(self.right_offset)),
            ("Texture0",        Int(0)), // texture units
            ("Texture1",        Int(1)),
        ]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn get_json(&self) -> Result<serde_json::Value, CompositorError> {
        let mut obj = serde_json::Map::new();
        for (name, value) in self.named() {
            obj.insert(name.to_string(), serde_json::to_value(value)?);
        }
        Ok(serde_json::Value::Object(obj))
    }
}
