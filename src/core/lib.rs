// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

pub mod error;
pub mod optical_profile;
pub mod viewport;
pub mod postfilter;
pub mod stereo;
pub mod gpu;

pub use error::CompositorError;
pub use optical_profile::{ DistortionParams, OpticalProfile };
pub use viewport::{ Eye, EyeViewport };
pub use postfilter::{ PixelType, SourceImage, AddressMode, DistortionModel };
pub use stereo::{ StereoLayout, compose_side_by_side };
pub use gpu::ShaderUniforms;

use postfilter::distortion_models::{ HmdWarp, Passthrough };

/// Warps rendered stereo frames for viewing through the HMD lenses.
///
/// Owns the optics and the per-eye geometry. The geometry is derived once per output size
/// and shared by the CPU path (`process_*`) and the GPU path (`shader_uniforms`).
pub struct StereoCompositor<T: PixelType> {
    params: DistortionParams,
    pub distortion_model: DistortionModel,
    pub address_mode: AddressMode,
    layout: StereoLayout,
    right_offset: f32, // GPU path only

    output_size: (usize, usize), // per eye
    viewports: [EyeViewport; 2],

    _d: std::marker::PhantomData<T>
}

impl<T: PixelType> StereoCompositor<T> {
    /// Output size defaults to the visible eye size of `layout`.
    pub fn new(params: DistortionParams, layout: StereoLayout) -> Result<Self, CompositorError> {
        params.validate()?;
        let output_size = (layout.eye_width, layout.height);
        let viewports = Self::compute_viewports(&params, output_size)?;
        Ok(Self {
            params,
            distortion_model: DistortionModel::default(),
            address_mode: AddressMode::default(),
            layout,
            right_offset: 0.0,
            output_size,
            viewports,
            _d: std::marker::PhantomData
        })
    }

    fn compute_viewports(params: &DistortionParams, size: (usize, usize)) -> Result<[EyeViewport; 2], CompositorError> {
        Ok([
            EyeViewport::compute(params, size.0, size.1, Eye::Left)?,
            EyeViewport::compute(params, size.0, size.1, Eye::Right)?,
        ])
    }

    pub fn set_output_size(&mut self, width: usize, height: usize) -> Result<(), CompositorError> {
        if self.output_size == (width, height) {
            return Ok(());
        }
        self.viewports = Self::compute_viewports(&self.params, (width, height))?;
        self.output_size = (width, height);
        log::debug!("Output size per eye: {width}x{height}");
        Ok(())
    }

    pub fn output_size(&self) -> (usize, usize) { self.output_size }
    pub fn params(&self) -> &DistortionParams { &self.params }
    pub fn layout(&self) -> &StereoLayout { &self.layout }
    pub fn viewport(&self, eye: Eye) -> &EyeViewport { &self.viewports[eye.index()] }

    pub fn set_apply_distortion(&mut self, apply: bool) {
        self.distortion_model = if apply {
            DistortionModel::from_id(HmdWarp::id())
        } else {
            DistortionModel::from_id(Passthrough::id())
        };
    }
    pub fn apply_distortion(&self) -> bool {
        self.distortion_model.applies_distortion()
    }

    /// Warps one eye into `output`, an RGBA8 buffer of `output_size()`.
    pub fn process_eye(&self, eye: Eye, source: &SourceImage<T>, output: &mut [u8]) -> Result<(), CompositorError> {
        postfilter::postfilter(output, source, self.viewport(eye), &self.params, &self.distortion_model, self.address_mode)
    }

    pub fn process_stereo(&self, left: &SourceImage<T>, right: &SourceImage<T>, out_left: &mut [u8], out_right: &mut [u8]) -> Result<(), CompositorError> {
        let (l, r) = rayon::join(
            || self.process_eye(Eye::Left, left, out_left),
            || self.process_eye(Eye::Right, right, out_right)
        );
        l?;
        r?;
        Ok(())
    }

    /// Warps a packed side-by-side frame laid out as `layout()` describes.
    /// Returns a `2 * width` x `height` RGBA8 image.
    pub fn process_side_by_side(&self, frame: &[u8]) -> Result<Vec<u8>, CompositorError> {
        let left  = self.layout.side_by_side_source::<T>(Eye::Left, frame)?;
        let right = self.layout.side_by_side_source::<T>(Eye::Right, frame)?;
        self.process_pair(&left, &right)
    }

    /// Same as `process_side_by_side`, for two separate eye buffers.
    pub fn process_eye_buffers(&self, left: &[u8], right: &[u8]) -> Result<Vec<u8>, CompositorError> {
        let left  = self.layout.eye_source::<T>(Eye::Left, left)?;
        let right = self.layout.eye_source::<T>(Eye::Right, right)?;
        self.process_pair(&left, &right)
    }

    fn process_pair(&self, left: &SourceImage<T>, right: &SourceImage<T>) -> Result<Vec<u8>, CompositorError> {
        let (w, h) = self.output_size;
        let mut out_left  = vec![0u8; w * h * 4];
        let mut out_right = vec![0u8; w * h * 4];
        self.process_stereo(left, right, &mut out_left, &mut out_right)?;
        compose_side_by_side(&out_left, &out_right, w, h)
    }

    /// Fine adjustment of the right eye texture position, see `ShaderUniforms::with_right_offset`.
    pub fn set_right_offset(&mut self, offset: f32) {
        self.right_offset = offset;
    }

    pub fn shader_uniforms(&self, eye: Eye) -> ShaderUniforms {
        ShaderUniforms::new(self.viewport(eye), &self.params, &self.layout, &self.distortion_model)
            .with_right_offset(self.right_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postfilter::RGBA8;

    // Left eye, margins, right eye on every row
    fn packed_frame(layout: &StereoLayout, left: RGBA8, right: RGBA8) -> Vec<u8> {
        let margin = RGBA8(9, 9, 9, 9);
        let mut px = Vec::new();
        for _ in 0..layout.height {
            px.extend(std::iter::repeat(left).take(layout.eye_width));
            px.extend(std::iter::repeat(margin).take(2 * layout.margin));
            px.extend(std::iter::repeat(right).take(layout.eye_width));
        }
        bytemuck::cast_slice(&px).to_vec()
    }

    #[test]
    fn viewports_follow_output_size() {
        let layout = StereoLayout::new(64, 64, 0).unwrap();
        let mut c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        assert_eq!(c.viewport(Eye::Right).output_size, (64, 64));
        assert_eq!(c.viewport(Eye::Right).aspect_ratio, 1.0);

        c.set_output_size(128, 64).unwrap();
        assert_eq!(c.output_size(), (128, 64));
        assert_eq!(c.viewport(Eye::Left).aspect_ratio, 2.0);
        assert_eq!(c.viewport(Eye::Right).pixel_offset, 128);

        assert!(c.set_output_size(0, 64).is_err());
        assert_eq!(c.output_size(), (128, 64));
    }

    #[test]
    fn invalid_params_fail_construction() {
        let layout = StereoLayout::new(64, 64, 0).unwrap();
        let params = DistortionParams { warp_param: [f32::NAN, 0.0, 0.0, 0.0], ..Default::default() };
        assert!(StereoCompositor::<RGBA8>::new(params, layout).is_err());
    }

    #[test]
    fn side_by_side_keeps_eyes_apart() {
        let layout = StereoLayout::new(32, 32, 4).unwrap();
        let frame = packed_frame(&layout, RGBA8(255, 0, 0, 255), RGBA8(0, 0, 255, 255));
        let mut c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        c.set_apply_distortion(false);

        let out = c.process_side_by_side(&frame).unwrap();
        let px: &[RGBA8] = bytemuck::cast_slice(&out);
        assert_eq!(px.len(), 64 * 32);
        // Margins never leak in, eyes land in their halves
        assert!(px.iter().enumerate().all(|(i, p)| if i % 64 < 32 { *p == RGBA8(255, 0, 0, 255) } else { *p == RGBA8(0, 0, 255, 255) }));
    }

    #[test]
    fn eye_buffers_match_packed_frame() {
        let layout = StereoLayout::new(24, 16, 3).unwrap();
        let frame = packed_frame(&layout, RGBA8(10, 200, 30, 255), RGBA8(90, 60, 250, 255));
        let row = layout.eye_stride() * 4;
        let (mut left, mut right) = (Vec::new(), Vec::new());
        for pair in frame.chunks(2 * row) {
            left.extend_from_slice(&pair[..row]);
            right.extend_from_slice(&pair[row..]);
        }
        let c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        assert_eq!(c.process_side_by_side(&frame).unwrap(), c.process_eye_buffers(&left, &right).unwrap());
    }

    #[test]
    fn distortion_toggle() {
        let layout = StereoLayout::new(32, 32, 0).unwrap();
        let mut c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        assert!(c.apply_distortion());
        assert_eq!(c.shader_uniforms(Eye::Left).apply_distortion, 1);

        let frame = packed_frame(&layout, RGBA8(255, 255, 255, 255), RGBA8(255, 255, 255, 255));
        let warped = c.process_side_by_side(&frame).unwrap();
        c.set_apply_distortion(false);
        let flat = c.process_side_by_side(&frame).unwrap();
        assert_eq!(c.shader_uniforms(Eye::Left).apply_distortion, 0);

        let opaque = |b: &[u8]| b.chunks(4).filter(|p| p[3] > 0).count();
        assert_eq!(opaque(&flat), 64 * 32);
        assert!(opaque(&warped) < opaque(&flat));
    }

    #[test]
    fn uniforms_come_from_the_cached_viewports() {
        let layout = StereoLayout::new(40, 50, 8).unwrap();
        let mut c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        c.set_output_size(80, 100).unwrap();
        for eye in Eye::BOTH {
            let u = c.shader_uniforms(eye);
            let vp = c.viewport(eye);
            assert_eq!(u.lens_center, vp.lens_center);
            assert_eq!(u.scale, vp.scale);
            assert_eq!(u.x_margin, 8.0 / 48.0);
        }
    }

    #[test]
    fn right_offset_reaches_the_uniforms() {
        let layout = StereoLayout::new(32, 32, 0).unwrap();
        let mut c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        assert_eq!(c.shader_uniforms(Eye::Right).right_offset, 0.0);
        c.set_right_offset(0.02);
        assert_eq!(c.shader_uniforms(Eye::Right).right_offset, 0.02);
        c.set_right_offset(-1.0);
        assert_eq!(c.shader_uniforms(Eye::Right).right_offset, 0.0);
    }

    #[test]
    fn wrong_output_buffer_size_is_reported() {
        let layout = StereoLayout::new(16, 16, 0).unwrap();
        let c = StereoCompositor::<RGBA8>::new(DistortionParams::default(), layout).unwrap();
        let buf = vec![0u8; 16 * 16 * 4];
        let src = layout.eye_source::<RGBA8>(Eye::Left, &buf).unwrap();
        let (mut l, mut r) = (vec![0u8; 16 * 16 * 4], vec![0u8; 10]);
        assert!(matches!(c.process_stereo(&src, &src, &mut l, &mut r), Err(CompositorError::BufferSize { .. })));
    }
}
