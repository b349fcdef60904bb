// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2022 Adrian <adrian.eddy at gmail>

use crate::{ DistortionParams, EyeViewport };

/// Half extents of the accepted field around the screen center, in normalized
/// side-by-side coordinates where one eye spans 0.5 horizontally.
pub const FIELD_HALF_EXTENT: (f32, f32) = (0.25, 0.5);

/// Inverse radial ("barrel") pre-warp of an HMD lens:
///   theta = t * (K0 + K1 * r^2 + K2 * r^4 + K3 * r^6)
/// Coverage is tested on the chromatic-aberration scaled reference channel,
/// sampling uses the unscaled theta.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct HmdWarp { }

impl HmdWarp {
    #[inline]
    pub fn distort_uv(&self, uv: (f32, f32), viewport: &EyeViewport, params: &DistortionParams) -> Option<(f32, f32)> {
        let lens_center = &viewport.lens_center;
        let scale = &viewport.scale;
        let k = &params.warp_param;
        let ca = &params.chroma_ab_param;

        // Scale to [-1, 1] around the lens center, the eye covers half of the width
        let tx = (0.5 * uv.0 - lens_center[0]) * viewport.scale_in[0];
        let ty = (uv.1 - lens_center[1]) * viewport.scale_in[1];

        let r_sq = tx * tx + ty * ty;
        let poly = k[0] + k[1] * r_sq + k[2] * r_sq * r_sq + k[3] * r_sq * r_sq * r_sq;

        let theta1x = tx * poly;
        let theta1y = ty * poly;

        let ca_scale = ca[2] + ca[3] * r_sq;
        let tc_ref = (
            lens_center[0] + scale[0] * (theta1x * ca_scale),
            lens_center[1] + scale[1] * (theta1y * ca_scale)
        );
        if !is_within_field(tc_ref, viewport.screen_center) {
            return None;
        }

        let uu = lens_center[0] + scale[0] * theta1x;
        let vv = lens_center[1] + scale[1] * theta1y;

        Some((2.0 * uu, vv))
    }

    pub fn id() -> &'static str { "hmd_warp" }
    pub fn name() -> &'static str { "HMD warp" }
    pub fn applies_distortion() -> bool { true }
}

/// Boundary inclusive.
#[inline]
pub fn is_within_field(tc: (f32, f32), screen_center: [f32; 2]) -> bool {
    !(tc.0 < screen_center[0] - FIELD_HALF_EXTENT.0 ||
      tc.0 > screen_center[0] + FIELD_HALF_EXTENT.0 ||
      tc.1 < screen_center[1] - FIELD_HALF_EXTENT.1 ||
      tc.1 > screen_center[1] + FIELD_HALF_EXTENT.1)
}
