// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2022 Adrian <adrian.eddy at gmail>

use crate::{ DistortionParams, EyeViewport };

/// Shows the rendered eye image as-is, for comparing against the warped output.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Passthrough { }

impl Passthrough {
    #[inline]
    pub fn distort_uv(&self, uv: (f32, f32), _viewport: &EyeViewport, _params: &DistortionParams) -> Option<(f32, f32)> {
        Some(uv)
    }

    pub fn id() -> &'static str { "passthrough" }
    pub fn name() -> &'static str { "Passthrough" }
    pub fn applies_distortion() -> bool { false }
}
